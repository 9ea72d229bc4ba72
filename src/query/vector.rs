// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Ranked retrieval: document-at-a-time cosine similarity.
//!
//! The query becomes a sparse weight vector over its terms; every document
//! holding at least one query term is a candidate; each candidate's stored
//! term→freq vector is weighed the same way and scored by cosine. A bounded
//! min-heap keeps the top K.
//!
//! Weighting defaults to raw term frequency. TF-IDF
//! (`(1+ln tf)·ln(N/df)`) is available behind [`Weighting::TfIdf`] for
//! callers that want it.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::Result;
use crate::index::Index;
use crate::query::{RankedDoc, TopK};
use crate::tokenize::Tokenizer;

/// Term weighting scheme for query and document vectors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Weighting {
    /// Raw term frequency.
    #[default]
    RawTf,
    /// `(1 + ln tf) · ln(N / df)`.
    TfIdf,
}

impl Weighting {
    fn weigh(self, index: &Index, term: &str, tf: u32) -> f64 {
        match self {
            Weighting::RawTf => f64::from(tf),
            Weighting::TfIdf => {
                let Some(entry) = index.vocab_entry(term) else {
                    return 0.0;
                };
                let n = index.doc_count() as f64;
                let idf = (n / f64::from(entry.df)).ln();
                (1.0 + f64::from(tf).ln()) * idf
            }
        }
    }
}

/// Cosine top-K over the candidates that share a term with the query.
pub fn daat_query(
    index: &Index,
    tokenizer: &Tokenizer,
    text: &str,
    top_k: usize,
    weighting: Weighting,
) -> Result<Vec<RankedDoc>> {
    let mut query_tf: BTreeMap<String, u32> = BTreeMap::new();
    for token in tokenizer.tokenize(text) {
        *query_tf.entry(token).or_insert(0) += 1;
    }
    if query_tf.is_empty() {
        return Ok(Vec::new());
    }

    // Terms outside the vocabulary carry no weight, matching the stored
    // document vectors they will be dotted against.
    let query_vec: BTreeMap<&str, f64> = query_tf
        .iter()
        .filter(|(term, _)| index.vocab_entry(term).is_some())
        .map(|(term, &tf)| (term.as_str(), weighting.weigh(index, term, tf)))
        .collect();
    let query_norm = norm(query_vec.values().copied());
    if query_norm == 0.0 {
        return Ok(Vec::new());
    }

    let mut candidates: BTreeSet<u32> = BTreeSet::new();
    for term in query_vec.keys().copied() {
        for posting in index.posting_list(term)? {
            candidates.insert(posting.doc_id);
        }
    }

    let mut top = TopK::new(top_k);
    for doc_id in candidates {
        let Some(doc_tf) = index.doc_vector(doc_id) else {
            continue;
        };
        let doc_norm = norm(
            doc_tf
                .iter()
                .map(|(term, &tf)| weighting.weigh(index, term, tf)),
        );
        if doc_norm == 0.0 {
            continue;
        }

        let dot: f64 = query_vec
            .iter()
            .map(|(&term, &qw)| {
                doc_tf
                    .get(term)
                    .map(|&tf| qw * weighting.weigh(index, term, tf))
                    .unwrap_or(0.0)
            })
            .sum();

        top.push(dot / (query_norm * doc_norm), doc_id);
    }

    Ok(top.into_ranked(|doc_id| {
        index
            .doc_name(doc_id)
            .map(str::to_string)
            .unwrap_or_else(|| doc_id.to_string())
    }))
}

fn norm(weights: impl Iterator<Item = f64>) -> f64 {
    weights.map(|w| w * w).sum::<f64>().sqrt()
}
