// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query-likelihood retrieval under a unigram language model.
//!
//! Every document is scored as Σ log p(t|d) over the query tokens, with
//! optional Jelinek–Mercer smoothing against the collection model:
//!
//! ```text
//! p(t|d) = (1−λ)·tf(t,d)/|d| + λ·cf(t)/|C|     (λ > 0)
//! p(t|d) = tf(t,d)/|d|                         (λ = 0)
//! ```
//!
//! An unsmoothed zero probability contributes a fixed −100 per missing
//! token instead of −∞, so documents missing one query token still rank
//! below complete matches but stay comparable with each other.

use crate::error::{LinceError, Result};
use crate::index::Index;
use crate::query::{RankedDoc, TopK};
use crate::tokenize::Tokenizer;

/// Log-probability charged per query token a document cannot generate.
const MISSING_TOKEN_PENALTY: f64 = -100.0;

/// Score every document against the query, returning the top K.
pub fn query_likelihood(
    index: &Index,
    tokenizer: &Tokenizer,
    text: &str,
    top_k: usize,
    lambda: f64,
) -> Result<Vec<RankedDoc>> {
    if !(0.0..=1.0).contains(&lambda) {
        return Err(LinceError::Query(format!(
            "lambda must be within [0, 1], got {lambda}"
        )));
    }

    let tokens = tokenizer.tokenize(text);
    if tokens.is_empty() {
        return Ok(Vec::new());
    }

    let stats = index.collection_stats();
    let collection_len = stats.collection_len();

    let mut top = TopK::new(top_k);
    for doc_id in index.doc_ids() {
        let doc_len = index.doc_len(doc_id);
        let doc_tf = index.doc_vector(doc_id);

        let mut score = 0.0;
        for token in &tokens {
            let tf = doc_tf
                .and_then(|v| v.get(token))
                .copied()
                .unwrap_or(0);
            let doc_p = if doc_len > 0 {
                f64::from(tf) / doc_len as f64
            } else {
                0.0
            };
            let p = if lambda == 0.0 {
                doc_p
            } else {
                let coll_p = if collection_len > 0 {
                    stats.cf(token) as f64 / collection_len as f64
                } else {
                    0.0
                };
                (1.0 - lambda) * doc_p + lambda * coll_p
            };
            score += if p > 0.0 { p.ln() } else { MISSING_TOKEN_PENALTY };
        }
        top.push(score, doc_id);
    }

    Ok(top.into_ranked(|doc_id| {
        index
            .doc_name(doc_id)
            .map(str::to_string)
            .unwrap_or_else(|| doc_id.to_string())
    }))
}
