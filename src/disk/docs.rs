// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Per-document artefacts: the doc-id map and the stored document vectors.
//!
//! The doc-id map resolves a DocId back to the document's name (its path
//! relative to the corpus root). The document vectors keep each document's
//! term→freq multiset as captured at ingest, so the ranked evaluators can
//! score without re-tokenising the corpus.

use std::collections::BTreeMap;
use std::path::Path;

use crate::disk::{put_str, put_u32, read_artifact, write_artifact, BodyReader};
use crate::error::{LinceError, Result};

const MAP_MAGIC: [u8; 4] = [0x4C, 0x4D, 0x45, 0x54]; // "LMET"
const VEC_MAGIC: [u8; 4] = [0x4C, 0x56, 0x45, 0x43]; // "LVEC"

// ============================================================================
// DOC-ID MAP: metadata.dat
// ============================================================================

/// DocId → document name. Doc-ids are assigned monotonically from 1.
#[derive(Debug, Default)]
pub struct DocMap {
    names: BTreeMap<u32, String>,
}

impl DocMap {
    pub fn insert(&mut self, doc_id: u32, name: String) {
        self.names.insert(doc_id, name);
    }

    pub fn name(&self, doc_id: u32) -> Option<&str> {
        self.names.get(&doc_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Every assigned DocId in ascending order.
    pub fn doc_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.names.keys().copied()
    }

    /// Body: u32 doc_count, then per doc {u32 doc_id, u16 len, name bytes}.
    pub fn store(&self, path: &Path) -> Result<()> {
        let mut body = Vec::new();
        put_u32(&mut body, self.names.len() as u32);
        for (doc_id, name) in &self.names {
            put_u32(&mut body, *doc_id);
            put_str(&mut body, name)?;
        }
        write_artifact(path, MAP_MAGIC, &body)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let body = read_artifact(path, MAP_MAGIC)?;
        let mut r = BodyReader::new(&body);
        let doc_count = r.u32()?;
        let mut names = BTreeMap::new();
        for _ in 0..doc_count {
            let doc_id = r.u32()?;
            if doc_id == 0 {
                return Err(LinceError::Corrupt("doc-id 0 is reserved".into()));
            }
            let name = r.str()?;
            names.insert(doc_id, name);
        }
        if !r.is_empty() {
            return Err(LinceError::Corrupt(
                "metadata.dat: trailing bytes after last document".into(),
            ));
        }
        Ok(Self { names })
    }
}

// ============================================================================
// DOCUMENT VECTORS: doc_vectors.dat
// ============================================================================

/// DocId → term→freq multiset for every indexed document.
#[derive(Debug, Default)]
pub struct DocVectors {
    vectors: BTreeMap<u32, BTreeMap<String, u32>>,
}

impl DocVectors {
    pub fn insert(&mut self, doc_id: u32, vector: BTreeMap<String, u32>) {
        self.vectors.insert(doc_id, vector);
    }

    pub fn get(&self, doc_id: u32) -> Option<&BTreeMap<String, u32>> {
        self.vectors.get(&doc_id)
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &BTreeMap<String, u32>)> {
        self.vectors.iter().map(|(d, v)| (*d, v))
    }

    /// Token count of one document (sum of its frequencies).
    pub fn doc_len(&self, doc_id: u32) -> u64 {
        self.vectors
            .get(&doc_id)
            .map(|v| v.values().map(|&f| u64::from(f)).sum())
            .unwrap_or(0)
    }

    /// Body: u32 doc_count, then per doc {u32 doc_id, u32 n_terms,
    /// n_terms × {u16 len, term bytes, u32 freq}}; terms sorted per doc.
    pub fn store(&self, path: &Path) -> Result<()> {
        let mut body = Vec::new();
        put_u32(&mut body, self.vectors.len() as u32);
        for (doc_id, vector) in &self.vectors {
            put_u32(&mut body, *doc_id);
            put_u32(&mut body, vector.len() as u32);
            for (term, freq) in vector {
                put_str(&mut body, term)?;
                put_u32(&mut body, *freq);
            }
        }
        write_artifact(path, VEC_MAGIC, &body)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let body = read_artifact(path, VEC_MAGIC)?;
        let mut r = BodyReader::new(&body);
        let doc_count = r.u32()?;
        let mut vectors = BTreeMap::new();
        for _ in 0..doc_count {
            let doc_id = r.u32()?;
            let n_terms = r.u32()?;
            let mut vector = BTreeMap::new();
            for _ in 0..n_terms {
                let term = r.str()?;
                let freq = r.u32()?;
                if freq == 0 {
                    return Err(LinceError::Corrupt(format!(
                        "document {doc_id} stores term {term:?} with freq 0"
                    )));
                }
                vector.insert(term, freq);
            }
            vectors.insert(doc_id, vector);
        }
        if !r.is_empty() {
            return Err(LinceError::Corrupt(
                "doc_vectors.dat: trailing bytes after last document".into(),
            ));
        }
        Ok(Self { vectors })
    }
}
