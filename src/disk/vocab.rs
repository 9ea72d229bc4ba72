// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The vocabulary: term string → where its posting list lives.
//!
//! Kept sorted by term so the serialized artefact is byte-stable across
//! store/load cycles.

use std::collections::BTreeMap;
use std::path::Path;

use crate::disk::{put_str, put_u32, put_u64, read_artifact, write_artifact, BodyReader};
use crate::error::{LinceError, Result};

const MAGIC: [u8; 4] = [0x4C, 0x56, 0x4F, 0x43]; // "LVOC"

/// Where one term's posting list starts and how many postings it has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VocabEntry {
    /// Byte offset into `postings.bin`.
    pub offset: u64,
    /// Document frequency = number of postings.
    pub df: u32,
}

#[derive(Debug, Default)]
pub struct Vocabulary {
    terms: BTreeMap<String, VocabEntry>,
}

impl Vocabulary {
    pub fn insert(&mut self, term: String, entry: VocabEntry) {
        self.terms.insert(term, entry);
    }

    pub fn get(&self, term: &str) -> Option<VocabEntry> {
        self.terms.get(term).copied()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.terms.contains_key(term)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Terms in sorted order with their entries.
    pub fn iter(&self) -> impl Iterator<Item = (&str, VocabEntry)> {
        self.terms.iter().map(|(t, e)| (t.as_str(), *e))
    }

    /// Document frequencies of every term, for size statistics.
    pub fn dfs(&self) -> impl Iterator<Item = u32> + '_ {
        self.terms.values().map(|e| e.df)
    }

    /// Body: u32 term_count, then per term sorted by term string
    /// {u16 len, bytes, u64 offset, u32 df}.
    pub fn store(&self, path: &Path) -> Result<()> {
        let mut body = Vec::new();
        put_u32(&mut body, self.terms.len() as u32);
        for (term, entry) in &self.terms {
            put_str(&mut body, term)?;
            put_u64(&mut body, entry.offset);
            put_u32(&mut body, entry.df);
        }
        write_artifact(path, MAGIC, &body)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let body = read_artifact(path, MAGIC)?;
        let mut r = BodyReader::new(&body);
        let term_count = r.u32()?;
        let mut terms = BTreeMap::new();
        for _ in 0..term_count {
            let term = r.str()?;
            let offset = r.u64()?;
            let df = r.u32()?;
            if df == 0 {
                return Err(LinceError::Corrupt(format!(
                    "vocabulary entry {term:?} has df = 0"
                )));
            }
            terms.insert(term, VocabEntry { offset, df });
        }
        if !r.is_empty() {
            return Err(LinceError::Corrupt(
                "vocabulary.dat: trailing bytes after last entry".into(),
            ));
        }
        Ok(Self { terms })
    }
}
