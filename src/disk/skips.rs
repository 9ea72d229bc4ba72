// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Per-term skip lists.
//!
//! Skip lists are for when you have a long posting list and need to reach
//! doc_id 50000 without reading 49999 records off disk. We sample the list
//! at interval k=⌊√df⌋ (positions 0, k, 2k, …) and remember the byte offset
//! of each sampled posting in `postings.bin`. Lists with df < 4 get no skip
//! list at all; two samples over three postings buy nothing.
//!
//! # References
//!
//! - Manning, Raghavan, Schütze (2008): "Introduction to Information
//!   Retrieval", §2.3 "Faster postings list intersection via skip pointers".

use std::collections::BTreeMap;
use std::path::Path;

use crate::disk::posting::{Posting, POSTING_SIZE};
use crate::disk::{put_str, put_u32, put_u64, read_artifact, write_artifact, BodyReader};
use crate::error::{LinceError, Result};

const MAGIC: [u8; 4] = [0x4C, 0x53, 0x4B, 0x50]; // "LSKP"

/// One sampled posting: its doc_id and its byte offset in `postings.bin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkipEntry {
    pub doc_id: u32,
    pub offset: u64,
}

/// Sparse index over one term's posting list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkipList {
    entries: Vec<SkipEntry>,
}

impl SkipList {
    /// Sample a posting list that starts at `base_offset` in the final file.
    /// Returns an empty skip list when k=⌊√df⌋ < 2.
    pub fn build(postings: &[Posting], base_offset: u64) -> Self {
        let df = postings.len();
        let k = (df as f64).sqrt().floor() as usize;
        if k < 2 {
            return Self::default();
        }
        let entries = (0..df)
            .step_by(k)
            .map(|i| SkipEntry {
                doc_id: postings[i].doc_id,
                offset: base_offset + (i * POSTING_SIZE) as u64,
            })
            .collect();
        Self { entries }
    }

    pub fn from_entries(entries: Vec<SkipEntry>) -> Self {
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[SkipEntry] {
        &self.entries
    }

    pub fn cursor(&self) -> SkipCursor<'_> {
        SkipCursor {
            entries: &self.entries,
            pos: 0,
        }
    }

    /// Doc-ids and offsets must both be strictly increasing; anything else
    /// means the artefact does not describe a sorted posting list.
    fn validate(&self, term: &str) -> Result<()> {
        let ok = self
            .entries
            .windows(2)
            .all(|w| w[0].doc_id < w[1].doc_id && w[0].offset < w[1].offset);
        if ok {
            Ok(())
        } else {
            Err(LinceError::Corrupt(format!(
                "skip list for term {term:?} is not strictly increasing"
            )))
        }
    }
}

/// Forward-only cursor over a skip list, used during one intersection pass.
#[derive(Debug)]
pub struct SkipCursor<'a> {
    entries: &'a [SkipEntry],
    pos: usize,
}

impl SkipCursor<'_> {
    /// Find the largest sample with doc_id ≤ `target` whose byte offset lies
    /// strictly beyond `current_offset`. Returns that offset when it would
    /// move the posting reader forward, None when no skip is possible.
    /// The cursor never moves backwards within a traversal.
    pub fn advance_to(&mut self, target: u32, current_offset: u64) -> Option<u64> {
        while self.pos + 1 < self.entries.len() && self.entries[self.pos + 1].doc_id <= target {
            self.pos += 1;
        }
        let entry = self.entries.get(self.pos)?;
        if entry.doc_id <= target && entry.offset > current_offset {
            Some(entry.offset)
        } else {
            None
        }
    }
}

// ============================================================================
// SERIALIZATION: skips.dat
// ============================================================================

/// All skip lists of an index, keyed by term string.
#[derive(Debug, Default)]
pub struct SkipFile {
    lists: BTreeMap<String, SkipList>,
}

impl SkipFile {
    pub fn insert(&mut self, term: String, list: SkipList) {
        if !list.is_empty() {
            self.lists.insert(term, list);
        }
    }

    /// Terms without a stored list get the empty skip list.
    pub fn get(&self, term: &str) -> SkipList {
        self.lists.get(term).cloned().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// Body: u32 term_count, then per term {u16 len, bytes, u32 n,
    /// n × {u32 doc_id, u64 offset}}.
    pub fn store(&self, path: &Path) -> Result<()> {
        let mut body = Vec::new();
        put_u32(&mut body, self.lists.len() as u32);
        for (term, list) in &self.lists {
            put_str(&mut body, term)?;
            put_u32(&mut body, list.entries.len() as u32);
            for e in &list.entries {
                put_u32(&mut body, e.doc_id);
                put_u64(&mut body, e.offset);
            }
        }
        write_artifact(path, MAGIC, &body)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let body = read_artifact(path, MAGIC)?;
        let mut r = BodyReader::new(&body);
        let term_count = r.u32()?;
        let mut lists = BTreeMap::new();
        for _ in 0..term_count {
            let term = r.str()?;
            let n = r.u32()?;
            let mut entries = Vec::with_capacity(n as usize);
            for _ in 0..n {
                let doc_id = r.u32()?;
                let offset = r.u64()?;
                entries.push(SkipEntry { doc_id, offset });
            }
            let list = SkipList::from_entries(entries);
            list.validate(&term)?;
            lists.insert(term, list);
        }
        if !r.is_empty() {
            return Err(LinceError::Corrupt(
                "skips.dat: trailing bytes after last skip list".into(),
            ));
        }
        Ok(Self { lists })
    }
}
