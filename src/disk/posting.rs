// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fixed-width posting records.
//!
//! A final posting is ⟨doc_id, freq⟩, 8 bytes little-endian. A partial
//! posting carries the term-id as well and only ever lives in transient run
//! files, 12 bytes little-endian. Serialisation here is pure; no I/O.

use crate::error::{LinceError, Result};

/// Bytes per final posting record in `postings.bin`.
pub const POSTING_SIZE: usize = 8;

/// Bytes per partial posting record in a run file.
pub const PARTIAL_POSTING_SIZE: usize = 12;

/// One entry of a term's posting list: which document, how many occurrences.
///
/// Doc-ids start at 1; 0 is reserved and never emitted. Freq is at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Posting {
    pub doc_id: u32,
    pub freq: u32,
}

impl Posting {
    pub fn to_bytes(self) -> [u8; POSTING_SIZE] {
        let mut buf = [0u8; POSTING_SIZE];
        buf[..4].copy_from_slice(&self.doc_id.to_le_bytes());
        buf[4..].copy_from_slice(&self.freq.to_le_bytes());
        buf
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < POSTING_SIZE {
            return Err(LinceError::Corrupt(format!(
                "posting record of wrong size: got {} bytes, need {POSTING_SIZE}",
                bytes.len()
            )));
        }
        Ok(Self {
            doc_id: u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            freq: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
        })
    }
}

/// Run-file record: ⟨term_id, doc_id, freq⟩. Runs are sorted by
/// (term_id, doc_id) before they hit disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PartialPosting {
    pub term_id: u32,
    pub doc_id: u32,
    pub freq: u32,
}

impl PartialPosting {
    pub fn to_bytes(self) -> [u8; PARTIAL_POSTING_SIZE] {
        let mut buf = [0u8; PARTIAL_POSTING_SIZE];
        buf[..4].copy_from_slice(&self.term_id.to_le_bytes());
        buf[4..8].copy_from_slice(&self.doc_id.to_le_bytes());
        buf[8..].copy_from_slice(&self.freq.to_le_bytes());
        buf
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < PARTIAL_POSTING_SIZE {
            return Err(LinceError::Corrupt(format!(
                "partial posting record of wrong size: got {} bytes, need {PARTIAL_POSTING_SIZE}",
                bytes.len()
            )));
        }
        Ok(Self {
            term_id: u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            doc_id: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
            freq: u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
        })
    }
}
