// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! On-disk artefact layout shared by the builder and the read path.
//!
//! An index directory holds exactly these files:
//!
//! | File              | Content                                          |
//! |-------------------|--------------------------------------------------|
//! | `postings.bin`    | Concatenated posting lists, 8 bytes per posting  |
//! | `vocabulary.dat`  | term → (offset, df)                              |
//! | `skips.dat`       | term → [(doc_id, offset)]                        |
//! | `metadata.dat`    | doc_id → document name                           |
//! | `doc_vectors.dat` | doc_id → term→freq multiset                      |
//! | `chunk_<i>.bin`   | transient sorted run, deleted after merge        |
//! | `compressed/`     | per-term VByte / Elias-γ files (optional)        |
//!
//! Every `.dat` file is framed the same way: 4-byte magic, 1-byte format
//! version, the documented body, then a CRC32 of everything before the
//! footer. If the footer is wrong, something got corrupted or truncated.
//! Don't trust the data.

pub mod docs;
pub mod posting;
pub mod run;
pub mod skips;
pub mod vocab;

use std::fs;
use std::path::{Path, PathBuf};

use crc32fast::Hasher as Crc32Hasher;

use crate::error::{LinceError, Result};

pub const POSTINGS_FILENAME: &str = "postings.bin";
pub const VOCABULARY_FILENAME: &str = "vocabulary.dat";
pub const SKIPS_FILENAME: &str = "skips.dat";
pub const METADATA_FILENAME: &str = "metadata.dat";
pub const DOC_VECTORS_FILENAME: &str = "doc_vectors.dat";
pub const COMPRESSED_DIRNAME: &str = "compressed";

/// Current format version for all `.dat` artefacts.
pub const ARTIFACT_VERSION: u8 = 1;

/// Transient run file name for run number `i`.
pub fn chunk_filename(i: usize) -> String {
    format!("chunk_{i}.bin")
}

/// Write a framed artefact: magic, version, body, CRC32 footer.
pub(crate) fn write_artifact(path: &Path, magic: [u8; 4], body: &[u8]) -> Result<()> {
    let mut out = Vec::with_capacity(body.len() + 9);
    out.extend_from_slice(&magic);
    out.push(ARTIFACT_VERSION);
    out.extend_from_slice(body);

    let mut hasher = Crc32Hasher::new();
    hasher.update(&out);
    out.extend_from_slice(&hasher.finalize().to_le_bytes());

    fs::write(path, out)?;
    Ok(())
}

/// Read a framed artefact back, validating magic, version, and CRC32.
/// Returns the body bytes.
pub(crate) fn read_artifact(path: &Path, magic: [u8; 4]) -> Result<Vec<u8>> {
    if !path.exists() {
        return Err(LinceError::missing_artifact(path));
    }
    let bytes = fs::read(path)?;
    if bytes.len() < 9 {
        return Err(LinceError::Corrupt(format!(
            "{}: too small to hold a framed artefact",
            path.display()
        )));
    }
    if bytes[..4] != magic {
        return Err(LinceError::Corrupt(format!(
            "{}: bad magic {:?}",
            path.display(),
            &bytes[..4]
        )));
    }
    if bytes[4] != ARTIFACT_VERSION {
        return Err(LinceError::Corrupt(format!(
            "{}: unsupported format version {}",
            path.display(),
            bytes[4]
        )));
    }

    let body_end = bytes.len() - 4;
    let stored = u32::from_le_bytes([
        bytes[body_end],
        bytes[body_end + 1],
        bytes[body_end + 2],
        bytes[body_end + 3],
    ]);
    let mut hasher = Crc32Hasher::new();
    hasher.update(&bytes[..body_end]);
    if hasher.finalize() != stored {
        return Err(LinceError::Corrupt(format!(
            "{}: CRC32 mismatch",
            path.display()
        )));
    }

    Ok(bytes[5..body_end].to_vec())
}

// ============================================================================
// BODY ENCODING HELPERS
// ============================================================================

pub(crate) fn put_u16(buf: &mut Vec<u8>, v: u16) {
    buf.extend_from_slice(&v.to_le_bytes());
}

pub(crate) fn put_u32(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&v.to_le_bytes());
}

pub(crate) fn put_u64(buf: &mut Vec<u8>, v: u64) {
    buf.extend_from_slice(&v.to_le_bytes());
}

/// Length-prefixed string: u16 byte length, then UTF-8 bytes.
pub(crate) fn put_str(buf: &mut Vec<u8>, s: &str) -> Result<()> {
    let len = u16::try_from(s.len())
        .map_err(|_| LinceError::Corrupt(format!("term too long to serialize: {} bytes", s.len())))?;
    put_u16(buf, len);
    buf.extend_from_slice(s.as_bytes());
    Ok(())
}

/// Sequential reader over an artefact body. Every accessor reports
/// truncation as a data error instead of panicking.
pub(crate) struct BodyReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> BodyReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.bytes.len())
            .ok_or_else(|| LinceError::Corrupt("truncated artefact body".into()))?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    pub fn u16(&mut self) -> Result<u16> {
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn u32(&mut self) -> Result<u32> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn u64(&mut self) -> Result<u64> {
        let b = self.take(8)?;
        Ok(u64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]))
    }

    pub fn str(&mut self) -> Result<String> {
        let len = self.u16()? as usize;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|e| LinceError::Corrupt(format!("invalid UTF-8 in artefact: {e}")))
    }
}
