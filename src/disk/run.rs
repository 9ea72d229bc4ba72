// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Sorted partial runs on disk.
//!
//! A run is nothing but back-to-back 12-byte partial postings, already
//! sorted by (term_id, doc_id). The writer dumps a sorted buffer; the
//! reader replays it one record at a time for the K-way merge with
//! `current()` / `advance()` / `eof()` semantics.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::disk::posting::{PartialPosting, PARTIAL_POSTING_SIZE};
use crate::error::{LinceError, Result};

/// Write one sorted buffer of partial postings as a run file.
pub fn write_run(path: &Path, postings: &[PartialPosting]) -> Result<()> {
    debug_assert!(postings.windows(2).all(|w| {
        (w[0].term_id, w[0].doc_id) <= (w[1].term_id, w[1].doc_id)
    }));
    let mut out = BufWriter::new(File::create(path)?);
    for p in postings {
        out.write_all(&p.to_bytes())?;
    }
    out.flush()?;
    Ok(())
}

/// Sequential reader over one run file.
///
/// After `open`, `current()` holds the head record. Each `advance()` reads
/// the next record; at end-of-file `current()` turns None and stays None.
pub struct RunReader {
    path: PathBuf,
    reader: BufReader<File>,
    current: Option<PartialPosting>,
}

impl RunReader {
    pub fn open(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let mut run = Self {
            path: path.to_path_buf(),
            reader,
            current: None,
        };
        run.advance()?;
        Ok(run)
    }

    pub fn current(&self) -> Option<PartialPosting> {
        self.current
    }

    pub fn eof(&self) -> bool {
        self.current.is_none()
    }

    /// Read the next record into `current`. A clean end-of-file clears it;
    /// a trailing partial record is a data error.
    pub fn advance(&mut self) -> Result<()> {
        let mut buf = [0u8; PARTIAL_POSTING_SIZE];
        match read_record(&mut self.reader, &mut buf)? {
            0 => {
                self.current = None;
                Ok(())
            }
            n if n == PARTIAL_POSTING_SIZE => {
                self.current = Some(PartialPosting::from_bytes(&buf)?);
                Ok(())
            }
            n => Err(LinceError::Corrupt(format!(
                "{}: trailing partial record of {n} bytes",
                self.path.display()
            ))),
        }
    }
}

/// Fill `buf` from the reader, returning how many bytes were actually read
/// (0 at a clean EOF, a short count at a truncated one).
fn read_record<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}
