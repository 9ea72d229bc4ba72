// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Document sources.
//!
//! The indexer pulls ⟨name, text⟩ pairs from a [`DocumentSource`] and never
//! touches the filesystem layout itself. Crawling, HTML stripping, and
//! encoding recovery all live on this side of the seam.
//!
//! [`DirectoryCorpus`] is the stock source: a recursive walk over a corpus
//! directory picking up `.txt` and `.html` files in sorted order, so DocId
//! assignment is deterministic for a given tree. Non-UTF-8 byte sequences
//! are replaced rather than fatal; a half-readable document beats an
//! aborted index build.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::Result;

/// One document as the indexer sees it: an opaque name (path relative to
/// the corpus root) plus its full text.
#[derive(Debug, Clone)]
pub struct Document {
    pub name: String,
    pub text: String,
}

/// Sequential pull-based document iterator with explicit end-of-stream.
pub trait DocumentSource {
    /// The next document, or None when the source is exhausted.
    fn next_document(&mut self) -> Result<Option<Document>>;
}

/// Recursive directory source for `.txt` / `.html` corpora.
pub struct DirectoryCorpus {
    root: PathBuf,
    files: std::vec::IntoIter<PathBuf>,
}

impl DirectoryCorpus {
    pub fn open(root: &Path) -> Result<Self> {
        let mut files = Vec::new();
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(std::io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let is_doc = entry
                .path()
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("txt") || e.eq_ignore_ascii_case("html"));
            if is_doc {
                files.push(entry.into_path());
            }
        }
        Ok(Self {
            root: root.to_path_buf(),
            files: files.into_iter(),
        })
    }
}

impl DocumentSource for DirectoryCorpus {
    fn next_document(&mut self) -> Result<Option<Document>> {
        let Some(path) = self.files.next() else {
            return Ok(None);
        };
        let bytes = fs::read(&path)?;
        let text = String::from_utf8_lossy(&bytes).into_owned();
        let name = path
            .strip_prefix(&self.root)
            .unwrap_or(&path)
            .to_string_lossy()
            .into_owned();
        Ok(Some(Document { name, text }))
    }
}

/// In-memory source for tests and embedding callers.
pub struct VecCorpus {
    docs: std::vec::IntoIter<Document>,
}

impl VecCorpus {
    pub fn new(docs: Vec<(String, String)>) -> Self {
        let docs: Vec<Document> = docs
            .into_iter()
            .map(|(name, text)| Document { name, text })
            .collect();
        Self { docs: docs.into_iter() }
    }
}

impl DocumentSource for VecCorpus {
    fn next_document(&mut self) -> Result<Option<Document>> {
        Ok(self.docs.next())
    }
}
