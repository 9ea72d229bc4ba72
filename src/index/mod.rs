// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Read-only handle over a merged index directory.
//!
//! [`Index`] owns the postings file descriptor and the loaded vocabulary,
//! skip lists, doc-id map, and document vectors. It is the only gateway the
//! query evaluators have to the on-disk artefacts; none of them reach into
//! builder internals. The index is immutable post-merge, so any number of
//! handles may attach to the same directory without coordination.
//!
//! `open` refuses a directory that is missing any of postings, vocabulary,
//! or metadata — that is what a crashed build looks like.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::disk::docs::{DocMap, DocVectors};
use crate::disk::posting::{Posting, POSTING_SIZE};
use crate::disk::skips::{SkipFile, SkipList};
use crate::disk::vocab::{VocabEntry, Vocabulary};
use crate::disk::{
    DOC_VECTORS_FILENAME, METADATA_FILENAME, POSTINGS_FILENAME, SKIPS_FILENAME,
    VOCABULARY_FILENAME,
};
use crate::error::{LinceError, Result};

/// Collection-level statistics derived from the stored document vectors,
/// used by the language-model evaluator.
#[derive(Debug, Default)]
pub struct CollectionStats {
    term_cf: HashMap<String, u64>,
    collection_len: u64,
}

impl CollectionStats {
    fn from_vectors(vectors: &DocVectors) -> Self {
        let mut term_cf: HashMap<String, u64> = HashMap::new();
        let mut collection_len = 0u64;
        for (_, vector) in vectors.iter() {
            for (term, freq) in vector {
                *term_cf.entry(term.clone()).or_insert(0) += u64::from(*freq);
                collection_len += u64::from(*freq);
            }
        }
        Self { term_cf, collection_len }
    }

    /// Collection frequency: total occurrences of `term` across all docs.
    pub fn cf(&self, term: &str) -> u64 {
        self.term_cf.get(term).copied().unwrap_or(0)
    }

    /// Total token count of the collection.
    pub fn collection_len(&self) -> u64 {
        self.collection_len
    }
}

pub struct Index {
    index_dir: PathBuf,
    postings: File,
    vocabulary: Vocabulary,
    skips: SkipFile,
    doc_map: DocMap,
    doc_vectors: DocVectors,
    stats: CollectionStats,
}

impl Index {
    /// Attach to a merged index directory.
    pub fn open(index_dir: &Path) -> Result<Self> {
        let postings_path = index_dir.join(POSTINGS_FILENAME);
        if !postings_path.exists() {
            return Err(LinceError::missing_artifact(&postings_path));
        }
        let vocabulary = Vocabulary::load(&index_dir.join(VOCABULARY_FILENAME))?;
        let doc_map = DocMap::load(&index_dir.join(METADATA_FILENAME))?;

        // Skips and doc vectors are auxiliary: a directory without them is
        // still queryable, just slower / Boolean-only.
        let skips_path = index_dir.join(SKIPS_FILENAME);
        let skips = if skips_path.exists() {
            SkipFile::load(&skips_path)?
        } else {
            SkipFile::default()
        };
        let vectors_path = index_dir.join(DOC_VECTORS_FILENAME);
        let doc_vectors = if vectors_path.exists() {
            DocVectors::load(&vectors_path)?
        } else {
            DocVectors::default()
        };

        let stats = CollectionStats::from_vectors(&doc_vectors);
        Ok(Self {
            index_dir: index_dir.to_path_buf(),
            postings: File::open(postings_path)?,
            vocabulary,
            skips,
            doc_map,
            doc_vectors,
            stats,
        })
    }

    pub fn doc_count(&self) -> usize {
        self.doc_map.len()
    }

    pub fn term_count(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn doc_name(&self, doc_id: u32) -> Option<&str> {
        self.doc_map.name(doc_id)
    }

    /// Every assigned DocId, ascending. The universe for Boolean NOT.
    pub fn doc_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.doc_map.doc_ids()
    }

    pub fn vocab_entry(&self, term: &str) -> Option<VocabEntry> {
        self.vocabulary.get(term)
    }

    /// Terms in sorted order with their vocabulary entries.
    pub fn terms(&self) -> impl Iterator<Item = (&str, VocabEntry)> {
        self.vocabulary.iter()
    }

    /// Document frequency of every term, for size statistics.
    pub fn posting_list_sizes(&self) -> Vec<u32> {
        self.vocabulary.dfs().collect()
    }

    pub fn skip_list(&self, term: &str) -> SkipList {
        self.skips.get(term)
    }

    pub fn doc_vector(&self, doc_id: u32) -> Option<&BTreeMap<String, u32>> {
        self.doc_vectors.get(doc_id)
    }

    pub fn doc_len(&self, doc_id: u32) -> u64 {
        self.doc_vectors.doc_len(doc_id)
    }

    pub fn collection_stats(&self) -> &CollectionStats {
        &self.stats
    }

    /// Read a full posting list. Unknown terms are an empty list, never an
    /// error.
    pub fn posting_list(&self, term: &str) -> Result<Vec<Posting>> {
        let Some(entry) = self.vocabulary.get(term) else {
            return Ok(Vec::new());
        };
        let mut file = &self.postings;
        file.seek(SeekFrom::Start(entry.offset))?;
        let mut buf = vec![0u8; entry.df as usize * POSTING_SIZE];
        file.read_exact(&mut buf).map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                LinceError::Corrupt(format!(
                    "postings.bin truncated while reading term {term:?}"
                ))
            } else {
                LinceError::Io(e)
            }
        })?;
        buf.chunks_exact(POSTING_SIZE).map(Posting::from_bytes).collect()
    }

    /// Seekable one-posting-at-a-time access, for skip-accelerated reads.
    /// None when the term is unknown.
    pub fn posting_cursor(&self, term: &str) -> Result<Option<PostingCursor<'_>>> {
        let Some(entry) = self.vocabulary.get(term) else {
            return Ok(None);
        };
        let end = entry.offset + u64::from(entry.df) * POSTING_SIZE as u64;
        PostingCursor::new(&self.postings, entry.offset, end).map(Some)
    }

    /// On-disk byte sizes of each artefact, for the stats report.
    pub fn artifact_sizes(&self) -> Vec<(&'static str, u64)> {
        [
            POSTINGS_FILENAME,
            VOCABULARY_FILENAME,
            SKIPS_FILENAME,
            METADATA_FILENAME,
            DOC_VECTORS_FILENAME,
        ]
        .into_iter()
        .map(|name| {
            let size = std::fs::metadata(self.index_dir.join(name))
                .map(|m| m.len())
                .unwrap_or(0);
            (name, size)
        })
        .collect()
    }
}

/// Cursor over one term's posting list with byte-offset addressing, so a
/// skip list can throw it forward.
pub struct PostingCursor<'a> {
    file: &'a File,
    /// Byte offset of the posting `current` was read from.
    pos: u64,
    end: u64,
    current: Option<Posting>,
}

impl<'a> PostingCursor<'a> {
    fn new(file: &'a File, start: u64, end: u64) -> Result<Self> {
        let mut cursor = Self {
            file,
            pos: start,
            end,
            current: None,
        };
        cursor.load()?;
        Ok(cursor)
    }

    pub fn current(&self) -> Option<Posting> {
        self.current
    }

    /// Byte offset of the current posting in `postings.bin`.
    pub fn pos(&self) -> u64 {
        self.pos
    }

    pub fn advance(&mut self) -> Result<()> {
        self.pos += POSTING_SIZE as u64;
        self.load()
    }

    /// Jump to an absolute byte offset (a skip-list sample). Seeking
    /// backwards is a caller bug and reads garbage order; skip cursors
    /// never hand out such offsets.
    pub fn seek_to(&mut self, offset: u64) -> Result<()> {
        self.pos = offset;
        self.load()
    }

    fn load(&mut self) -> Result<()> {
        if self.pos >= self.end {
            self.current = None;
            return Ok(());
        }
        let mut file = self.file;
        file.seek(SeekFrom::Start(self.pos))?;
        let mut buf = [0u8; POSTING_SIZE];
        file.read_exact(&mut buf).map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                LinceError::Corrupt("postings.bin truncated under cursor".into())
            } else {
                LinceError::Io(e)
            }
        })?;
        self.current = Some(Posting::from_bytes(&buf)?);
        Ok(())
    }
}
