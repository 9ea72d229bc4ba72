// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Blocked sort-based index construction (BSBI).
//!
//! Ingestion tokenises documents into ⟨term-id, doc-id, freq⟩ partial
//! postings under a bounded in-memory buffer, spilling each full buffer to
//! disk as a sorted run. A K-way merge then streams the runs through a
//! min-heap into the final postings file, writing the vocabulary and
//! sampling skip lists as each term completes.
//!
//! Invariants the merge depends on:
//!
//! 1. **RUNS_SORTED**: every run is sorted by (term_id, doc_id), so the heap
//!    yields a globally sorted stream and posting lists come out
//!    DocId-ordered.
//! 2. **STABLE_TERM_IDS**: one term→id map lives across the whole ingest,
//!    so equal term-ids mean equal terms across runs.
//! 3. **ONE_POSTING_PER_DOC**: per-document counting collapses duplicates
//!    before emission, so the merge never sees the same (term, doc) twice.
//!
//! Failure semantics: any I/O error aborts the build and leaves partial
//! artefacts behind; [`crate::index::Index::open`] refuses such directories
//! because the vocabulary or metadata is missing. Runs are deleted only
//! after every final artefact is on disk.
//!
//! # References
//!
//! - Manning, Raghavan, Schütze (2008): "Introduction to Information
//!   Retrieval", §4.2 "Blocked sort-based indexing".

use std::collections::{BTreeMap, BinaryHeap, HashMap};
use std::cmp::Reverse;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use indicatif::ProgressBar;

use crate::corpus::DocumentSource;
use crate::disk::docs::{DocMap, DocVectors};
use crate::disk::posting::{PartialPosting, Posting, POSTING_SIZE};
use crate::disk::run::{write_run, RunReader};
use crate::disk::skips::{SkipFile, SkipList};
use crate::disk::vocab::{VocabEntry, Vocabulary};
use crate::disk::{
    chunk_filename, COMPRESSED_DIRNAME, DOC_VECTORS_FILENAME, METADATA_FILENAME,
    POSTINGS_FILENAME, SKIPS_FILENAME, VOCABULARY_FILENAME,
};
use crate::error::{LinceError, Result};
use crate::tokenize::Tokenizer;

/// What one build produced, for the CLI summary line.
#[derive(Debug, Clone)]
pub struct IndexSummary {
    pub doc_count: u32,
    pub term_count: usize,
    pub run_count: usize,
    pub postings_bytes: u64,
    pub ingest_time: Duration,
    pub merge_time: Duration,
}

/// BSBI index builder. One-shot: build it, call [`BsbiIndexer::index`], done.
pub struct BsbiIndexer {
    tokenizer: Tokenizer,
    index_dir: PathBuf,
    /// Flush threshold, counted in documents.
    memory_limit: usize,
    term2id: HashMap<String, u32>,
    /// term_id − 1 → term string.
    id2term: Vec<String>,
    doc_map: DocMap,
    doc_vectors: DocVectors,
    runs: Vec<PathBuf>,
}

impl BsbiIndexer {
    pub fn new(tokenizer: Tokenizer, index_dir: &Path, memory_limit: usize) -> Self {
        Self {
            tokenizer,
            index_dir: index_dir.to_path_buf(),
            memory_limit: memory_limit.max(1),
            term2id: HashMap::new(),
            id2term: Vec::new(),
            doc_map: DocMap::default(),
            doc_vectors: DocVectors::default(),
            runs: Vec::new(),
        }
    }

    /// Index every document the source yields.
    ///
    /// Refuses a directory that already holds an index unless `overwrite`
    /// is set. The progress bar, when given, ticks once per document.
    pub fn index<S: DocumentSource>(
        &mut self,
        source: &mut S,
        overwrite: bool,
        progress: Option<&ProgressBar>,
    ) -> Result<IndexSummary> {
        self.prepare_directory(overwrite)?;

        let t_ingest = Instant::now();
        let mut buffer: Vec<PartialPosting> = Vec::new();
        let mut buffered_docs = 0usize;
        let mut doc_id = 0u32;

        while let Some(doc) = source.next_document()? {
            doc_id += 1;
            if let Some(pb) = progress {
                pb.set_message(doc.name.clone());
                pb.inc(1);
            }

            let tokens = self.tokenizer.tokenize(&doc.text);
            // First-seen order decides term-id assignment.
            for token in &tokens {
                if !self.term2id.contains_key(token) {
                    let id = self.id2term.len() as u32 + 1;
                    self.term2id.insert(token.clone(), id);
                    self.id2term.push(token.clone());
                }
            }

            let mut tf: BTreeMap<String, u32> = BTreeMap::new();
            for token in tokens {
                *tf.entry(token).or_insert(0) += 1;
            }
            for (term, freq) in &tf {
                buffer.push(PartialPosting {
                    term_id: self.term2id[term],
                    doc_id,
                    freq: *freq,
                });
            }

            self.doc_map.insert(doc_id, doc.name);
            self.doc_vectors.insert(doc_id, tf);

            buffered_docs += 1;
            if buffered_docs > self.memory_limit {
                self.flush_run(&mut buffer)?;
                buffered_docs = 0;
            }
        }
        if !buffer.is_empty() {
            self.flush_run(&mut buffer)?;
        }
        let ingest_time = t_ingest.elapsed();

        let t_merge = Instant::now();
        let postings_bytes = self.merge_runs()?;
        let merge_time = t_merge.elapsed();

        self.doc_map.store(&self.index_dir.join(METADATA_FILENAME))?;
        self.doc_vectors
            .store(&self.index_dir.join(DOC_VECTORS_FILENAME))?;

        // Runs go away only once every final artefact is on disk.
        let run_count = self.runs.len();
        for run in self.runs.drain(..) {
            fs::remove_file(run)?;
        }

        Ok(IndexSummary {
            doc_count: doc_id,
            term_count: self.id2term.len(),
            run_count,
            postings_bytes,
            ingest_time,
            merge_time,
        })
    }

    fn prepare_directory(&self, overwrite: bool) -> Result<()> {
        let vocab_path = self.index_dir.join(VOCABULARY_FILENAME);
        let postings_path = self.index_dir.join(POSTINGS_FILENAME);
        if vocab_path.exists() || postings_path.exists() {
            if !overwrite {
                return Err(LinceError::Policy(format!(
                    "{} already holds an index; pass --overwrite to replace it",
                    self.index_dir.display()
                )));
            }
            for name in [
                POSTINGS_FILENAME,
                VOCABULARY_FILENAME,
                SKIPS_FILENAME,
                METADATA_FILENAME,
                DOC_VECTORS_FILENAME,
            ] {
                let path = self.index_dir.join(name);
                if path.exists() {
                    fs::remove_file(path)?;
                }
            }
            let compressed = self.index_dir.join(COMPRESSED_DIRNAME);
            if compressed.exists() {
                fs::remove_dir_all(compressed)?;
            }
            // Stale runs from an aborted build
            for entry in fs::read_dir(&self.index_dir)? {
                let entry = entry?;
                let name = entry.file_name();
                let name = name.to_string_lossy();
                if name.starts_with("chunk_") && name.ends_with(".bin") {
                    fs::remove_file(entry.path())?;
                }
            }
        }
        fs::create_dir_all(&self.index_dir)?;
        Ok(())
    }

    /// Sort the buffer by (term_id, doc_id) and spill it as the next run.
    fn flush_run(&mut self, buffer: &mut Vec<PartialPosting>) -> Result<()> {
        if buffer.is_empty() {
            return Ok(());
        }
        buffer.sort_unstable();
        let path = self.index_dir.join(chunk_filename(self.runs.len()));
        write_run(&path, buffer)?;
        self.runs.push(path);
        buffer.clear();
        Ok(())
    }

    /// K-way merge of all runs into `postings.bin`, producing the
    /// vocabulary and skip lists on the way. Returns the postings size.
    fn merge_runs(&mut self) -> Result<u64> {
        let mut readers: Vec<RunReader> = Vec::with_capacity(self.runs.len());
        for path in &self.runs {
            readers.push(RunReader::open(path)?);
        }

        // Ties across runs resolve by reader index, so the merge is
        // deterministic. (term, doc) pairs are unique anyway; see
        // ONE_POSTING_PER_DOC above.
        let mut heap: BinaryHeap<Reverse<MergeEntry>> = BinaryHeap::new();
        for (run, reader) in readers.iter().enumerate() {
            if let Some(p) = reader.current() {
                heap.push(Reverse(MergeEntry::new(p, run)));
            }
        }

        let postings_path = self.index_dir.join(POSTINGS_FILENAME);
        let mut out = BufWriter::new(File::create(&postings_path)?);
        let mut vocabulary = Vocabulary::default();
        let mut skips = SkipFile::default();

        let mut offset = 0u64;
        let mut current_term: Option<u32> = None;
        let mut current_list: Vec<Posting> = Vec::new();

        while let Some(Reverse(entry)) = heap.pop() {
            if current_term.is_some_and(|t| t != entry.term_id) {
                offset = self.finish_term(
                    &mut out,
                    current_term.take(),
                    &mut current_list,
                    offset,
                    &mut vocabulary,
                    &mut skips,
                )?;
            }
            current_term = Some(entry.term_id);
            current_list.push(Posting {
                doc_id: entry.doc_id,
                freq: entry.freq,
            });

            let reader = &mut readers[entry.run];
            reader.advance()?;
            if let Some(p) = reader.current() {
                heap.push(Reverse(MergeEntry::new(p, entry.run)));
            }
        }
        offset = self.finish_term(
            &mut out,
            current_term.take(),
            &mut current_list,
            offset,
            &mut vocabulary,
            &mut skips,
        )?;
        out.flush()?;

        vocabulary.store(&self.index_dir.join(VOCABULARY_FILENAME))?;
        skips.store(&self.index_dir.join(SKIPS_FILENAME))?;
        Ok(offset)
    }

    /// Write one accumulated posting list, record its vocabulary entry,
    /// sample its skip list. Returns the offset after the list.
    fn finish_term(
        &self,
        out: &mut BufWriter<File>,
        term_id: Option<u32>,
        list: &mut Vec<Posting>,
        offset: u64,
        vocabulary: &mut Vocabulary,
        skips: &mut SkipFile,
    ) -> Result<u64> {
        let Some(term_id) = term_id else {
            return Ok(offset);
        };
        if list.is_empty() {
            return Ok(offset);
        }
        let term = self
            .id2term
            .get(term_id as usize - 1)
            .ok_or_else(|| LinceError::Corrupt(format!("unknown term-id {term_id} in merge")))?
            .clone();

        for posting in list.iter() {
            out.write_all(&posting.to_bytes())?;
        }
        vocabulary.insert(
            term.clone(),
            VocabEntry {
                offset,
                df: list.len() as u32,
            },
        );
        skips.insert(term, SkipList::build(list, offset));

        let next = offset + (list.len() * POSTING_SIZE) as u64;
        list.clear();
        Ok(next)
    }
}

/// Heap entry for the K-way merge. Ordering is (term_id, doc_id, run);
/// freq rides along and never decides a comparison because (term_id,
/// doc_id, run) is unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct MergeEntry {
    term_id: u32,
    doc_id: u32,
    run: usize,
    freq: u32,
}

impl MergeEntry {
    fn new(p: PartialPosting, run: usize) -> Self {
        Self {
            term_id: p.term_id,
            doc_id: p.doc_id,
            run,
            freq: p.freq,
        }
    }
}
