// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the lince command-line interface.
//!
//! One subcommand per pipeline stage: `index` builds the on-disk index,
//! the three `query-*` commands evaluate Boolean, vector, and
//! language-model queries against it, `compress-index` runs the offline
//! codec pass, and `stats` inspects what is on disk.

pub mod display;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "lince",
    about = "Disk-based inverted index: BSBI construction and Boolean/ranked retrieval",
    version
)]
pub struct Cli {
    /// Index directory read or written by every subcommand
    #[arg(long, default_value = "index", global = true)]
    pub index_dir: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the index from a corpus directory of .txt/.html files
    Index {
        /// Corpus root; document names are paths relative to it
        corpus: String,

        /// Documents to buffer in memory before spilling a sorted run
        #[arg(long, default_value = "1000")]
        memory_limit: usize,

        /// Stop-word file, one token per line
        #[arg(long)]
        stopwords: Option<String>,

        /// Minimum token length (inclusive)
        #[arg(long, default_value = "1")]
        min_len: usize,

        /// Maximum token length (inclusive)
        #[arg(long, default_value = "20")]
        max_len: usize,

        /// Replace an existing index in the target directory
        #[arg(long)]
        overwrite: bool,
    },

    /// Evaluate a Boolean expression (AND, OR, NOT, parentheses)
    QueryBool {
        /// Expression, e.g. "(casa OR raton) AND gato"
        expr: String,

        /// Use skip lists when the expression is a pure AND of terms
        #[arg(long)]
        skips: bool,
    },

    /// Rank documents by cosine similarity against the query text
    QueryVector {
        /// Free-text query
        text: String,

        /// Number of results
        #[arg(short = 'k', long, default_value = "10")]
        top_k: usize,

        /// Weigh terms with (1+ln tf)·idf instead of raw tf
        #[arg(long)]
        tfidf: bool,
    },

    /// Rank documents by query likelihood under a unigram model
    QueryLm {
        /// Free-text query
        text: String,

        /// Number of results
        #[arg(short = 'k', long, default_value = "10")]
        top_k: usize,

        /// Jelinek-Mercer smoothing weight in [0, 1]; 0 disables smoothing
        #[arg(long, default_value = "0.0")]
        lambda: f64,
    },

    /// Compress every posting list into per-term VByte/Elias-γ files
    CompressIndex {
        /// Store doc-ids as d-gaps before VByte
        #[arg(long)]
        dgaps: bool,

        /// Decompress everything afterwards and compare with the index
        #[arg(long)]
        verify: bool,
    },

    /// Show index statistics, or one term's postings and skips
    Stats {
        /// Inspect a single term instead of the whole index
        #[arg(long)]
        term: Option<String>,
    },
}
