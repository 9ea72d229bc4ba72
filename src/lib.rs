//! Disk-based inverted index engine with blocked sort-based construction.
//!
//! This crate builds a compact on-disk inverted index from a document
//! corpus and serves Boolean, vector-ranked, and language-model queries
//! against it. Posting payloads compress with VByte and Elias-γ codecs.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌───────────────┐
//! │  corpus.rs   │────▶│  build/      │────▶│  index/       │
//! │ (documents)  │     │ (BSBI: runs, │     │ (read handle, │
//! │              │     │  K-way merge)│     │  cursors)     │
//! └──────────────┘     └──────────────┘     └───────┬───────┘
//!        │                    │                     │
//!        ▼                    ▼                     ▼
//! ┌──────────────┐     ┌──────────────┐     ┌───────────────┐
//! │ tokenize.rs  │     │  disk/       │     │  query/       │
//! │ (patterns,   │     │ (postings,   │     │ (boolean,     │
//! │  normalise)  │     │  runs, vocab,│     │  vector, LM)  │
//! │              │     │  skips, docs)│     │               │
//! └──────────────┘     └──────────────┘     └───────────────┘
//! ```
//!
//! `codecs.rs` and `compress/` sit to the side: an offline pass rewriting
//! posting lists as per-term VByte/Elias-γ files and back.
//!
//! # Usage
//!
//! ```ignore
//! use lince::{BsbiIndexer, DirectoryCorpus, Index, Tokenizer};
//!
//! let mut corpus = DirectoryCorpus::open(Path::new("./docs"))?;
//! BsbiIndexer::new(Tokenizer::default(), Path::new("./index"), 1000)
//!     .index(&mut corpus, false, None)?;
//!
//! let index = Index::open(Path::new("./index"))?;
//! let expr = lince::query::boolean::parse("casa AND perro")?;
//! let docs = lince::query::boolean::eval(&index, &expr)?;
//! ```

// Module declarations
pub mod build;
pub mod codecs;
pub mod compress;
pub mod corpus;
pub mod disk;
pub mod error;
pub mod index;
pub mod query;
pub mod tokenize;

// Re-exports for public API
pub use build::{BsbiIndexer, IndexSummary};
pub use compress::{compress_index, decompress_term, verify_roundtrip, CompressionManifest};
pub use corpus::{DirectoryCorpus, Document, DocumentSource, VecCorpus};
pub use disk::posting::{PartialPosting, Posting};
pub use disk::skips::{SkipEntry, SkipList};
pub use disk::vocab::{VocabEntry, Vocabulary};
pub use error::{LinceError, Result};
pub use index::{Index, PostingCursor};
pub use query::vector::Weighting;
pub use query::RankedDoc;
pub use tokenize::{Tokenizer, TokenizerConfig};
