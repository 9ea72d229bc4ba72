// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Lince CLI: build, query, compress, and inspect on-disk inverted indexes.
//!
//! ```bash
//! # Build an index from a directory of .txt/.html documents
//! lince index ./corpus --index-dir ./index
//!
//! # Boolean, vector, and language-model queries
//! lince query-bool "(casa OR raton) AND gato"
//! lince query-vector "gato raton" -k 5
//! lince query-lm "gato" --lambda 0.5
//!
//! # Offline compression and inspection
//! lince compress-index --dgaps --verify
//! lince stats --term gato
//! ```

use std::path::Path;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use lince::build::BsbiIndexer;
use lince::compress::{compress_index, verify_roundtrip};
use lince::corpus::DirectoryCorpus;
use lince::error::Result;
use lince::index::Index;
use lince::query::boolean;
use lince::query::lm::query_likelihood;
use lince::query::vector::{daat_query, Weighting};
use lince::tokenize::{Tokenizer, TokenizerConfig};

mod cli;
use cli::display::{format_size, print_matches, print_ranked};
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("❌ {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let index_dir = Path::new(&cli.index_dir);
    match cli.command {
        Commands::Index {
            corpus,
            memory_limit,
            stopwords,
            min_len,
            max_len,
            overwrite,
        } => {
            let mut config = TokenizerConfig {
                min_len,
                max_len,
                ..Default::default()
            };
            if let Some(path) = stopwords {
                config = config.with_stopword_file(Path::new(&path))?;
            }

            let mut source = DirectoryCorpus::open(Path::new(&corpus))?;
            let pb = spinner("Indexing");
            let mut indexer = BsbiIndexer::new(Tokenizer::new(config), index_dir, memory_limit);
            let summary = indexer.index(&mut source, overwrite, Some(&pb))?;
            pb.finish_and_clear();

            eprintln!("✅ Index built");
            eprintln!(
                "   {} documents │ {} terms │ {} runs │ {} postings",
                summary.doc_count,
                summary.term_count,
                summary.run_count,
                format_size(summary.postings_bytes)
            );
            eprintln!(
                "   ingest {:.2}s │ merge {:.2}s",
                summary.ingest_time.as_secs_f64(),
                summary.merge_time.as_secs_f64()
            );
        }

        Commands::QueryBool { expr, skips } => {
            let index = Index::open(index_dir)?;
            let parsed = boolean::parse(&expr)?;
            let doc_ids = if skips {
                boolean::eval_with_skips(&index, &parsed)?
            } else {
                boolean::eval(&index, &parsed)?
            };
            let matches: Vec<(u32, String)> = doc_ids
                .into_iter()
                .map(|d| (d, index.doc_name(d).unwrap_or_default().to_string()))
                .collect();
            print_matches(&matches);
        }

        Commands::QueryVector { text, top_k, tfidf } => {
            let index = Index::open(index_dir)?;
            let weighting = if tfidf { Weighting::TfIdf } else { Weighting::RawTf };
            let results = daat_query(&index, &Tokenizer::default(), &text, top_k, weighting)?;
            print_ranked(&results);
        }

        Commands::QueryLm { text, top_k, lambda } => {
            let index = Index::open(index_dir)?;
            let results = query_likelihood(&index, &Tokenizer::default(), &text, top_k, lambda)?;
            print_ranked(&results);
        }

        Commands::CompressIndex { dgaps, verify } => {
            let index = Index::open(index_dir)?;
            let pb = ProgressBar::new(index.term_count() as u64);
            pb.set_style(bar_style());
            pb.set_prefix("Compressing");
            let summary = compress_index(&index, index_dir, dgaps, Some(&pb))?;
            pb.finish_and_clear();

            eprintln!(
                "✅ Compressed {} terms ({})",
                summary.term_count,
                if summary.dgaps { "d-gaps" } else { "raw doc-ids" }
            );
            eprintln!(
                "   doc-ids {} │ freqs {} │ total {}",
                format_size(summary.docids_bytes),
                format_size(summary.freqs_bytes),
                format_size(summary.docids_bytes + summary.freqs_bytes)
            );
            if verify {
                verify_roundtrip(&index, index_dir)?;
                eprintln!("   roundtrip verified: every posting list matches");
            }
        }

        Commands::Stats { term } => {
            let index = Index::open(index_dir)?;
            match term {
                Some(term) => print_term_stats(&index, &term)?,
                None => print_index_stats(&index),
            }
        }
    }
    Ok(())
}

fn print_index_stats(index: &Index) {
    println!(
        "{} documents, {} terms",
        index.doc_count(),
        index.term_count()
    );
    for (name, size) in index.artifact_sizes() {
        println!("  {name:<18} {}", format_size(size));
    }

    let mut dfs = index.posting_list_sizes();
    if !dfs.is_empty() {
        dfs.sort_unstable();
        let total: u64 = dfs.iter().map(|&d| u64::from(d)).sum();
        println!(
            "posting list df: min {} │ median {} │ max {} │ mean {:.1}",
            dfs[0],
            dfs[dfs.len() / 2],
            dfs[dfs.len() - 1],
            total as f64 / dfs.len() as f64
        );
    }
}

fn print_term_stats(index: &Index, term: &str) -> Result<()> {
    let term = term.to_lowercase();
    let Some(entry) = index.vocab_entry(&term) else {
        println!("term {term:?} is not in the vocabulary");
        return Ok(());
    };
    println!("term {term:?}: df {} at offset {}", entry.df, entry.offset);

    let postings = index.posting_list(&term)?;
    for p in &postings {
        let name = index.doc_name(p.doc_id).unwrap_or_default();
        println!("  doc {:>6}  freq {:>4}  {}", p.doc_id, p.freq, name);
    }

    let skip_list = index.skip_list(&term);
    if skip_list.is_empty() {
        println!("  no skip list (df < 4)");
    } else {
        let entries = skip_list.entries();
        println!("  skip list ({} samples):", entries.len());
        for e in entries {
            println!("    doc {:>6} @ byte {}", e.doc_id, e.offset);
        }
    }
    Ok(())
}

fn spinner(prefix: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {prefix:<12} {pos} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_prefix(prefix.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{spinner:.cyan} {prefix:<12} [{bar:40.cyan/dim}] {pos}/{len} {msg}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("━━╸")
}
