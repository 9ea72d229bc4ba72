// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Output formatting for the CLI: result tables and byte sizes.

use lince::query::RankedDoc;

/// Human-readable byte count.
pub fn format_size(bytes: u64) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / 1024.0 / 1024.0)
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{bytes} B")
    }
}

/// Print a ranked result list: rank, score, doc-id, name.
pub fn print_ranked(results: &[RankedDoc]) {
    if results.is_empty() {
        println!("(no results)");
        return;
    }
    for (rank, doc) in results.iter().enumerate() {
        println!("{:>3}. {:>10.6}  [{}] {}", rank + 1, doc.score, doc.doc_id, doc.name);
    }
}

/// Print a Boolean result set: doc-id and name per line, then a count.
pub fn print_matches(matches: &[(u32, String)]) {
    for (doc_id, name) in matches {
        println!("[{doc_id}] {name}");
    }
    println!("{} document(s)", matches.len());
}
