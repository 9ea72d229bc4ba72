// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Offline posting-list compression.
//!
//! For every vocabulary term this writes two files under `compressed/`:
//! `<term>.docids.vb` (VByte over raw doc-ids, or over d-gaps when enabled)
//! and `<term>.freqs.eg` (a u32 count followed by the Elias-γ bit-stream,
//! zero-padded to a byte boundary). A small JSON manifest records which
//! d-gap convention the directory uses, so the reader inverts exactly.
//!
//! Terms go through percent-encoding on their way into filenames; a URL or
//! a decimal number is a perfectly good term but a terrible path.

use std::fs;
use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use serde::{Deserialize, Serialize};

use crate::codecs::{
    compute_dgaps, gamma_decode, gamma_encode, restore_dgaps, vbyte_decode, vbyte_encode,
};
use crate::disk::posting::Posting;
use crate::disk::COMPRESSED_DIRNAME;
use crate::error::{LinceError, Result};
use crate::index::Index;

const MANIFEST_FILENAME: &str = "manifest.json";

/// Sidecar describing how a `compressed/` directory was written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionManifest {
    /// Doc-ids are stored as d-gaps when true, raw when false.
    pub dgaps: bool,
    pub term_count: u32,
}

/// Totals reported after a compression pass.
#[derive(Debug, Clone)]
pub struct CompressionSummary {
    pub term_count: usize,
    pub docids_bytes: u64,
    pub freqs_bytes: u64,
    pub dgaps: bool,
}

/// Compress every posting list of the index into `compressed/`.
pub fn compress_index(
    index: &Index,
    index_dir: &Path,
    dgaps: bool,
    progress: Option<&ProgressBar>,
) -> Result<CompressionSummary> {
    let out_dir = index_dir.join(COMPRESSED_DIRNAME);
    fs::create_dir_all(&out_dir)?;

    let mut docids_bytes = 0u64;
    let mut freqs_bytes = 0u64;
    let mut term_count = 0usize;

    for (term, _) in index.terms() {
        let postings = index.posting_list(term)?;
        let mut doc_ids: Vec<u32> = postings.iter().map(|p| p.doc_id).collect();
        let freqs: Vec<u32> = postings.iter().map(|p| p.freq).collect();

        if dgaps {
            doc_ids = compute_dgaps(&doc_ids);
        }
        let vb = vbyte_encode(&doc_ids);
        fs::write(docids_path(&out_dir, term), &vb)?;
        docids_bytes += vb.len() as u64;

        let gamma = gamma_encode(&freqs)?.into_bytes();
        let mut eg = Vec::with_capacity(4 + gamma.len());
        eg.extend_from_slice(&(freqs.len() as u32).to_le_bytes());
        eg.extend_from_slice(&gamma);
        fs::write(freqs_path(&out_dir, term), &eg)?;
        freqs_bytes += eg.len() as u64;

        term_count += 1;
        if let Some(pb) = progress {
            pb.inc(1);
        }
    }

    let manifest = CompressionManifest {
        dgaps,
        term_count: term_count as u32,
    };
    let json = serde_json::to_string_pretty(&manifest)
        .map_err(|e| LinceError::Corrupt(format!("cannot serialize manifest: {e}")))?;
    fs::write(out_dir.join(MANIFEST_FILENAME), json)?;

    Ok(CompressionSummary {
        term_count,
        docids_bytes,
        freqs_bytes,
        dgaps,
    })
}

/// Read the manifest of a `compressed/` directory.
pub fn read_manifest(index_dir: &Path) -> Result<CompressionManifest> {
    let path = index_dir.join(COMPRESSED_DIRNAME).join(MANIFEST_FILENAME);
    if !path.exists() {
        return Err(LinceError::missing_artifact(&path));
    }
    let json = fs::read_to_string(&path)?;
    serde_json::from_str(&json)
        .map_err(|e| LinceError::Corrupt(format!("{}: invalid manifest: {e}", path.display())))
}

/// Decompress one term's posting list, inverting exactly what
/// [`compress_index`] wrote. Uses the manifest to pick the d-gap
/// convention; the stored count truncates γ values born from pad bits.
pub fn decompress_term(index_dir: &Path, term: &str) -> Result<Vec<Posting>> {
    let manifest = read_manifest(index_dir)?;
    let out_dir = index_dir.join(COMPRESSED_DIRNAME);

    let vb_path = docids_path(&out_dir, term);
    if !vb_path.exists() {
        return Err(LinceError::missing_artifact(&vb_path));
    }
    let mut doc_ids = vbyte_decode(&fs::read(&vb_path)?)?;
    if manifest.dgaps {
        doc_ids = restore_dgaps(&doc_ids);
    }

    let eg_path = freqs_path(&out_dir, term);
    if !eg_path.exists() {
        return Err(LinceError::missing_artifact(&eg_path));
    }
    let eg = fs::read(&eg_path)?;
    if eg.len() < 4 {
        return Err(LinceError::Corrupt(format!(
            "{}: missing frequency count header",
            eg_path.display()
        )));
    }
    let count = u32::from_le_bytes([eg[0], eg[1], eg[2], eg[3]]) as usize;
    let freqs = gamma_decode(&eg[4..], count)?;

    if doc_ids.len() != freqs.len() {
        return Err(LinceError::Corrupt(format!(
            "term {term:?}: {} doc-ids but {} frequencies",
            doc_ids.len(),
            freqs.len()
        )));
    }
    Ok(doc_ids
        .into_iter()
        .zip(freqs)
        .map(|(doc_id, freq)| Posting { doc_id, freq })
        .collect())
}

/// Decompress every term and compare against the live index. Any mismatch
/// is a data error naming the term.
pub fn verify_roundtrip(index: &Index, index_dir: &Path) -> Result<()> {
    for (term, _) in index.terms() {
        let original = index.posting_list(term)?;
        let restored = decompress_term(index_dir, term)?;
        if original != restored {
            return Err(LinceError::Corrupt(format!(
                "compressed postings for term {term:?} do not match the index"
            )));
        }
    }
    Ok(())
}

fn docids_path(out_dir: &Path, term: &str) -> PathBuf {
    out_dir.join(format!("{}.docids.vb", term_file_stem(term)))
}

fn freqs_path(out_dir: &Path, term: &str) -> PathBuf {
    out_dir.join(format!("{}.freqs.eg", term_file_stem(term)))
}

/// Percent-encode a term into a path-safe file stem. `[A-Za-z0-9_-]` pass
/// through; everything else (slashes, dots, colons, spaces, non-ASCII)
/// becomes `%XX` per UTF-8 byte.
fn term_file_stem(term: &str) -> String {
    let mut stem = String::with_capacity(term.len());
    for byte in term.bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_' | b'-' => stem.push(byte as char),
            _ => {
                stem.push('%');
                stem.push_str(&format!("{byte:02X}"));
            }
        }
    }
    stem
}
