// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Error types for the index engine.
//!
//! Four kinds, and only four: bad queries, I/O, corrupt artefacts, and
//! operations attempted at the wrong time. Term-not-in-vocabulary is NOT an
//! error anywhere in this crate; an unknown term is an empty posting list.

use std::path::Path;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LinceError>;

#[derive(Error, Debug)]
pub enum LinceError {
    /// Malformed query input. The message names the offending token.
    #[error("query error: {0}")]
    Query(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// On-disk artefact failed validation: wrong-size record, bad magic,
    /// CRC mismatch, or an inconsistent skip list.
    #[error("corrupt index: {0}")]
    Corrupt(String),

    /// Operation out of order: querying before indexing, or re-indexing
    /// over an existing directory without --overwrite.
    #[error("{0}")]
    Policy(String),
}

impl LinceError {
    /// Missing artefact shorthand used by the loaders.
    pub fn missing_artifact(path: &Path) -> Self {
        LinceError::Policy(format!(
            "index artefact {} not found; run `lince index` first",
            path.display()
        ))
    }
}
