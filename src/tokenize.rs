// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Text → normalised token stream.
//!
//! Extraction runs the pattern categories in priority order — URLs, emails,
//! multi-word proper nouns, numbers, plain words — masking each match out of
//! the working text so a URL never also yields its host words. Matches from
//! all categories are then re-ordered by their position in the original
//! text, because downstream consumers count on document order.
//!
//! Normalisation after extraction: trim, lowercase, length filter, stop-word
//! filter. The tokeniser never fails; encoding problems are the document
//! reader's business.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::Result;

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    // scheme://host[:port][/path][?query][#frag]
    Regex::new(
        r"\b[a-zA-Z][a-zA-Z0-9+.\-]*://[a-zA-Z0-9.\-]+\.[A-Za-z]{2,}(?::\d{1,5})?(?:/[^\s?#]*)?(?:\?[^\s#]*)?(?:\#\S*)?",
    )
    .expect("valid URL pattern")
});

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9._+\-]+@[a-zA-Z0-9.\-]+\.[A-Za-z]{2,}").expect("valid email pattern")
});

static PROPER_NOUN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    // Two or more capitalised words, e.g. "Domingo Faustino Sarmiento"
    Regex::new(r"[A-ZÁÉÍÓÚÜÑ][a-záéíóúüñ]+(?:\s+[A-ZÁÉÍÓÚÜÑ][a-záéíóúüñ]+)+")
        .expect("valid proper noun pattern")
});

static NUMBER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    // Digits with optional '.', ',' or '-' groups: dates, decimals, phones
    Regex::new(r"\d+(?:[-.,]\d+)*").expect("valid number pattern")
});

static WORD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\p{L}+").expect("valid word pattern"));

/// Tokeniser configuration: inclusive token length bounds plus an optional
/// stop-word set applied after normalisation.
#[derive(Debug, Clone)]
pub struct TokenizerConfig {
    pub min_len: usize,
    pub max_len: usize,
    pub stopwords: HashSet<String>,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            min_len: 1,
            max_len: 20,
            stopwords: HashSet::new(),
        }
    }
}

impl TokenizerConfig {
    /// Load stop words from a file, one token per line, lowercased.
    pub fn with_stopword_file(mut self, path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        self.stopwords = content
            .lines()
            .map(|line| line.trim().to_lowercase())
            .filter(|line| !line.is_empty())
            .collect();
        Ok(self)
    }
}

#[derive(Debug, Clone)]
pub struct Tokenizer {
    config: TokenizerConfig,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(TokenizerConfig::default())
    }
}

impl Tokenizer {
    pub fn new(config: TokenizerConfig) -> Self {
        Self { config }
    }

    /// Split text into normalised tokens in order of occurrence.
    /// Duplicates are kept; counting them is the caller's job.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let mut found: Vec<(usize, String)> = Vec::new();
        let mut working = text.to_string();

        for pattern in [&*URL_PATTERN, &*EMAIL_PATTERN, &*PROPER_NOUN_PATTERN, &*NUMBER_PATTERN] {
            extract(pattern, &mut working, &mut found);
        }
        // Plain words never need masking; they are the lowest priority.
        for m in WORD_PATTERN.find_iter(&working) {
            found.push((m.start(), m.as_str().to_string()));
        }

        found.sort_by_key(|(start, _)| *start);
        found
            .into_iter()
            .filter_map(|(_, raw)| self.normalize(&raw))
            .collect()
    }

    /// Trim, lowercase, then apply the length and stop-word filters.
    fn normalize(&self, raw: &str) -> Option<String> {
        let token = raw.trim().to_lowercase();
        let len = token.chars().count();
        if len < self.config.min_len || len > self.config.max_len {
            return None;
        }
        if self.config.stopwords.contains(&token) {
            return None;
        }
        Some(token)
    }
}

/// Collect every match of `pattern` with its byte position, then blank the
/// matched spans out of the working text so lower-priority categories never
/// re-tokenise them. Spans align to character boundaries, so byte-wise
/// space-filling keeps the text valid UTF-8.
fn extract(pattern: &Regex, working: &mut String, found: &mut Vec<(usize, String)>) {
    let spans: Vec<(usize, usize)> = pattern
        .find_iter(working)
        .map(|m| {
            found.push((m.start(), m.as_str().to_string()));
            (m.start(), m.end())
        })
        .collect();
    if spans.is_empty() {
        return;
    }

    let mut bytes = std::mem::take(working).into_bytes();
    for (start, end) in spans {
        bytes[start..end].fill(b' ');
    }
    *working = String::from_utf8(bytes).unwrap_or_default();
}
