// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Boolean retrieval: parse, then term-at-a-time set algebra.
//!
//! The grammar is the obvious one — AND, OR, NOT (unary, so `AND NOT`
//! composes for free), parentheses, everything else a term. Precedence is
//! NOT > AND > OR. The symbolic forms `&`, `|`, `~` are accepted as
//! synonyms. Terms are lowercased to match the indexed vocabulary; a term
//! the vocabulary has never seen evaluates to the empty set, which is not
//! an error.
//!
//! `NOT x` complements against the full set of assigned doc-ids, so
//! `NOT unknown` is every document.
//!
//! The skip-accelerated path only exists for conjunctions of plain terms;
//! anything else falls back to the general evaluator.

use std::collections::BTreeSet;

use crate::error::{LinceError, Result};
use crate::index::Index;

// ============================================================================
// PARSING
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Term(String),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    And,
    Or,
    Not,
    LParen,
    RParen,
    Term(String),
}

fn lex(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut word = String::new();
    let flush = |word: &mut String, tokens: &mut Vec<Token>| {
        if word.is_empty() {
            return;
        }
        let token = match word.to_ascii_uppercase().as_str() {
            "AND" => Token::And,
            "OR" => Token::Or,
            "NOT" => Token::Not,
            _ => Token::Term(word.to_lowercase()),
        };
        tokens.push(token);
        word.clear();
    };

    for c in input.chars() {
        match c {
            '(' | ')' | '&' | '|' | '~' => {
                flush(&mut word, &mut tokens);
                tokens.push(match c {
                    '(' => Token::LParen,
                    ')' => Token::RParen,
                    '&' => Token::And,
                    '|' => Token::Or,
                    _ => Token::Not,
                });
            }
            c if c.is_whitespace() => flush(&mut word, &mut tokens),
            c => word.push(c),
        }
    }
    flush(&mut word, &mut tokens);
    tokens
}

/// Recursive-descent parser: or → and → unary → atom.
struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Option<Token> {
        let t = self.tokens.get(self.pos).cloned();
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    fn parse_or(&mut self) -> Result<Expr> {
        let mut left = self.parse_and()?;
        while self.peek() == Some(&Token::Or) {
            self.bump();
            let right = self.parse_and()?;
            left = Expr::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr> {
        let mut left = self.parse_unary()?;
        while self.peek() == Some(&Token::And) {
            self.bump();
            let right = self.parse_unary()?;
            left = Expr::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        if self.peek() == Some(&Token::Not) {
            self.bump();
            let inner = self.parse_unary()?;
            return Ok(Expr::Not(Box::new(inner)));
        }
        self.parse_atom()
    }

    fn parse_atom(&mut self) -> Result<Expr> {
        match self.bump() {
            Some(Token::Term(t)) => Ok(Expr::Term(t)),
            Some(Token::LParen) => {
                let inner = self.parse_or()?;
                match self.bump() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err(LinceError::Query("missing closing parenthesis".into())),
                }
            }
            Some(other) => Err(LinceError::Query(format!(
                "unexpected token {}",
                describe(&other)
            ))),
            None => Err(LinceError::Query("expression ended unexpectedly".into())),
        }
    }
}

fn describe(token: &Token) -> String {
    match token {
        Token::And => "AND".into(),
        Token::Or => "OR".into(),
        Token::Not => "NOT".into(),
        Token::LParen => "'('".into(),
        Token::RParen => "')'".into(),
        Token::Term(t) => format!("{t:?}"),
    }
}

/// Parse a Boolean expression, reporting the offending token on failure.
pub fn parse(input: &str) -> Result<Expr> {
    let tokens = lex(input);
    if tokens.is_empty() {
        return Err(LinceError::Query("empty query expression".into()));
    }
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.parse_or()?;
    if let Some(extra) = parser.peek() {
        return Err(LinceError::Query(format!(
            "unexpected token {} after expression",
            describe(extra)
        )));
    }
    Ok(expr)
}

// ============================================================================
// EVALUATION (TAAT)
// ============================================================================

/// Evaluate an expression to the matching doc-ids, term at a time.
pub fn eval(index: &Index, expr: &Expr) -> Result<BTreeSet<u32>> {
    match expr {
        Expr::Term(t) => Ok(index
            .posting_list(t)?
            .into_iter()
            .map(|p| p.doc_id)
            .collect()),
        Expr::And(a, b) => {
            let left = eval(index, a)?;
            if left.is_empty() {
                return Ok(left);
            }
            let right = eval(index, b)?;
            Ok(left.intersection(&right).copied().collect())
        }
        Expr::Or(a, b) => {
            let left = eval(index, a)?;
            let right = eval(index, b)?;
            Ok(left.union(&right).copied().collect())
        }
        Expr::Not(inner) => {
            let matched = eval(index, inner)?;
            Ok(index.doc_ids().filter(|d| !matched.contains(d)).collect())
        }
    }
}

/// Evaluate with the skip-accelerated AND when the expression is a pure
/// conjunction of at least two terms; otherwise fall back to [`eval`].
pub fn eval_with_skips(index: &Index, expr: &Expr) -> Result<BTreeSet<u32>> {
    match conjunction_terms(expr) {
        Some(terms) if terms.len() >= 2 => and_with_skips(index, terms),
        _ => eval(index, expr),
    }
}

/// Flatten `a AND b AND c …` into its term list; None when the expression
/// contains anything but terms and ANDs.
fn conjunction_terms(expr: &Expr) -> Option<Vec<&str>> {
    match expr {
        Expr::Term(t) => Some(vec![t.as_str()]),
        Expr::And(a, b) => {
            let mut terms = conjunction_terms(a)?;
            terms.extend(conjunction_terms(b)?);
            Some(terms)
        }
        _ => None,
    }
}

/// Skip-accelerated conjunction: most selective term first, then one
/// galloping intersection per remaining term, jumping the disk cursor via
/// its skip list whenever it lags.
fn and_with_skips(index: &Index, mut terms: Vec<&str>) -> Result<BTreeSet<u32>> {
    // Ascending df; unknown terms have df 0 and empty the result at once.
    terms.sort_by_key(|t| index.vocab_entry(t).map(|e| e.df).unwrap_or(0));

    let mut result: Vec<u32> = index
        .posting_list(terms[0])?
        .into_iter()
        .map(|p| p.doc_id)
        .collect();

    for term in &terms[1..] {
        if result.is_empty() {
            break;
        }
        result = intersect_with_skips(index, &result, term)?;
    }
    Ok(result.into_iter().collect())
}

/// Intersect an in-memory doc-id list with one on-disk posting list.
/// The disk side jumps through its skip list; the memory side gallops.
fn intersect_with_skips(index: &Index, result: &[u32], term: &str) -> Result<Vec<u32>> {
    let Some(mut cursor) = index.posting_cursor(term)? else {
        return Ok(Vec::new());
    };
    let skip_list = index.skip_list(term);
    let mut skips = skip_list.cursor();

    let mut out = Vec::new();
    let mut i = 0;
    while i < result.len() {
        let Some(posting) = cursor.current() else {
            break;
        };
        let wanted = result[i];
        if posting.doc_id == wanted {
            out.push(wanted);
            i += 1;
            cursor.advance()?;
        } else if posting.doc_id < wanted {
            match skips.advance_to(wanted, cursor.pos()) {
                Some(offset) => cursor.seek_to(offset)?,
                None => cursor.advance()?,
            }
        } else {
            i = gallop(result, i + 1, posting.doc_id);
        }
    }
    Ok(out)
}

/// First position ≥ `from` whose value is ≥ `target`, by doubling probes
/// then a binary search over the bracketed window.
fn gallop(xs: &[u32], from: usize, target: u32) -> usize {
    let mut hi = from;
    let mut step = 1;
    while hi < xs.len() && xs[hi] < target {
        hi += step;
        step *= 2;
    }
    let lo = hi.saturating_sub(step / 2).max(from);
    let hi = hi.min(xs.len());
    lo + xs[lo..hi].partition_point(|&x| x < target)
}
