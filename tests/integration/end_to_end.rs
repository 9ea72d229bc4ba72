//! The worked corpus:
//!
//! | doc | text                   |
//! |-----|------------------------|
//! | 1   | casa perro gato casa   |
//! | 2   | perro gato             |
//! | 3   | gato gato raton        |

use std::collections::BTreeSet;

use lince::query::boolean;
use lince::query::lm::query_likelihood;
use lince::query::vector::{daat_query, Weighting};
use lince::{compress_index, decompress_term, Index, LinceError, Posting, Tokenizer};

use crate::common::{build_index_in, scenario_docs};

fn ids(set: &BTreeSet<u32>) -> Vec<u32> {
    set.iter().copied().collect()
}

#[test]
fn indexing_produces_the_worked_posting_table() {
    let dir = tempfile::tempdir().unwrap();
    let index = build_index_in(dir.path(), &scenario_docs(), 1000);

    assert_eq!(index.doc_count(), 3);
    assert_eq!(index.term_count(), 4);
    assert_eq!(index.doc_name(1), Some("d1.txt"));
    assert_eq!(index.doc_name(3), Some("d3.txt"));

    let table = [
        ("casa", vec![(1, 2)]),
        ("perro", vec![(1, 1), (2, 1)]),
        ("gato", vec![(1, 1), (2, 1), (3, 2)]),
        ("raton", vec![(3, 1)]),
    ];
    for (term, expected) in table {
        let postings: Vec<(u32, u32)> = index
            .posting_list(term)
            .unwrap()
            .into_iter()
            .map(|p| (p.doc_id, p.freq))
            .collect();
        assert_eq!(postings, expected, "term {term}");
    }
}

#[test]
fn boolean_scenarios() {
    let dir = tempfile::tempdir().unwrap();
    let index = build_index_in(dir.path(), &scenario_docs(), 1000);

    let cases = [
        ("casa AND perro", vec![1]),
        ("gato AND NOT perro", vec![3]),
        ("(casa OR raton) AND gato", vec![1, 3]),
        ("casa OR perro OR raton", vec![1, 2, 3]),
        ("NOT gato", vec![]),
    ];
    for (expr_text, expected) in cases {
        let expr = boolean::parse(expr_text).unwrap();
        assert_eq!(ids(&boolean::eval(&index, &expr).unwrap()), expected, "{expr_text}");
        // the skip-aware evaluator must agree on every expression
        assert_eq!(
            ids(&boolean::eval_with_skips(&index, &expr).unwrap()),
            expected,
            "{expr_text} (skips)"
        );
    }
}

#[test]
fn vector_scenario_doc3_strictly_first() {
    let dir = tempfile::tempdir().unwrap();
    let index = build_index_in(dir.path(), &scenario_docs(), 1000);

    let results = daat_query(&index, &Tokenizer::default(), "gato raton", 3, Weighting::RawTf)
        .unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].doc_id, 3);
    assert!(results[0].score > results[1].score);
    // docs 1 and 2 trail in some order behind doc 3
    let tail: BTreeSet<u32> = results[1..].iter().map(|r| r.doc_id).collect();
    assert_eq!(tail, BTreeSet::from([1, 2]));
}

#[test]
fn language_model_scenario_exact_scores() {
    let dir = tempfile::tempdir().unwrap();
    let index = build_index_in(dir.path(), &scenario_docs(), 1000);

    let results = query_likelihood(&index, &Tokenizer::default(), "gato", 10, 0.0).unwrap();
    let ranked: Vec<u32> = results.iter().map(|r| r.doc_id).collect();
    // p(gato|d): d1 = 1/4, d2 = 1/2, d3 = 2/3 → descending: 3, 2, 1
    assert_eq!(ranked, vec![3, 2, 1]);
    assert!((results[0].score - (2f64 / 3.0).ln()).abs() < 1e-12);
    assert!((results[1].score - (1f64 / 2.0).ln()).abs() < 1e-12);
    assert!((results[2].score - (1f64 / 4.0).ln()).abs() < 1e-12);
}

#[test]
fn language_model_smoothing_and_sentinel() {
    let dir = tempfile::tempdir().unwrap();
    let index = build_index_in(dir.path(), &scenario_docs(), 1000);

    // Unsmoothed: "casa" is missing from docs 2 and 3 → −100 each
    let results = query_likelihood(&index, &Tokenizer::default(), "casa", 10, 0.0).unwrap();
    assert_eq!(results[0].doc_id, 1);
    assert!((results[1].score - -100.0).abs() < 1e-12);
    assert!((results[2].score - -100.0).abs() < 1e-12);

    // Smoothed: the collection model rescues the missing docs; cf(casa)=2, |C|=9
    let smoothed = query_likelihood(&index, &Tokenizer::default(), "casa", 10, 0.5).unwrap();
    assert_eq!(smoothed[0].doc_id, 1);
    let expected_d1 = (0.5_f64 * 0.5 + 0.5 * (2.0 / 9.0)).ln();
    assert!((smoothed[0].score - expected_d1).abs() < 1e-12);
    assert!(smoothed[1].score > -100.0);

    // Out-of-range lambda is an input error
    assert!(matches!(
        query_likelihood(&index, &Tokenizer::default(), "casa", 10, 1.5),
        Err(LinceError::Query(_))
    ));
}

#[test]
fn compression_scenario_gato_with_dgaps() {
    let dir = tempfile::tempdir().unwrap();
    let index = build_index_in(dir.path(), &scenario_docs(), 1000);
    compress_index(&index, dir.path(), true, None).unwrap();

    let restored = decompress_term(dir.path(), "gato").unwrap();
    assert_eq!(
        restored,
        vec![
            Posting { doc_id: 1, freq: 1 },
            Posting { doc_id: 2, freq: 1 },
            Posting { doc_id: 3, freq: 2 },
        ]
    );
}

#[test]
fn querying_an_unbuilt_directory_is_a_policy_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        Index::open(dir.path()),
        Err(LinceError::Policy(_))
    ));
}

#[test]
fn multi_run_build_serves_identical_queries() {
    let one_run = tempfile::tempdir().unwrap();
    let many_runs = tempfile::tempdir().unwrap();
    let a = build_index_in(one_run.path(), &scenario_docs(), 1000);
    let b = build_index_in(many_runs.path(), &scenario_docs(), 1);

    let expr = boolean::parse("(casa OR raton) AND gato").unwrap();
    assert_eq!(
        boolean::eval(&a, &expr).unwrap(),
        boolean::eval(&b, &expr).unwrap()
    );
}
