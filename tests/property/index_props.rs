//! Index construction invariants over randomly generated corpora:
//! posting-list ordering, vocabulary soundness, skip-list placement.

use proptest::prelude::*;

use crate::common::build_index_in;

fn corpus_strategy() -> impl Strategy<Value = Vec<String>> {
    let word = "[a-e]{1,3}";
    let doc = prop::collection::vec(word, 1..30).prop_map(|ws| ws.join(" "));
    prop::collection::vec(doc, 1..12)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn posting_lists_are_strictly_increasing_and_df_sound(
        texts in corpus_strategy(),
        memory_limit in 1usize..5,
    ) {
        let dir = tempfile::tempdir().unwrap();
        let docs: Vec<(String, String)> = texts
            .iter()
            .enumerate()
            .map(|(i, t)| (format!("d{i}.txt"), t.clone()))
            .collect();
        let borrowed: Vec<(&str, &str)> =
            docs.iter().map(|(n, t)| (n.as_str(), t.as_str())).collect();
        let index = build_index_in(dir.path(), &borrowed, memory_limit);

        let postings_len = std::fs::metadata(dir.path().join("postings.bin"))
            .unwrap()
            .len();
        let mut covered = 0u64;

        for (term, entry) in index.terms() {
            let postings = index.posting_list(term).unwrap();

            // df counts exactly the records readable at the offset
            prop_assert_eq!(postings.len() as u32, entry.df);
            prop_assert!(entry.offset + u64::from(entry.df) * 8 <= postings_len);
            covered += u64::from(entry.df) * 8;

            // strictly increasing doc-ids, freqs ≥ 1
            prop_assert!(postings.windows(2).all(|w| w[0].doc_id < w[1].doc_id));
            prop_assert!(postings.iter().all(|p| p.freq >= 1 && p.doc_id >= 1));

            // stored freq agrees with the document's own vector
            for p in &postings {
                let vector = index.doc_vector(p.doc_id).unwrap();
                prop_assert_eq!(vector.get(term).copied(), Some(p.freq));
            }
        }
        // posting lists tile the file exactly: contiguous, no gaps
        prop_assert_eq!(covered, postings_len);
    }

    #[test]
    fn skip_lists_sample_positions_zero_k_2k(
        texts in corpus_strategy(),
        memory_limit in 1usize..5,
    ) {
        let dir = tempfile::tempdir().unwrap();
        let docs: Vec<(String, String)> = texts
            .iter()
            .enumerate()
            .map(|(i, t)| (format!("d{i}.txt"), t.clone()))
            .collect();
        let borrowed: Vec<(&str, &str)> =
            docs.iter().map(|(n, t)| (n.as_str(), t.as_str())).collect();
        let index = build_index_in(dir.path(), &borrowed, memory_limit);

        for (term, entry) in index.terms() {
            let postings = index.posting_list(term).unwrap();
            let skip_list = index.skip_list(term);
            let df = postings.len();
            let k = (df as f64).sqrt().floor() as usize;

            if k < 2 {
                prop_assert!(skip_list.is_empty());
                continue;
            }

            let expected: Vec<(u32, u64)> = (0..df)
                .step_by(k)
                .map(|i| (postings[i].doc_id, entry.offset + (i * 8) as u64))
                .collect();
            let actual: Vec<(u32, u64)> = skip_list
                .entries()
                .iter()
                .map(|e| (e.doc_id, e.offset))
                .collect();
            prop_assert_eq!(actual, expected);
        }
    }
}
