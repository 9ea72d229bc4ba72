//! Shared fixtures: tiny corpora indexed into temp directories.

use std::path::Path;

use lince::{BsbiIndexer, Index, Tokenizer, VecCorpus};

/// The worked three-document corpus used across the end-to-end scenarios.
pub fn scenario_docs() -> Vec<(&'static str, &'static str)> {
    vec![
        ("d1.txt", "casa perro gato casa"),
        ("d2.txt", "perro gato"),
        ("d3.txt", "gato gato raton"),
    ]
}

/// Index `docs` into `dir` and hand back the opened read handle.
pub fn build_index_in(dir: &Path, docs: &[(&str, &str)], memory_limit: usize) -> Index {
    let mut corpus = VecCorpus::new(
        docs.iter()
            .map(|(name, text)| (name.to_string(), text.to_string()))
            .collect(),
    );
    BsbiIndexer::new(Tokenizer::default(), dir, memory_limit)
        .index(&mut corpus, false, None)
        .expect("index build");
    Index::open(dir).expect("index open")
}
