//! Tokeniser behaviour beyond the basics covered in-module.

use std::io::Write;

use lince::{Tokenizer, TokenizerConfig};

#[test]
fn priority_order_url_beats_email_beats_word() {
    let toks = Tokenizer::default().tokenize("ana@ej.com y ftp://ej.com/a");
    assert_eq!(toks, ["ana@ej.com", "y", "ftp://ej.com/a"]);
}

#[test]
fn url_does_not_leak_host_words() {
    let toks = Tokenizer::default().tokenize("ir a http://casa.com ya");
    assert!(toks.contains(&"http://casa.com".to_string()));
    assert!(!toks.contains(&"casa".to_string()));
    assert!(!toks.contains(&"com".to_string()));
}

#[test]
fn numbers_with_groups_and_plain_digits() {
    let toks = Tokenizer::default().tokenize("5 12,5 2024-06-01 v2");
    assert_eq!(toks, ["5", "12,5", "2024-06-01", "v", "2"]);
}

#[test]
fn tokenizer_never_fails_on_odd_input() {
    let tokenizer = Tokenizer::default();
    assert!(tokenizer.tokenize("").is_empty());
    assert!(tokenizer.tokenize("¡¿!?···---").is_empty());
    assert_eq!(tokenizer.tokenize("\u{FFFD}ñ"), ["ñ"]);
}

#[test]
fn stopword_file_is_one_token_per_line() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "el\nLA\n\n  de  ").unwrap();

    let config = TokenizerConfig::default()
        .with_stopword_file(file.path())
        .unwrap();
    let tokenizer = Tokenizer::new(config);
    assert_eq!(
        tokenizer.tokenize("el gato de la casa"),
        ["gato", "casa"]
    );
}

#[test]
fn missing_stopword_file_is_an_io_error() {
    let result = TokenizerConfig::default()
        .with_stopword_file(std::path::Path::new("/no/such/stopwords.txt"));
    assert!(matches!(result, Err(lince::LinceError::Io(_))));
}
