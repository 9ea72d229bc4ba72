//! Framed artefact validation: magic, version, CRC, truncation.

use lince::disk::docs::{DocMap, DocVectors};
use lince::disk::skips::SkipFile;
use lince::LinceError;

use crate::common::{build_index_in, scenario_docs};

#[test]
fn all_artifacts_survive_a_store_load_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let index = build_index_in(dir.path(), &scenario_docs(), 1000);

    // Everything the open() already validated; spot-check the loaders again
    let skips = SkipFile::load(&dir.path().join("skips.dat")).unwrap();
    assert!(skips.is_empty() || skips.len() <= index.term_count());

    let map = DocMap::load(&dir.path().join("metadata.dat")).unwrap();
    assert_eq!(map.len(), 3);

    let vectors = DocVectors::load(&dir.path().join("doc_vectors.dat")).unwrap();
    assert_eq!(vectors.len(), 3);
}

#[test]
fn wrong_magic_is_a_data_error() {
    let dir = tempfile::tempdir().unwrap();
    build_index_in(dir.path(), &scenario_docs(), 1000);

    let path = dir.path().join("metadata.dat");
    let mut bytes = std::fs::read(&path).unwrap();
    bytes[0] ^= 0xFF;
    std::fs::write(&path, &bytes).unwrap();

    assert!(matches!(DocMap::load(&path), Err(LinceError::Corrupt(_))));
}

#[test]
fn truncated_artifact_is_a_data_error() {
    let dir = tempfile::tempdir().unwrap();
    build_index_in(dir.path(), &scenario_docs(), 1000);

    let path = dir.path().join("vocabulary.dat");
    let bytes = std::fs::read(&path).unwrap();
    std::fs::write(&path, &bytes[..bytes.len() - 3]).unwrap();

    assert!(matches!(
        lince::Vocabulary::load(&path),
        Err(LinceError::Corrupt(_))
    ));
}

#[test]
fn unsupported_version_is_a_data_error() {
    let dir = tempfile::tempdir().unwrap();
    build_index_in(dir.path(), &scenario_docs(), 1000);

    let path = dir.path().join("metadata.dat");
    let mut bytes = std::fs::read(&path).unwrap();
    bytes[4] = 99;
    // Fix the CRC so only the version check can fire
    let body_end = bytes.len() - 4;
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&bytes[..body_end]);
    let crc = hasher.finalize().to_le_bytes();
    bytes[body_end..].copy_from_slice(&crc);
    std::fs::write(&path, &bytes).unwrap();

    let err = DocMap::load(&path).unwrap_err();
    assert!(err.to_string().contains("version"), "{err}");
}
