use std::fs;

use urlguard::{ArtifactStore, BuiltinArtifact};

#[test]
fn test_fresh_store_has_no_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path()).unwrap();
    assert!(!store.is_downloaded(BuiltinArtifact::MnbTfidf));
}

#[test]
fn test_store_creates_its_directory() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("deep").join("cache");
    let _store = ArtifactStore::new(&nested).unwrap();
    assert!(nested.is_dir());
}

#[test]
fn test_corrupted_artifact_fails_verification() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path()).unwrap();
    let artifact = BuiltinArtifact::MnbTfidf;

    let vectorizer_path = store.get_vectorizer_path(artifact);
    let classifier_path = store.get_classifier_path(artifact);
    fs::create_dir_all(vectorizer_path.parent().unwrap()).unwrap();
    fs::write(&vectorizer_path, "corrupted data").unwrap();
    fs::write(&classifier_path, "corrupted data").unwrap();

    assert!(store.is_downloaded(artifact));
    assert!(!store.verify(artifact).unwrap());
}

#[test]
fn test_verification_of_missing_artifact_is_false_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path()).unwrap();
    assert!(!store.verify(BuiltinArtifact::MnbTfidf).unwrap());
}

#[test]
fn test_remove_download_clears_both_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path()).unwrap();
    let artifact = BuiltinArtifact::MnbTfidf;

    let vectorizer_path = store.get_vectorizer_path(artifact);
    let classifier_path = store.get_classifier_path(artifact);
    fs::create_dir_all(vectorizer_path.parent().unwrap()).unwrap();
    fs::write(&vectorizer_path, "{}").unwrap();
    fs::write(&classifier_path, "{}").unwrap();
    assert!(store.is_downloaded(artifact));

    store.remove_download(artifact).unwrap();
    assert!(!store.is_downloaded(artifact));
}

#[test]
fn test_remove_download_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path()).unwrap();
    assert!(store.remove_download(BuiltinArtifact::MnbTfidf).is_ok());
    assert!(store.remove_download(BuiltinArtifact::MnbTfidf).is_ok());
}
