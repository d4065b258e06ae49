use std::fs;

use urlguard::{ClassifierError, UrlClassifier};

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

#[test]
fn test_empty_paths_are_rejected() {
    let result = UrlClassifier::builder().with_artifact_files("", "classifier.json");
    assert!(matches!(result, Err(ClassifierError::BuildError(_))));

    let result = UrlClassifier::builder().with_artifact_files("vectorizer.json", "");
    assert!(matches!(result, Err(ClassifierError::BuildError(_))));
}

#[test]
fn test_missing_files_are_rejected() {
    let result = UrlClassifier::builder()
        .with_artifact_files("/nonexistent/vectorizer.json", "/nonexistent/classifier.json");
    assert!(matches!(result, Err(ClassifierError::BuildError(_))));
}

#[test]
fn test_paths_cannot_be_set_twice() {
    let result = UrlClassifier::builder()
        .with_artifact_files(
            &fixture_path("tfidf_vectorizer.json"),
            &fixture_path("mnb_classifier.json"),
        )
        .and_then(|builder| {
            builder.with_artifact_files(
                &fixture_path("tfidf_vectorizer.json"),
                &fixture_path("mnb_classifier.json"),
            )
        });
    assert!(matches!(result, Err(ClassifierError::BuildError(_))));
}

#[test]
fn test_build_without_artifacts_fails() {
    let result = UrlClassifier::builder().build();
    assert!(matches!(result, Err(ClassifierError::BuildError(_))));
}

#[test]
fn test_corrupt_artifact_fails_to_load() {
    let dir = tempfile::tempdir().unwrap();
    let bad_path = dir.path().join("tfidf_vectorizer.json");
    fs::write(&bad_path, "not json at all").unwrap();

    let result = UrlClassifier::builder().with_artifact_files(
        &bad_path.to_string_lossy(),
        &fixture_path("mnb_classifier.json"),
    );
    assert!(matches!(result, Err(ClassifierError::BuildError(_))));
}

#[test]
fn test_dimension_mismatch_fails_at_build() {
    let dir = tempfile::tempdir().unwrap();
    let small_vectorizer = dir.path().join("tfidf_vectorizer.json");
    fs::write(
        &small_vectorizer,
        r#"{"vocabulary": {"foo": 0}, "idf": [1.0]}"#,
    )
    .unwrap();

    // One-dimensional vectorizer against the eight-feature classifier.
    let result = UrlClassifier::builder()
        .with_artifact_files(
            &small_vectorizer.to_string_lossy(),
            &fixture_path("mnb_classifier.json"),
        )
        .unwrap()
        .build();
    assert!(matches!(result, Err(ClassifierError::BuildError(_))));
}

#[test]
fn test_positive_label_must_be_a_class() {
    let result = UrlClassifier::builder()
        .with_artifact_files(
            &fixture_path("tfidf_vectorizer.json"),
            &fixture_path("mnb_classifier.json"),
        )
        .unwrap()
        .with_positive_label("phishy")
        .build();
    assert!(matches!(result, Err(ClassifierError::BuildError(_))));
}

#[test]
fn test_inconsistent_vectorizer_artifact_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let ragged = dir.path().join("tfidf_vectorizer.json");
    // Vocabulary index out of the IDF range.
    fs::write(&ragged, r#"{"vocabulary": {"foo": 7}, "idf": [1.0]}"#).unwrap();

    let result = UrlClassifier::builder().with_artifact_files(
        &ragged.to_string_lossy(),
        &fixture_path("mnb_classifier.json"),
    );
    assert!(matches!(result, Err(ClassifierError::BuildError(_))));
}
