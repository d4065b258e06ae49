use std::collections::HashMap;
use std::path::Path;

use ndarray::Array1;
use serde::Deserialize;

use super::tokenize::tokenize;
use crate::artifacts::ArtifactError;

/// A fitted TF-IDF vectorizer, loaded from an opaque artifact file.
///
/// The artifact carries the fit-time vocabulary (token to column index) and
/// the per-term inverse-document-frequency weights. Serving-time code only
/// replays the transform: term counts over the vocabulary, scaled by IDF,
/// then L2-normalized. [`tokenize`] is the analyzer and must be the same
/// tokenizer the vocabulary was fitted with.
#[derive(Clone, Deserialize)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl std::fmt::Debug for TfidfVectorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TfidfVectorizer")
            .field("vocabulary_size", &self.vocabulary.len())
            .finish()
    }
}

impl TfidfVectorizer {
    /// Loads and validates a fitted vectorizer artifact.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ArtifactError> {
        let bytes = std::fs::read(path.as_ref())?;
        let vectorizer: Self = serde_json::from_slice(&bytes)?;
        vectorizer.validate()?;
        Ok(vectorizer)
    }

    fn validate(&self) -> Result<(), ArtifactError> {
        if self.vocabulary.is_empty() {
            return Err(ArtifactError::InvalidArtifact(
                "vectorizer vocabulary is empty".to_string(),
            ));
        }
        if self.idf.len() != self.vocabulary.len() {
            return Err(ArtifactError::InvalidArtifact(format!(
                "IDF length {} does not match vocabulary size {}",
                self.idf.len(),
                self.vocabulary.len()
            )));
        }
        if let Some((token, &index)) = self
            .vocabulary
            .iter()
            .find(|(_, &index)| index >= self.idf.len())
        {
            return Err(ArtifactError::InvalidArtifact(format!(
                "vocabulary index {} for token {:?} is out of range",
                index, token
            )));
        }
        if self.idf.iter().any(|w| !w.is_finite()) {
            return Err(ArtifactError::InvalidArtifact(
                "IDF weights must be finite".to_string(),
            ));
        }
        Ok(())
    }

    /// Transforms text into the fixed-dimension feature vector the fitted
    /// classifier expects. Tokens absent from the vocabulary contribute zero
    /// weight, so unknown input vectorizes to the zero vector rather than
    /// erroring.
    pub fn transform(&self, text: &str) -> Array1<f64> {
        let mut features = Array1::<f64>::zeros(self.idf.len());
        for token in tokenize(text) {
            if let Some(&index) = self.vocabulary.get(&token) {
                features[index] += 1.0;
            }
        }
        for (index, weight) in features.iter_mut().enumerate() {
            *weight *= self.idf[index];
        }
        let norm = features.dot(&features).sqrt();
        if norm > 0.0 {
            features /= norm;
        }
        features
    }

    /// The fixed feature dimension set by the fitted vocabulary.
    pub fn dimension(&self) -> usize {
        self.idf.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fixture() -> TfidfVectorizer {
        serde_json::from_value(json!({
            "vocabulary": {"foo": 0, "bar": 1, "baz": 2},
            "idf": [1.0, 2.0, 2.0]
        }))
        .unwrap()
    }

    #[test]
    fn test_transform_counts_and_normalizes() {
        let vectorizer = fixture();
        let features = vectorizer.transform("bar/bar");
        // counts [0, 2, 0] scaled by idf then L2-normalized.
        assert!((features[1] - 1.0).abs() < 1e-12);
        assert_eq!(features[0], 0.0);
        assert_eq!(features[2], 0.0);
    }

    #[test]
    fn test_transform_unknown_tokens_yield_zero_vector() {
        let vectorizer = fixture();
        let features = vectorizer.transform("quux/zzz");
        assert!(features.iter().all(|&w| w == 0.0));
        assert_eq!(features.len(), vectorizer.dimension());
    }

    #[test]
    fn test_transform_uses_dot_decomposition() {
        let vectorizer = fixture();
        // "foo.com" decomposes to a "foo" fragment that hits the vocabulary.
        let features = vectorizer.transform("foo.com");
        assert!(features[0] > 0.0);
    }

    #[test]
    fn test_validate_rejects_idf_length_mismatch() {
        let result: Result<(), _> = serde_json::from_value::<TfidfVectorizer>(json!({
            "vocabulary": {"foo": 0, "bar": 1},
            "idf": [1.0]
        }))
        .unwrap()
        .validate();
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_range_index() {
        let result = serde_json::from_value::<TfidfVectorizer>(json!({
            "vocabulary": {"foo": 5},
            "idf": [1.0]
        }))
        .unwrap()
        .validate();
        assert!(result.is_err());
    }
}
