use std::path::Path;

use ndarray::{Array1, Array2};
use serde::Deserialize;

use super::error::ClassifierError;
use crate::artifacts::ArtifactError;

/// On-disk schema of the fitted classifier artifact.
#[derive(Deserialize)]
struct RawModel {
    classes: Vec<String>,
    class_log_prior: Vec<f64>,
    feature_log_prob: Vec<Vec<f64>>,
}

/// A fitted multinomial naive Bayes classifier, loaded from an opaque
/// artifact file.
///
/// The artifact carries the class labels, the log priors, and the per-class
/// feature log-probabilities estimated at fit time. Serving-time code only
/// replays inference: the joint log-likelihood of a feature vector is the
/// class log prior plus the feature-weighted sum of log-probabilities, the
/// predicted class is its argmax, and the class-probability distribution is
/// its log-sum-exp normalization.
#[derive(Clone)]
pub struct MultinomialNb {
    classes: Vec<String>,
    class_log_prior: Array1<f64>,
    feature_log_prob: Array2<f64>,
}

impl std::fmt::Debug for MultinomialNb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultinomialNb")
            .field("classes", &self.classes)
            .field("n_features", &self.n_features())
            .finish()
    }
}

impl MultinomialNb {
    /// Loads and validates a fitted classifier artifact.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ArtifactError> {
        let bytes = std::fs::read(path.as_ref())?;
        let raw: RawModel = serde_json::from_slice(&bytes)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawModel) -> Result<Self, ArtifactError> {
        let n_classes = raw.classes.len();
        if n_classes == 0 {
            return Err(ArtifactError::InvalidArtifact(
                "classifier has no classes".to_string(),
            ));
        }
        if raw.class_log_prior.len() != n_classes {
            return Err(ArtifactError::InvalidArtifact(format!(
                "{} log priors for {} classes",
                raw.class_log_prior.len(),
                n_classes
            )));
        }
        if raw.feature_log_prob.len() != n_classes {
            return Err(ArtifactError::InvalidArtifact(format!(
                "{} feature log-probability rows for {} classes",
                raw.feature_log_prob.len(),
                n_classes
            )));
        }
        let n_features = raw.feature_log_prob[0].len();
        if raw.feature_log_prob.iter().any(|row| row.len() != n_features) {
            return Err(ArtifactError::InvalidArtifact(
                "feature log-probability rows have unequal lengths".to_string(),
            ));
        }

        let flat: Vec<f64> = raw.feature_log_prob.into_iter().flatten().collect();
        let feature_log_prob = Array2::from_shape_vec((n_classes, n_features), flat)
            .map_err(|e| ArtifactError::InvalidArtifact(e.to_string()))?;

        Ok(Self {
            classes: raw.classes,
            class_log_prior: Array1::from_vec(raw.class_log_prior),
            feature_log_prob,
        })
    }

    /// Class labels in artifact order; probability distributions returned by
    /// [`predict_proba`](Self::predict_proba) index into this slice.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// The feature dimension the artifact was fitted on.
    pub fn n_features(&self) -> usize {
        self.feature_log_prob.ncols()
    }

    fn joint_log_likelihood(
        &self,
        features: &Array1<f64>,
    ) -> Result<Array1<f64>, ClassifierError> {
        if features.len() != self.n_features() {
            return Err(ClassifierError::VectorizationError(format!(
                "feature vector has dimension {} but the classifier expects {}",
                features.len(),
                self.n_features()
            )));
        }
        Ok(&self.class_log_prior + &self.feature_log_prob.dot(features))
    }

    /// Returns the class-probability distribution for a feature vector.
    /// Every entry is in [0, 1] and the distribution sums to 1.
    pub fn predict_proba(
        &self,
        features: &Array1<f64>,
    ) -> Result<Array1<f64>, ClassifierError> {
        let jll = self.joint_log_likelihood(features)?;
        let max = jll.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let log_sum = jll.iter().map(|v| (v - max).exp()).sum::<f64>().ln() + max;
        Ok(jll.mapv(|v| (v - log_sum).exp()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fixture() -> MultinomialNb {
        let raw: RawModel = serde_json::from_value(json!({
            "classes": ["bad", "good"],
            "class_log_prior": [-0.6931471805599453, -0.6931471805599453],
            "feature_log_prob": [[-1.0, -4.0], [-4.0, -1.0]]
        }))
        .unwrap();
        MultinomialNb::from_raw(raw).unwrap()
    }

    #[test]
    fn test_predict_proba_is_a_distribution() {
        let model = fixture();
        let proba = model
            .predict_proba(&Array1::from_vec(vec![0.8, 0.2]))
            .unwrap();
        let sum: f64 = proba.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert!(proba.iter().all(|&p| (0.0..=1.0).contains(&p)));
    }

    #[test]
    fn test_predict_proba_prefers_matching_class() {
        let model = fixture();
        let proba = model
            .predict_proba(&Array1::from_vec(vec![1.0, 0.0]))
            .unwrap();
        assert!(proba[0] > proba[1]);
    }

    #[test]
    fn test_zero_vector_falls_back_to_priors() {
        let model = fixture();
        let proba = model.predict_proba(&Array1::zeros(2)).unwrap();
        assert!((proba[0] - 0.5).abs() < 1e-12);
        assert!((proba[1] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_dimension_mismatch_is_a_vectorization_error() {
        let model = fixture();
        let result = model.predict_proba(&Array1::zeros(3));
        assert!(matches!(result, Err(ClassifierError::VectorizationError(_))));
    }

    #[test]
    fn test_rejects_ragged_feature_rows() {
        let raw: RawModel = serde_json::from_value(json!({
            "classes": ["bad", "good"],
            "class_log_prior": [-0.69, -0.69],
            "feature_log_prob": [[-1.0, -4.0], [-4.0]]
        }))
        .unwrap();
        assert!(MultinomialNb::from_raw(raw).is_err());
    }
}
