use std::sync::Arc;

use log::{error, info};

use super::error::ClassifierError;
use super::model::MultinomialNb;
use super::pipeline::UrlClassifier;
use super::vectorizer::TfidfVectorizer;
use crate::artifacts::{ArtifactStore, BuiltinArtifact};

/// A builder for constructing a UrlClassifier with a fluent interface.
///
/// Artifacts come either from the managed store ([`with_artifacts`]) or from
/// explicit file paths ([`with_artifact_files`]); the pair is validated for
/// mutual consistency at [`build`] time so mispaired artifacts fail loudly
/// at startup instead of skewing verdicts at request time.
///
/// [`with_artifacts`]: Self::with_artifacts
/// [`with_artifact_files`]: Self::with_artifact_files
/// [`build`]: Self::build
#[derive(Default, Debug)]
pub struct UrlClassifierBuilder {
    vectorizer_path: Option<String>,
    classifier_path: Option<String>,
    vectorizer: Option<TfidfVectorizer>,
    model: Option<MultinomialNb>,
    positive_label: Option<String>,
}

impl UrlClassifierBuilder {
    /// Creates a new empty UrlClassifierBuilder instance
    pub fn new() -> Self {
        Self {
            vectorizer_path: None,
            classifier_path: None,
            vectorizer: None,
            model: None,
            positive_label: None,
        }
    }

    /// Loads a builtin artifact pair from the managed artifact store.
    ///
    /// # Errors
    /// Returns a `BuildError` if the artifact paths are already set, the
    /// pair is not downloaded, or either file fails to load or validate.
    pub fn with_artifacts(mut self, artifact: BuiltinArtifact) -> Result<Self, ClassifierError> {
        if self.vectorizer_path.is_some() || self.classifier_path.is_some() {
            return Err(ClassifierError::BuildError(
                "Vectorizer and classifier paths already set".to_string(),
            ));
        }

        let store = ArtifactStore::new_default().map_err(|e| {
            ClassifierError::BuildError(format!("Failed to create artifact store: {}", e))
        })?;

        if !store.is_downloaded(artifact) {
            return Err(ClassifierError::BuildError(format!(
                "Artifact '{:?}' is not downloaded. Please download it first using ArtifactStore::download()",
                artifact
            )));
        }

        let vectorizer_path = store.get_vectorizer_path(artifact);
        let classifier_path = store.get_classifier_path(artifact);

        let vectorizer = TfidfVectorizer::load(&vectorizer_path).map_err(|e| {
            error!("Failed to load vectorizer artifact: {}", e);
            ClassifierError::BuildError(format!("Failed to load vectorizer artifact: {}", e))
        })?;
        info!("Vectorizer artifact loaded successfully");

        let model = MultinomialNb::load(&classifier_path).map_err(|e| {
            error!("Failed to load classifier artifact: {}", e);
            ClassifierError::BuildError(format!("Failed to load classifier artifact: {}", e))
        })?;
        info!("Classifier artifact loaded successfully");

        self.positive_label = Some(artifact.get_artifact_info().positive_label);
        self.vectorizer_path = Some(vectorizer_path.to_string_lossy().to_string());
        self.classifier_path = Some(classifier_path.to_string_lossy().to_string());
        self.vectorizer = Some(vectorizer);
        self.model = Some(model);
        Ok(self)
    }

    /// Loads an artifact pair from explicit file paths.
    ///
    /// # Errors
    /// Returns a `BuildError` if either path is empty, the paths are already
    /// set, the files don't exist, or either file fails to load or validate.
    pub fn with_artifact_files(
        mut self,
        vectorizer_path: &str,
        classifier_path: &str,
    ) -> Result<Self, ClassifierError> {
        if vectorizer_path.is_empty() || classifier_path.is_empty() {
            return Err(ClassifierError::BuildError(
                "Vectorizer and classifier paths cannot be empty".to_string(),
            ));
        }
        if self.vectorizer_path.is_some() || self.classifier_path.is_some() {
            return Err(ClassifierError::BuildError(
                "Vectorizer and classifier paths already set".to_string(),
            ));
        }

        // Validate paths exist
        if !std::path::Path::new(vectorizer_path).exists() {
            return Err(ClassifierError::BuildError(format!(
                "Vectorizer file not found: {}",
                vectorizer_path
            )));
        }
        if !std::path::Path::new(classifier_path).exists() {
            return Err(ClassifierError::BuildError(format!(
                "Classifier file not found: {}",
                classifier_path
            )));
        }

        let vectorizer = TfidfVectorizer::load(vectorizer_path).map_err(|e| {
            error!("Failed to load vectorizer artifact: {}", e);
            ClassifierError::BuildError(format!("Failed to load vectorizer artifact: {}", e))
        })?;
        info!("Vectorizer artifact loaded successfully");

        let model = MultinomialNb::load(classifier_path).map_err(|e| {
            error!("Failed to load classifier artifact: {}", e);
            ClassifierError::BuildError(format!("Failed to load classifier artifact: {}", e))
        })?;
        info!("Classifier artifact loaded successfully");

        self.vectorizer_path = Some(vectorizer_path.to_string());
        self.classifier_path = Some(classifier_path.to_string());
        self.vectorizer = Some(vectorizer);
        self.model = Some(model);
        Ok(self)
    }

    /// Overrides the raw class label treated as the positive (malicious)
    /// marker. Defaults to the builtin artifact's own label, or `"bad"` for
    /// artifact pairs loaded from explicit paths.
    pub fn with_positive_label(mut self, label: impl Into<String>) -> Self {
        self.positive_label = Some(label.into());
        self
    }

    /// Builds and returns the final UrlClassifier instance
    ///
    /// # Errors
    /// Returns a `BuildError` if no artifact pair was loaded, the vectorizer
    /// and classifier dimensions disagree, or the positive label is not one
    /// of the artifact's classes.
    pub fn build(self) -> Result<UrlClassifier, ClassifierError> {
        let (vectorizer, vectorizer_path) = match (self.vectorizer, self.vectorizer_path) {
            (Some(vectorizer), Some(path)) => (vectorizer, path),
            _ => {
                return Err(ClassifierError::BuildError(
                    "Vectorizer and classifier artifacts must be set".to_string(),
                ))
            }
        };
        let (model, classifier_path) = match (self.model, self.classifier_path) {
            (Some(model), Some(path)) => (model, path),
            _ => {
                return Err(ClassifierError::BuildError(
                    "Vectorizer and classifier artifacts must be set".to_string(),
                ))
            }
        };

        if model.n_features() != vectorizer.dimension() {
            return Err(ClassifierError::BuildError(format!(
                "Artifact pair mismatch: classifier expects {} features but the vectorizer produces {}",
                model.n_features(),
                vectorizer.dimension()
            )));
        }

        let positive_label = self.positive_label.unwrap_or_else(|| "bad".to_string());
        if !model.classes().iter().any(|c| c == &positive_label) {
            return Err(ClassifierError::BuildError(format!(
                "Positive label {:?} is not among the artifact classes {:?}",
                positive_label,
                model.classes()
            )));
        }

        Ok(UrlClassifier {
            vectorizer_path,
            classifier_path,
            vectorizer: Arc::new(vectorizer),
            model: Arc::new(model),
            positive_label,
        })
    }
}
