use std::fmt;

use crate::artifacts::ArtifactError;

/// Represents the different types of errors that can occur in the URL
/// classification pipeline.
#[derive(Debug)]
pub enum ClassifierError {
    /// Error occurred while loading or validating the artifact pair
    BuildError(String),
    /// Input could not be converted to the feature dimensionality the
    /// artifacts expect
    VectorizationError(String),
    /// Error occurred while deriving a verdict from the model output
    PredictionError(String),
}

impl fmt::Display for ClassifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BuildError(msg) => write!(f, "Build error: {}", msg),
            Self::VectorizationError(msg) => write!(f, "Vectorization error: {}", msg),
            Self::PredictionError(msg) => write!(f, "Prediction error: {}", msg),
        }
    }
}

impl std::error::Error for ClassifierError {}

impl From<ArtifactError> for ClassifierError {
    fn from(err: ArtifactError) -> Self {
        ClassifierError::BuildError(err.to_string())
    }
}
