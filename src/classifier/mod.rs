pub mod builder;
mod error;
mod model;
mod pipeline;
pub mod tokenize;
mod vectorizer;

pub use builder::UrlClassifierBuilder;
pub use error::ClassifierError;
pub use model::MultinomialNb;
pub use pipeline::{Prediction, UrlClassifier, Verdict, SANITY_CHECK_URL};
pub use vectorizer::TfidfVectorizer;

/// Information about the current state and configuration of a classifier
#[derive(Debug, Clone)]
pub struct PipelineInfo {
    /// Path to the fitted vectorizer artifact
    pub vectorizer_path: String,
    /// Path to the fitted classifier artifact
    pub classifier_path: String,
    /// Feature dimension fixed by the fitted vocabulary
    pub vocabulary_size: usize,
    /// Raw class labels of the fitted classifier
    pub class_labels: Vec<String>,
    /// Raw label mapped to the malicious verdict
    pub positive_label: String,
}
