use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use super::error::ClassifierError;
use super::model::MultinomialNb;
use super::tokenize::normalize;
use super::vectorizer::TfidfVectorizer;

/// Known-malicious URL replayed by [`UrlClassifier::sanity_check`] to catch
/// an insane or mispaired artifact set before serving.
pub const SANITY_CHECK_URL: &str = "https://yegshfgsa.weebly.com/";

/// Human-facing verdict derived from the raw artifact label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Malicious,
    Benign,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Malicious => write!(f, "malicious"),
            Verdict::Benign => write!(f, "benign"),
        }
    }
}

/// The outcome of classifying one URL. Deterministic given the same URL and
/// the same artifact pair.
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    /// The raw URL as submitted
    pub url: String,
    /// The normalized form fed to the vectorizer
    pub normalized_url: String,
    /// Verdict derived from the raw label
    pub verdict: Verdict,
    /// Maximum class probability, in [0, 1]; belongs to the predicted label
    pub confidence: f64,
    /// The artifact's own label for the predicted class
    pub raw_label: String,
}

/// A thread-safe URL classifier backed by a pre-trained TF-IDF vectorizer
/// and multinomial naive Bayes artifact pair.
///
/// # Thread Safety
///
/// This type is automatically `Send + Sync` because all of its fields are
/// thread-safe: `String` is `Send + Sync` and `Arc<T>` provides thread-safe
/// shared ownership of the immutable artifacts. The artifacts are never
/// mutated after loading, so classification calls may run in parallel
/// across threads without coordination:
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use urlguard::UrlClassifier;
/// use std::sync::Arc;
/// use std::thread;
///
/// let classifier = Arc::new(
///     UrlClassifier::builder()
///         .with_artifact_files("artifacts/tfidf_vectorizer.json", "artifacts/mnb_classifier.json")?
///         .build()?,
/// );
///
/// let classifier_clone = Arc::clone(&classifier);
/// thread::spawn(move || {
///     classifier_clone.classify("http://example.com/login").unwrap();
/// });
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct UrlClassifier {
    pub vectorizer_path: String,
    pub classifier_path: String,
    pub vectorizer: Arc<TfidfVectorizer>,
    pub model: Arc<MultinomialNb>,
    pub positive_label: String,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<UrlClassifier>();
    }
};

impl UrlClassifier {
    /// Creates a new UrlClassifierBuilder for fluent construction
    pub fn builder() -> super::builder::UrlClassifierBuilder {
        super::builder::UrlClassifierBuilder::new()
    }

    /// Returns information about the classifier's current state
    pub fn info(&self) -> super::PipelineInfo {
        super::PipelineInfo {
            vectorizer_path: self.vectorizer_path.clone(),
            classifier_path: self.classifier_path.clone(),
            vocabulary_size: self.vectorizer.dimension(),
            class_labels: self.model.classes().to_vec(),
            positive_label: self.positive_label.clone(),
        }
    }

    /// Classifies a URL as malicious or benign.
    ///
    /// The URL is normalized for vectorization only; the raw form is
    /// retained on the returned [`Prediction`] for display and enrichment.
    /// The verdict maps the artifact's positive class label to
    /// [`Verdict::Malicious`] and every other label to [`Verdict::Benign`];
    /// the confidence is the maximum class probability.
    ///
    /// Pure over its inputs and the immutable artifacts: the same URL always
    /// yields the same prediction.
    pub fn classify(&self, url: &str) -> Result<Prediction, ClassifierError> {
        let normalized_url = normalize(url);
        let features = self.vectorizer.transform(&normalized_url);
        let proba = self.model.predict_proba(&features)?;

        let (best_index, confidence) = proba
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(index, p)| (index, *p))
            .ok_or_else(|| {
                ClassifierError::PredictionError("empty probability distribution".into())
            })?;

        let raw_label = self.model.classes()[best_index].clone();
        let verdict = if raw_label == self.positive_label {
            Verdict::Malicious
        } else {
            Verdict::Benign
        };

        Ok(Prediction {
            url: url.to_string(),
            normalized_url,
            verdict,
            confidence,
            raw_label,
        })
    }

    /// Replays a known-malicious URL against the loaded artifacts.
    ///
    /// A healthy artifact pair classifies it as malicious with confidence of
    /// at least 0.5; anything else means the artifacts are corrupt or were
    /// fitted with a different tokenizer, and the caller should refuse to
    /// serve.
    pub fn sanity_check(&self) -> Result<(), ClassifierError> {
        let prediction = self.classify(SANITY_CHECK_URL)?;
        if prediction.verdict != Verdict::Malicious || prediction.confidence < 0.5 {
            return Err(ClassifierError::PredictionError(format!(
                "artifact sanity check failed: {} classified as {} with confidence {:.3}",
                SANITY_CHECK_URL, prediction.verdict, prediction.confidence
            )));
        }
        log::info!(
            "Artifact sanity check passed ({} -> {} at {:.3})",
            SANITY_CHECK_URL,
            prediction.verdict,
            prediction.confidence
        );
        Ok(())
    }
}
