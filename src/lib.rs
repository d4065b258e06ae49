//! A thread-safe malicious-URL detector using pre-trained TF-IDF and naive
//! Bayes artifacts for lexical classification.
//!
//! # Basic Usage
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use urlguard::{UrlClassifier, Verdict};
//!
//! let classifier = UrlClassifier::builder()
//!     .with_artifact_files(
//!         "artifacts/tfidf_vectorizer.json",
//!         "artifacts/mnb_classifier.json",
//!     )?
//!     .build()?;
//!
//! let prediction = classifier.classify("http://paypal-secure.example-login.com/verify")?;
//! println!(
//!     "{} -> {} ({:.1}%)",
//!     prediction.url,
//!     prediction.verdict,
//!     prediction.confidence * 100.0
//! );
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! The classifier is thread-safe and can be shared across threads using
//! `Arc`; the artifacts are loaded once and never mutated, so concurrent
//! classification needs no locking:
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use urlguard::UrlClassifier;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let classifier = Arc::new(
//!     UrlClassifier::builder()
//!         .with_artifact_files(
//!             "artifacts/tfidf_vectorizer.json",
//!             "artifacts/mnb_classifier.json",
//!         )?
//!         .build()?,
//! );
//!
//! let mut handles = vec![];
//! for _ in 0..3 {
//!     let classifier = Arc::clone(&classifier);
//!     handles.push(thread::spawn(move || {
//!         classifier.classify("http://example.com/login").unwrap();
//!     }));
//! }
//!
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//! # Ok(())
//! # }
//! ```

pub mod artifacts;
pub mod classifier;
pub mod enrichment;

pub use artifacts::{ArtifactError, ArtifactInfo, ArtifactStore, BuiltinArtifact};
pub use classifier::tokenize::{normalize, tokenize, tokenize_simple};
pub use classifier::{
    ClassifierError, MultinomialNb, PipelineInfo, Prediction, TfidfVectorizer, UrlClassifier,
    UrlClassifierBuilder, Verdict, SANITY_CHECK_URL,
};
pub use enrichment::{lookup, DomainInfo};

pub fn init_logger() {
    env_logger::init();
}
