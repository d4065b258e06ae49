use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log;
use reqwest;
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Artifact not downloaded: {0}")]
    NotDownloaded(String),
    #[error("Download error: {0}")]
    DownloadError(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Parse error: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Artifact verification failed")]
    VerificationFailed,
    #[error("Hash mismatch: expected {expected}, got {actual} for {file_type} file")]
    HashMismatch {
        file_type: String,
        expected: String,
        actual: String,
    },
    #[error("Invalid artifact: {0}")]
    InvalidArtifact(String),
}

/// Pre-trained artifact pairs the crate knows how to fetch and verify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinArtifact {
    /// TF-IDF vectorizer + multinomial naive Bayes pair fitted on the
    /// labeled malicious/benign URL corpus.
    MnbTfidf,
}

/// Location and integrity metadata for one artifact pair.
#[derive(Debug, Clone)]
pub struct ArtifactInfo {
    pub name: String,
    pub vectorizer_url: String,
    pub vectorizer_hash: String,
    pub classifier_url: String,
    pub classifier_hash: String,
    /// The raw class label the artifact uses for its positive (malicious)
    /// class.
    pub positive_label: String,
}

impl BuiltinArtifact {
    pub fn get_artifact_info(&self) -> ArtifactInfo {
        match self {
            BuiltinArtifact::MnbTfidf => ArtifactInfo {
                name: "mnb-tfidf-v1".to_string(),
                vectorizer_url:
                    "https://github.com/urlguard/artifacts/releases/download/v1.0.0/tfidf_vectorizer.json"
                        .to_string(),
                vectorizer_hash:
                    "a6e5a952a59a5000b5c15a35d8685c6696480299dc8c294af16d546ab52af9a6"
                        .to_string(),
                classifier_url:
                    "https://github.com/urlguard/artifacts/releases/download/v1.0.0/mnb_classifier.json"
                        .to_string(),
                classifier_hash:
                    "49ebd924f5b511592971464ddad2b29941e4f000f5ce196a39290cd38faa912a"
                        .to_string(),
                positive_label: "bad".to_string(),
            },
        }
    }
}

/// Manages the on-disk artifact cache: directory resolution, download,
/// SHA-256 verification, and cleanup.
#[derive(Clone)]
pub struct ArtifactStore {
    artifacts_dir: PathBuf,
    download_lock: Arc<Mutex<()>>,
}

impl ArtifactStore {
    /// Creates a new ArtifactStore with the default artifacts directory
    pub fn new_default() -> io::Result<Self> {
        Self::new(Self::get_default_artifacts_dir())
    }

    /// Returns the default artifacts directory path
    pub fn get_default_artifacts_dir() -> PathBuf {
        // 1. Check environment variable
        if let Ok(path) = env::var("URLGUARD_CACHE") {
            return PathBuf::from(path).join("artifacts");
        }

        // 2. Use platform-specific cache directory
        if let Some(cache_dir) = dirs::cache_dir() {
            return cache_dir.join("urlguard").join("artifacts");
        }

        // 3. Fallback to user's home directory
        if let Some(home_dir) = dirs::home_dir() {
            return home_dir.join(".cache").join("urlguard").join("artifacts");
        }

        // 4. If all else fails, use system temp directory (platform agnostic)
        env::temp_dir().join("urlguard").join("artifacts")
    }

    pub fn new<P: AsRef<Path>>(artifacts_dir: P) -> io::Result<Self> {
        let artifacts_dir = artifacts_dir.as_ref().to_path_buf();
        fs::create_dir_all(&artifacts_dir)?;
        Ok(Self {
            artifacts_dir,
            download_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn get_vectorizer_path(&self, artifact: BuiltinArtifact) -> PathBuf {
        let info = artifact.get_artifact_info();
        self.artifacts_dir.join(info.name).join("tfidf_vectorizer.json")
    }

    pub fn get_classifier_path(&self, artifact: BuiltinArtifact) -> PathBuf {
        let info = artifact.get_artifact_info();
        self.artifacts_dir.join(info.name).join("mnb_classifier.json")
    }

    pub fn is_downloaded(&self, artifact: BuiltinArtifact) -> bool {
        let vectorizer_path = self.get_vectorizer_path(artifact);
        let classifier_path = self.get_classifier_path(artifact);
        log::info!("Checking if artifact pair is downloaded:");
        log::info!(
            "  Vectorizer path: {:?} (exists: {})",
            vectorizer_path,
            vectorizer_path.exists()
        );
        log::info!(
            "  Classifier path: {:?} (exists: {})",
            classifier_path,
            classifier_path.exists()
        );
        vectorizer_path.exists() && classifier_path.exists()
    }

    pub async fn download(&self, artifact: BuiltinArtifact) -> Result<(), ArtifactError> {
        let info = artifact.get_artifact_info();
        let _lock = self.download_lock.lock().await;

        let artifact_dir = self.artifacts_dir.join(&info.name);
        log::info!("Creating artifact directory at {:?}", artifact_dir);
        fs::create_dir_all(&artifact_dir)?;

        let vectorizer_path = self.get_vectorizer_path(artifact);
        let vectorizer_result = if vectorizer_path.exists() {
            log::info!("Vectorizer file exists at {:?}, verifying...", vectorizer_path);
            if !self.verify_file(&vectorizer_path, &info.vectorizer_hash)? {
                log::warn!("Vectorizer file verification failed, redownloading");
                self.download_and_verify_file(
                    &info.vectorizer_url,
                    &vectorizer_path,
                    &info.vectorizer_hash,
                    "vectorizer",
                )
                .await
            } else {
                log::info!("Existing vectorizer file verified successfully");
                Ok(())
            }
        } else {
            log::info!("Vectorizer file does not exist, downloading...");
            self.download_and_verify_file(
                &info.vectorizer_url,
                &vectorizer_path,
                &info.vectorizer_hash,
                "vectorizer",
            )
            .await
        };

        let classifier_path = self.get_classifier_path(artifact);
        let classifier_result = if classifier_path.exists() {
            log::info!("Classifier file exists at {:?}, verifying...", classifier_path);
            if !self.verify_file(&classifier_path, &info.classifier_hash)? {
                log::warn!("Classifier file verification failed, redownloading");
                self.download_and_verify_file(
                    &info.classifier_url,
                    &classifier_path,
                    &info.classifier_hash,
                    "classifier",
                )
                .await
            } else {
                log::info!("Existing classifier file verified successfully");
                Ok(())
            }
        } else {
            log::info!("Classifier file does not exist, downloading...");
            self.download_and_verify_file(
                &info.classifier_url,
                &classifier_path,
                &info.classifier_hash,
                "classifier",
            )
            .await
        };

        match (vectorizer_result, classifier_result) {
            (Ok(()), Ok(())) => {
                log::info!("Artifact pair ready to use");
                Ok(())
            }
            (Err(e), _) => {
                log::error!("Failed to set up vectorizer file: {}", e);
                // Cleanup on failure
                let _ = self.remove_download(artifact);
                Err(e)
            }
            (_, Err(e)) => {
                log::error!("Failed to set up classifier file: {}", e);
                // Cleanup on failure
                let _ = self.remove_download(artifact);
                Err(e)
            }
        }
    }

    fn verify_file(&self, path: &Path, expected_hash: &str) -> Result<bool, ArtifactError> {
        let bytes = fs::read(path)?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let hash = format!("{:x}", hasher.finalize());
        log::info!("Verifying {:?}: calculated {}, expected {}", path, hash, expected_hash);
        Ok(hash == expected_hash)
    }

    pub fn verify(&self, artifact: BuiltinArtifact) -> Result<bool, ArtifactError> {
        let info = artifact.get_artifact_info();
        let vectorizer_path = self.get_vectorizer_path(artifact);
        let classifier_path = self.get_classifier_path(artifact);

        if !vectorizer_path.exists() || !classifier_path.exists() {
            log::info!("One or both artifact files do not exist");
            return Ok(false);
        }

        let vectorizer_ok = self.verify_file(&vectorizer_path, &info.vectorizer_hash)?;
        let classifier_ok = self.verify_file(&classifier_path, &info.classifier_hash)?;

        log::info!("Verification results:");
        log::info!("  Vectorizer hash verification: {}", vectorizer_ok);
        log::info!("  Classifier hash verification: {}", classifier_ok);

        Ok(vectorizer_ok && classifier_ok)
    }

    async fn download_and_verify_file(
        &self,
        url: &str,
        path: &Path,
        expected_hash: &str,
        file_type: &str,
    ) -> Result<(), ArtifactError> {
        log::info!("Downloading {} file from {} to {:?}", file_type, url, path);
        let response = reqwest::get(url).await?;
        log::info!("Download response status: {}", response.status());
        let bytes = response.bytes().await?;
        log::info!("Downloaded {} bytes", bytes.len());

        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let hash = format!("{:x}", hasher.finalize());

        if hash != expected_hash {
            log::error!(
                "{} hash mismatch: expected {}, got {}",
                file_type,
                expected_hash,
                hash
            );
            return Err(ArtifactError::HashMismatch {
                file_type: file_type.to_string(),
                expected: expected_hash.to_string(),
                actual: hash,
            });
        }

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        log::info!("Writing {} bytes to {:?}", bytes.len(), path);
        fs::write(path, bytes)?;

        // Verify after writing
        if !self.verify_file(path, expected_hash)? {
            return Err(ArtifactError::VerificationFailed);
        }

        log::info!("{} file downloaded and verified successfully", file_type);
        Ok(())
    }

    pub fn remove_download(&self, artifact: BuiltinArtifact) -> Result<(), ArtifactError> {
        let vectorizer_path = self.get_vectorizer_path(artifact);
        let classifier_path = self.get_classifier_path(artifact);

        if vectorizer_path.exists() {
            fs::remove_file(&vectorizer_path)?;
        }
        if classifier_path.exists() {
            fs::remove_file(&classifier_path)?;
        }
        Ok(())
    }

    /// Ensures that an artifact pair is downloaded and verified.
    /// If the pair doesn't exist, it will be downloaded.
    /// If verification fails, it will be re-downloaded.
    pub async fn ensure_downloaded(&self, artifact: BuiltinArtifact) -> Result<(), ArtifactError> {
        log::info!("Checking if artifact {:?} is downloaded...", artifact);
        if !self.is_downloaded(artifact) {
            log::info!("Artifact pair not found, downloading...");
            self.download(artifact).await?;
        } else {
            log::info!("Artifact pair exists, verifying...");
            if !self.verify(artifact)? {
                log::info!("Artifact verification failed, re-downloading...");
                self.remove_download(artifact)?;
                self.download(artifact).await?;
            } else {
                log::info!("Artifact verification successful");
            }
        }
        Ok(())
    }
}
