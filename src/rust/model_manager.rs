use std::path::{Path, PathBuf};
use std::fs;
use std::io;
use std::sync::Arc;
use std::env;
use tokio::sync::Mutex;
use serde::{Deserialize, Serialize};
use sha2::{Sha256, Digest};

/// Environment variable overriding the cache root
pub const CACHE_ENV_VAR: &str = "ATTRITION_CACHE";

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Model not downloaded: {0}")]
    NotDownloaded(String),
    #[error("Download error: {0}")]
    DownloadError(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Model verification failed")]
    VerificationFailed,
    #[error("Hash mismatch: expected {expected}, got {actual}")]
    HashMismatch {
        expected: String,
        actual: String,
    },
}

/// Where a model artifact comes from and the SHA-256 it must hash to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    pub model_url: String,
    pub model_hash: String,
}

impl ModelInfo {
    pub fn new(name: impl Into<String>, model_url: impl Into<String>, model_hash: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model_url: model_url.into(),
            model_hash: model_hash.into().to_lowercase(),
        }
    }
}

/// Keeps model artifacts under a local directory, one subdirectory per model.
#[derive(Clone)]
pub struct ModelManager {
    models_dir: PathBuf,
    download_lock: Arc<Mutex<()>>,
}

impl ModelManager {
    /// Creates a new ModelManager with the default models directory
    pub fn new_default() -> io::Result<Self> {
        Self::new(Self::get_default_models_dir())
    }

    /// Returns the default models directory path
    pub fn get_default_models_dir() -> PathBuf {
        // 1. Check environment variable
        if let Ok(path) = env::var(CACHE_ENV_VAR) {
            return PathBuf::from(path).join("models");
        }

        // 2. Use platform-specific cache directory
        if let Some(cache_dir) = dirs::cache_dir() {
            return cache_dir.join("attrition").join("models");
        }

        // 3. Fallback to user's home directory
        if let Some(home_dir) = dirs::home_dir() {
            return home_dir.join(".cache").join("attrition").join("models");
        }

        // 4. If all else fails, use system temp directory
        env::temp_dir().join("attrition").join("models")
    }

    pub fn new<P: AsRef<Path>>(models_dir: P) -> io::Result<Self> {
        let models_dir = models_dir.as_ref().to_path_buf();
        fs::create_dir_all(&models_dir)?;
        Ok(Self {
            models_dir,
            download_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }

    pub fn get_model_path(&self, name: &str) -> PathBuf {
        self.models_dir.join(name).join("model.onnx")
    }

    pub fn is_model_downloaded(&self, name: &str) -> bool {
        let model_path = self.get_model_path(name);
        log::debug!("Model path: {:?} (exists: {})", model_path, model_path.exists());
        model_path.exists()
    }

    fn hash_bytes(bytes: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        format!("{:x}", hasher.finalize())
    }

    fn verify_file(&self, path: &Path, expected_hash: &str) -> Result<bool, ModelError> {
        let bytes = fs::read(path)?;
        let hash = Self::hash_bytes(&bytes);
        log::debug!("Verifying {:?}: {} bytes, hash {}", path, bytes.len(), hash);
        Ok(hash.eq_ignore_ascii_case(expected_hash))
    }

    /// Checks the stored model against its expected hash.
    /// Returns `Ok(false)` if the model is missing or the hash differs.
    pub fn verify_model(&self, model: &ModelInfo) -> Result<bool, ModelError> {
        let model_path = self.get_model_path(&model.name);
        if !model_path.exists() {
            log::info!("Model file {:?} does not exist", model_path);
            return Ok(false);
        }

        let ok = self.verify_file(&model_path, &model.model_hash)?;
        log::info!("Model hash verification for '{}': {}", model.name, ok);
        Ok(ok)
    }

    /// Downloads the model unless a verified copy is already present.
    /// Partial or corrupt files are removed on failure.
    pub async fn download_model(&self, model: &ModelInfo) -> Result<(), ModelError> {
        let _lock = self.download_lock.lock().await;

        let model_path = self.get_model_path(&model.name);
        if model_path.exists() {
            if self.verify_file(&model_path, &model.model_hash)? {
                log::info!("Existing model file verified successfully");
                return Ok(());
            }
            log::warn!("Model file verification failed, redownloading");
        }

        match self.download_and_verify(model, &model_path).await {
            Ok(()) => {
                log::info!("Model '{}' ready to use", model.name);
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to set up model file: {}", e);
                if let Err(cleanup) = self.remove_download(&model.name) {
                    log::warn!("Failed to remove partial model file for '{}': {}", model.name, cleanup);
                }
                Err(e)
            }
        }
    }

    async fn download_and_verify(&self, model: &ModelInfo, path: &Path) -> Result<(), ModelError> {
        log::info!("Downloading model from {} to {:?}", model.model_url, path);
        let response = reqwest::get(&model.model_url).await?.error_for_status()?;
        let bytes = response.bytes().await?;
        log::info!("Downloaded {} bytes", bytes.len());

        let hash = Self::hash_bytes(&bytes);
        if !hash.eq_ignore_ascii_case(&model.model_hash) {
            log::error!("Model hash mismatch: expected {}, got {}", model.model_hash, hash);
            return Err(ModelError::HashMismatch {
                expected: model.model_hash.clone(),
                actual: hash,
            });
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, &bytes)?;

        if !self.verify_file(path, &model.model_hash)? {
            return Err(ModelError::VerificationFailed);
        }
        Ok(())
    }

    pub fn remove_download(&self, name: &str) -> Result<(), ModelError> {
        let model_path = self.get_model_path(name);
        if model_path.exists() {
            fs::remove_file(&model_path)?;
        }
        Ok(())
    }

    /// Ensures that a model is downloaded and verified.
    /// If the model doesn't exist, it will be downloaded.
    /// If verification fails, it will be re-downloaded.
    pub async fn ensure_model_downloaded(&self, model: &ModelInfo) -> Result<(), ModelError> {
        if !self.is_model_downloaded(&model.name) {
            log::info!("Model '{}' not found, downloading...", model.name);
            return self.download_model(model).await;
        }
        if !self.verify_model(model)? {
            log::info!("Model verification failed, re-downloading...");
            self.remove_download(&model.name)?;
            self.download_model(model).await?;
        }
        Ok(())
    }

    /// Returns the path of a model that must already be present locally.
    pub fn require_model(&self, name: &str) -> Result<PathBuf, ModelError> {
        let path = self.get_model_path(name);
        if !path.exists() {
            return Err(ModelError::NotDownloaded(name.to_string()));
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // SHA-256 of "abc"
    const ABC_HASH: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    fn test_manager(tag: &str) -> ModelManager {
        let dir = env::temp_dir().join(format!("attrition-test-{}", tag)).join("models");
        let _ = fs::remove_dir_all(&dir);
        ModelManager::new(&dir).unwrap()
    }

    #[test]
    fn test_model_paths() {
        let manager = test_manager("paths");
        assert!(manager.get_model_path("xgb").ends_with("xgb/model.onnx"));
        assert!(!manager.is_model_downloaded("xgb"));
        assert!(matches!(manager.require_model("xgb"), Err(ModelError::NotDownloaded(_))));
    }

    #[test]
    fn test_verify_model() -> Result<(), ModelError> {
        let manager = test_manager("verify");
        let info = ModelInfo::new("xgb", "https://example.invalid/model.onnx", ABC_HASH.to_uppercase());

        assert!(!manager.verify_model(&info)?);

        let path = manager.get_model_path("xgb");
        fs::create_dir_all(path.parent().unwrap())?;
        fs::write(&path, "abc")?;
        assert!(manager.is_model_downloaded("xgb"));
        assert!(manager.verify_model(&info)?);

        fs::write(&path, "corrupted data")?;
        assert!(!manager.verify_model(&info)?);

        manager.remove_download("xgb")?;
        assert!(!manager.is_model_downloaded("xgb"));
        Ok(())
    }

    #[tokio::test]
    async fn test_download_skips_verified_file() -> Result<(), ModelError> {
        let manager = test_manager("skip");
        let info = ModelInfo::new("xgb", "https://example.invalid/model.onnx", ABC_HASH);

        let path = manager.get_model_path("xgb");
        fs::create_dir_all(path.parent().unwrap())?;
        fs::write(&path, "abc")?;

        // Never reaches the network because the local copy verifies.
        manager.download_model(&info).await?;
        manager.ensure_model_downloaded(&info).await?;
        Ok(())
    }

    #[test]
    fn test_default_models_dir() {
        env::set_var(CACHE_ENV_VAR, "/tmp/attrition-cache");
        let path = ModelManager::get_default_models_dir();
        assert_eq!(path, PathBuf::from("/tmp/attrition-cache/models"));
        env::remove_var(CACHE_ENV_VAR);

        let path = ModelManager::get_default_models_dir();
        assert!(path.ends_with("attrition/models"));
    }
}
