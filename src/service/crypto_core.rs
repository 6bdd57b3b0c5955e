//! # Crypto Core - Async Service Facade
//!
//! RSA key generation, OAEP and LSB embedding are CPU-bound. [`CryptoCore`]
//! runs each of them on tokio's blocking thread pool so async callers (a web
//! layer, a job queue) never stall the runtime, and bounds how many run at
//! once with a semaphore.
//!
//! The facade adds no state of its own: every call is independent and
//! returns exactly what the synchronous function in [`crypto`](crate::crypto)
//! or [`processing`](crate::processing) would.

use log::{info, warn};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

use crate::common::config::ServiceConfig;
use crate::common::error::{Result, StegoCryptError};
use crate::crypto::cipher::{self, KeyPair};
use crate::processing::steganography::LsbCodec;
use crate::processing::traversal::Traversal;

/// Async front for the cipher manager and the steganographic codec.
pub struct CryptoCore {
    permits: Arc<Semaphore>,
    keygen_timeout: Option<Duration>,
    codec: LsbCodec,
    next_request_id: AtomicU64,
}

impl CryptoCore {
    /// Create a new core.
    ///
    /// # Arguments
    /// - `config`: Concurrency limit and key generation deadline
    /// - `traversal`: Channel order used by [`embed`](Self::embed) and [`extract`](Self::extract)
    ///
    /// # Example
    /// ```ignore
    /// let core = CryptoCore::new(&config.service, config.stego.traversal);
    /// let keys = core.generate_key_pair().await?;
    /// ```
    pub fn new(config: &ServiceConfig, traversal: Traversal) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(config.worker_threads.max(1))),
            keygen_timeout: None,
            codec: LsbCodec::new(traversal),
            next_request_id: AtomicU64::new(1),
        }
        .with_keygen_timeout(config.keygen_timeout())
    }

    /// Replace the key generation deadline (`None` waits indefinitely).
    pub fn with_keygen_timeout(mut self, limit: Option<Duration>) -> Self {
        self.keygen_timeout = limit;
        self
    }

    /// Number of operations that could start right now without waiting.
    pub fn available_workers(&self) -> usize {
        self.permits.available_permits()
    }

    /// Generate a key pair, honouring the configured deadline.
    ///
    /// On timeout the computation is abandoned, not interrupted: it keeps
    /// its worker permit until it finishes in the background.
    pub async fn generate_key_pair(&self) -> Result<KeyPair> {
        let request_id = self.request_id();
        let task = self.run_blocking("keygen", cipher::generate_key_pair);

        let keys = match self.keygen_timeout {
            None => task.await?,
            Some(limit) => match tokio::time::timeout(limit, task).await {
                Ok(result) => result?,
                Err(_) => {
                    warn!("⏱️ Key generation #{} exceeded {:?}", request_id, limit);
                    return Err(StegoCryptError::KeygenTimeout { limit });
                }
            },
        };

        info!("🔑 Key pair #{} generated", request_id);
        Ok(keys)
    }

    pub async fn encrypt(&self, plaintext: String, public_key_pem: String) -> Result<String> {
        let request_id = self.request_id();
        let len = plaintext.len();

        let ciphertext = self
            .run_blocking("encrypt", move || cipher::encrypt(&plaintext, &public_key_pem))
            .await?;

        info!("🔒 Request #{} encrypted {} bytes", request_id, len);
        Ok(ciphertext)
    }

    pub async fn decrypt(&self, ciphertext: String, private_key_pem: String) -> Result<String> {
        let request_id = self.request_id();

        let plaintext = self
            .run_blocking("decrypt", move || cipher::decrypt(&ciphertext, &private_key_pem))
            .await?;

        info!("🔓 Request #{} decrypted {} bytes", request_id, plaintext.len());
        Ok(plaintext)
    }

    /// Hide `message` in encoded image bytes; returns PNG bytes.
    pub async fn embed(&self, image_data: Vec<u8>, message: String, secret_key: String) -> Result<Vec<u8>> {
        let request_id = self.request_id();
        let codec = self.codec;
        let input_len = image_data.len();

        let output = self
            .run_blocking("embed", move || {
                codec.embed_text_bytes(&image_data, &message, &secret_key)
            })
            .await?;

        info!(
            "📷 Request #{} embedded message ({} -> {} image bytes)",
            request_id,
            input_len,
            output.len()
        );
        Ok(output)
    }

    pub async fn extract(&self, image_data: Vec<u8>, secret_key: String) -> Result<String> {
        let request_id = self.request_id();
        let codec = self.codec;

        let message = self
            .run_blocking("extract", move || codec.extract_text_bytes(&image_data, &secret_key))
            .await?;

        info!("🔎 Request #{} extracted {} bytes", request_id, message.len());
        Ok(message)
    }

    fn request_id(&self) -> u64 {
        self.next_request_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Run `job` on the blocking pool once a worker permit is available.
    ///
    /// The permit moves into the blocking task, so it is released only when
    /// the job itself finishes, even if the caller stopped waiting.
    async fn run_blocking<T, F>(&self, op: &'static str, job: F) -> Result<T>
    where
        F: FnOnce() -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|e| StegoCryptError::Worker(format!("{} rejected: {}", op, e)))?;

        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            job()
        })
        .await
        .map_err(|e| StegoCryptError::Worker(format!("{} task panicked: {}", op, e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut out = Vec::new();
        RgbImage::new(width, height)
            .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
            .unwrap();
        out
    }

    #[tokio::test]
    async fn test_embed_extract_through_core() {
        let core = CryptoCore::new(&ServiceConfig::default(), Traversal::Raster);
        let stego = core
            .embed(png_bytes(12, 12), "via service".to_string(), "k".to_string())
            .await
            .unwrap();
        let message = core.extract(stego, "k".to_string()).await.unwrap();
        assert_eq!(message, "via service");
        assert_eq!(core.available_workers(), 4);
    }

    #[tokio::test]
    async fn test_errors_pass_through_unchanged() {
        let core = CryptoCore::new(&ServiceConfig::default(), Traversal::Raster);

        let err = core
            .encrypt("x".repeat(200), "unused".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, StegoCryptError::PayloadTooLarge { len: 200, .. }));

        let err = core
            .extract(b"not an image".to_vec(), "k".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, StegoCryptError::UnsupportedImage(_)));
    }

    #[tokio::test]
    async fn test_panicking_job_is_a_worker_error() {
        let core = CryptoCore::new(&ServiceConfig::default(), Traversal::Raster);
        let err = core
            .run_blocking("boom", || -> Result<()> { panic!("job failed") })
            .await
            .unwrap_err();

        assert!(matches!(err, StegoCryptError::Worker(ref msg) if msg.contains("boom")));
        assert_eq!(core.available_workers(), 4);
    }

    #[tokio::test]
    async fn test_closed_pool_rejects_jobs() {
        let core = CryptoCore::new(&ServiceConfig::default(), Traversal::Raster);
        core.permits.close();

        let err = core.run_blocking("late", || Ok(())).await.unwrap_err();
        assert!(matches!(err, StegoCryptError::Worker(ref msg) if msg.contains("rejected")));
    }

    #[tokio::test]
    async fn test_zero_workers_is_clamped() {
        let config = ServiceConfig {
            worker_threads: 0,
            keygen_timeout_secs: 0,
        };
        let core = CryptoCore::new(&config, Traversal::Keyed);
        assert_eq!(core.available_workers(), 1);
    }
}
