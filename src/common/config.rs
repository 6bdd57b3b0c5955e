//! # Configuration Utilities
//!
//! TOML configuration for the service facade, the steganographic codec and
//! the command-line front end. Every section and field has a default, so an
//! empty file (or no file at all) is a valid configuration.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::processing::traversal::Traversal;
use crate::processing::upload::DEFAULT_ALLOWED_EXTENSIONS;

/// Load a TOML configuration file and deserialize it into the specified type.
///
/// # Arguments
/// - `path`: Path to the TOML configuration file
///
/// # Returns
/// - `Ok(T)`: Successfully loaded and parsed configuration
/// - `Err`: File I/O or parsing error
///
/// # Example
/// ```ignore
/// let config: AppConfig = load_config("config/stegcrypt.toml")?;
/// ```
pub fn load_config<T>(path: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    let content = fs::read_to_string(path)?;
    let config: T = toml::from_str(&content)?;
    Ok(config)
}

/// Complete application configuration.
///
/// # Example TOML
///
/// ```toml
/// [service]
/// worker_threads = 4
/// keygen_timeout_secs = 30
///
/// [stego]
/// traversal = "raster"
/// output_dir = "uploads"
/// allowed_extensions = ["png", "jpg", "jpeg", "gif", "bmp"]
///
/// [logging]
/// level = "info"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceConfig,
    pub stego: StegoConfig,
    pub logging: LoggingConfig,
}

/// Limits for the async service facade.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Maximum number of CPU-bound operations running at once
    pub worker_threads: usize,
    /// Deadline for RSA key generation in seconds (0 disables the deadline)
    pub keygen_timeout_secs: u64,
}

impl ServiceConfig {
    /// Key generation deadline, or `None` when disabled.
    pub fn keygen_timeout(&self) -> Option<Duration> {
        match self.keygen_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            worker_threads: 4,
            keygen_timeout_secs: 0,
        }
    }
}

/// Steganographic codec settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StegoConfig {
    /// Channel visit order used for embedding and extraction
    pub traversal: Traversal,
    /// Directory where generated stego images are written
    pub output_dir: PathBuf,
    /// Accepted input file extensions (lowercase, without the dot)
    pub allowed_extensions: Vec<String>,
}

impl Default for StegoConfig {
    fn default() -> Self {
        Self {
            traversal: Traversal::Raster,
            output_dir: PathBuf::from("."),
            allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
