//! # Operation Reports
//!
//! Serializable summaries of completed encrypt and embed operations, printed
//! by the CLI (`--json`) or exported to a file. Reports identify an
//! operation and describe its output; they never contain the plaintext, the
//! secret key or any private key material.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use uuid::Uuid;

use crate::crypto::digest::MessageDigest;
use crate::processing::traversal::Traversal;

/// Result of encrypting a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptionReport {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Base64 RSA-OAEP ciphertext
    pub ciphertext: String,
    /// Fingerprint of the plaintext, for checking after decryption
    pub digest: MessageDigest,
}

impl EncryptionReport {
    pub fn new(ciphertext: String, digest: MessageDigest) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            ciphertext,
            digest,
        }
    }
}

/// Result of hiding a message in an image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StegoReport {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub original_filename: String,
    pub output_filename: String,
    /// Message length in bytes, delimiter excluded
    pub message_len: usize,
    /// Image capacity in bytes, delimiter included
    pub capacity: usize,
    pub traversal: Traversal,
}

impl StegoReport {
    pub fn new(
        original_filename: String,
        output_filename: String,
        message_len: usize,
        capacity: usize,
        traversal: Traversal,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            original_filename,
            output_filename,
            message_len,
            capacity,
            traversal,
        }
    }
}

pub fn to_json<T: Serialize>(report: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

pub fn export_to_json<T: Serialize, P: AsRef<Path>>(report: &T, path: P) -> std::io::Result<()> {
    let json_string = serde_json::to_string_pretty(report)?;
    let mut file = File::create(path)?;
    file.write_all(json_string.as_bytes())?;

    Ok(())
}
