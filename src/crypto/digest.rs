//! # Digest Verifier
//!
//! Content fingerprint used to detect accidental corruption of a message
//! between encryption and decryption.
//!
//! The fingerprint is MD5, rendered as 32 lowercase hex characters. MD5 is
//! fast and collision-prone: it is an integrity checksum for display, not a
//! security primitive. Callers that need tamper evidence must rely on the
//! OAEP layer in [`cipher`](super::cipher). Switching to another hash would
//! change every stored fingerprint, so the algorithm is fixed.

use md5::{Digest as _, Md5};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of a rendered digest in hex characters.
pub const DIGEST_HEX_LEN: usize = 32;

/// Hex fingerprint of a text. Opaque apart from its string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageDigest(String);

impl MessageDigest {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for MessageDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compute the fingerprint of `text` over its UTF-8 bytes.
///
/// # Example
/// ```
/// let d = stego_crypt::crypto::digest::digest("hello");
/// assert_eq!(d.as_str(), "5d41402abc4b2a76b9719d911017c592");
/// ```
pub fn digest(text: &str) -> MessageDigest {
    MessageDigest(hex::encode(Md5::digest(text.as_bytes())))
}

/// Returns true iff `digest(text)` equals `expected` exactly.
///
/// The comparison is a plain string comparison: an uppercase or
/// whitespace-padded `expected` does not match.
pub fn verify(text: &str, expected: &str) -> bool {
    digest(text).as_str() == expected
}
