//! # Error Types
//!
//! Every fallible operation in the crate returns [`StegoCryptError`]. The
//! variants are terminal: nothing is retried internally and no buffer is
//! handed back half-written.
//!
//! Error payloads only ever carry sizes, extensions and library error
//! descriptions. Key material, plaintext and secret keys never end up in an
//! error message.

use std::time::Duration;
use thiserror::Error;

/// Convenience alias used throughout the library.
pub type Result<T> = std::result::Result<T, StegoCryptError>;

#[derive(Debug, Error)]
pub enum StegoCryptError {
    /// A PEM key block could not be parsed.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// Plaintext exceeds the fixed RSA-OAEP ceiling.
    #[error("message too long for RSA encryption: {len} bytes (maximum {max})")]
    PayloadTooLarge { len: usize, max: usize },

    /// Ciphertext text is not valid base64.
    #[error("invalid ciphertext encoding: {0}")]
    InvalidCiphertext(String),

    /// OAEP unpadding failed or the plaintext is not UTF-8.
    #[error("decryption failed")]
    DecryptionFailed,

    /// Framed message does not fit in the image's LSB capacity.
    #[error("message too long for image: {required} bytes needed, capacity is {capacity} bytes")]
    CapacityExceeded { required: usize, capacity: usize },

    /// No delimiter-terminated message was found in the image.
    #[error("no valid message found in image or incorrect secret key")]
    NoHiddenMessage,

    /// Image could not be decoded, encoded or has a rejected extension.
    #[error("unsupported image: {0}")]
    UnsupportedImage(String),

    /// Key generation exceeded the configured deadline.
    #[error("key generation timed out after {limit:?}")]
    KeygenTimeout { limit: Duration },

    /// A blocking worker task failed before producing a result.
    #[error("worker failure: {0}")]
    Worker(String),
}

impl From<image::ImageError> for StegoCryptError {
    fn from(err: image::ImageError) -> Self {
        StegoCryptError::UnsupportedImage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_only_sizes() {
        let err = StegoCryptError::PayloadTooLarge { len: 191, max: 190 };
        assert_eq!(
            err.to_string(),
            "message too long for RSA encryption: 191 bytes (maximum 190)"
        );

        let err = StegoCryptError::CapacityExceeded {
            required: 301,
            capacity: 300,
        };
        assert!(err.to_string().contains("capacity is 300 bytes"));
    }

    #[test]
    fn test_image_error_maps_to_unsupported() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let err: StegoCryptError = image::ImageError::IoError(io).into();
        assert!(matches!(err, StegoCryptError::UnsupportedImage(_)));
    }
}
