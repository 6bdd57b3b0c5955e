//! # Image Processing and Steganography
//!
//! This module hides text in images with LSB (Least Significant Bit)
//! steganography and recovers it again.
//!
//! - [`payload`]: delimiter framing and bit expansion
//! - [`traversal`]: channel visit order (raster or key-seeded)
//! - [`steganography`]: the codec itself
//! - [`upload`]: filename policy for incoming and generated images

pub mod payload;
pub mod steganography;
pub mod traversal;
pub mod upload;

// Re-export main functions for convenience
pub use payload::DELIMITER;
pub use steganography::{capacity, capacity_of, embed, embed_text_bytes, extract, extract_text_bytes, LsbCodec};
pub use traversal::Traversal;
