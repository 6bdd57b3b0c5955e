//! # stego-crypt
//!
//! Cryptographic and steganographic engine for short text messages:
//!
//! - [`crypto::cipher`]: RSA-2048 key pairs and RSA-OAEP (SHA-256) encryption
//!   with a fixed 190-byte plaintext ceiling
//! - [`crypto::digest`]: MD5 content fingerprints for integrity display
//! - [`processing::steganography`]: LSB embedding/extraction of delimiter-framed
//!   text in RGB pixel data
//!
//! The components are independent; callers compose them, e.g. encrypt a
//! message and hide the base64 ciphertext in an image. [`service::CryptoCore`]
//! wraps all of them for async callers.
//!
//! ```rust,ignore
//! use stego_crypt::{crypto, processing};
//!
//! let keys = crypto::generate_key_pair()?;
//! let ciphertext = crypto::encrypt("meet at noon", &keys.public_key_pem)?;
//! let cover = std::fs::read("cover.png")?;
//! let stego = processing::embed_text_bytes(&cover, &ciphertext, "shared key")?;
//! let recovered = processing::extract_text_bytes(&stego, "shared key")?;
//! assert_eq!(crypto::decrypt(&recovered, &keys.private_key_pem)?, "meet at noon");
//! ```

pub mod common;
pub mod crypto;
pub mod processing;
pub mod report;
pub mod service;

pub use common::error::{Result, StegoCryptError};
pub use crypto::{KeyPair, MessageDigest};
pub use processing::{LsbCodec, Traversal};
pub use service::CryptoCore;
