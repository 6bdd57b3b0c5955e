//! # Cryptography
//!
//! Public-key encryption of short texts and content fingerprints.
//!
//! The two modules are independent of each other and of the
//! steganographic codec; callers compose them (e.g. encrypt a message and
//! hide the base64 ciphertext in an image).

pub mod cipher;
pub mod digest;

pub use cipher::{
    decrypt, encrypt, generate_key_pair, public_key_from_private, KeyPair, MAX_PLAINTEXT_BYTES,
};
pub use digest::{digest, verify, MessageDigest};
