pub mod crypto_core;

pub use crypto_core::CryptoCore;
