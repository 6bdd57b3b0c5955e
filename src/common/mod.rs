//! # Common Components
//!
//! Shared utilities used by the library, the service facade and the CLI.
//!
//! ## Modules
//!
//! - [`error`]: Typed failure taxonomy for every operation
//! - [`config`]: Configuration parsing utilities
//! - [`logging`]: Logger initialisation for binaries

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Result, StegoCryptError};
