//! Config Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A configuration error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// Every variant is fatal at startup; fix the environment and restart.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The layered sources could not be merged or deserialized.
    #[display("could not load configuration")]
    Load,
    /// A configuration file was named explicitly but doesn't exist.
    #[display("configuration file not found: {}", _0.display())]
    FileNotFound(#[error(not(source))] PathBuf),
    /// A required setting has no value and no default.
    #[display("missing required setting: {_0}")]
    Missing(#[error(not(source))] &'static str),
    /// A setting is present but can't be parsed.
    #[display("invalid value for {key}: {value:?}")]
    Invalid {
        #[error(not(source))]
        key: &'static str,
        #[error(not(source))]
        value: String,
    },
}
