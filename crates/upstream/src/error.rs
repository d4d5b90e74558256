//! Upstream Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// An upstream error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for upstream operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Why a call to the upstream feed failed.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// Connection, TLS or protocol failure before or while reading a response.
    #[display("network error")]
    Network,
    /// The request (body included) didn't finish within its deadline.
    #[display("request timed out")]
    Timeout,
    /// The server answered with a non-2xx status.
    #[display("unexpected HTTP status {_0}")]
    Status(#[error(not(source))] u16),
    /// The response body wasn't a payload we understand.
    #[display("could not decode upstream response")]
    Decode,
    /// A configured or upstream-supplied URL doesn't parse.
    #[display("invalid URL: {_0:?}")]
    InvalidUrl(#[error(not(source))] String),
}

impl ErrorKind {
    pub(crate) fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode
        } else {
            Self::Network
        }
    }
}

