//! Startup Error Types
//!
//! Anything that reaches `main` as one of these ends the process with a
//! non-zero exit code.

use derive_more::{Display, Error};

/// A fatal application error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for application startup and serving.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("invalid configuration")]
    Config,
    #[display("could not start the async runtime")]
    Runtime,
    #[display("could not open the archive database")]
    Database,
    #[display("could not set up image storage")]
    Storage,
    #[display("could not set up the upstream client")]
    Upstream,
    #[display("could not bind HTTP listener on {_0}")]
    Bind(#[error(not(source))] String),
    #[display("HTTP server failed")]
    Serve,
}
