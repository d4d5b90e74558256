//! Archive Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use time::Date;

/// An archive error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for archive operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("database error")]
    Database,
    #[display("database migration error")]
    Migration,
    /// The database could not be reached within the configured attempts.
    #[display("database unreachable after {_0} attempt(s)")]
    Unreachable(#[error(not(source))] u32),
    /// An entry for this date has already been committed. Not a failure from
    /// the archive's point of view; the first writer won.
    #[display("entry already archived for date {_0}")]
    DuplicateDate(#[error(not(source))] Date),
}
