//! Worker Error Types
//!
//! One variant per stage of an ingestion, so a log line says where a tick
//! gave up. The cause is kept in the error tree underneath.

use derive_more::{Display, Error};

/// An ingestion error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for ingestion operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The upstream feed couldn't be fetched or decoded.
    #[display("fetching today's picture failed")]
    Fetch,
    /// The archive couldn't be asked whether the date is already present.
    #[display("checking the archive failed")]
    Check,
    /// The image couldn't be downloaded or written to storage.
    #[display("downloading the image failed")]
    Download,
    /// The entry couldn't be committed to the archive.
    #[display("committing the entry failed")]
    Commit,
}
