//! Storage backend trait and implementations.
//!
//! This module defines the `StorageBackend` trait: the handful of operations
//! the archive needs from wherever image blobs are kept.

mod local;
#[cfg(any(test, feature = "mock"))]
mod mock;

pub use self::local::LocalBackend;
#[cfg(any(test, feature = "mock"))]
pub use self::mock::MockBackend;
use crate::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use tokio::io::AsyncRead;

/// An owned byte source, typically a response body still on the wire.
pub type BoxAsyncRead = Pin<Box<dyn AsyncRead + Send + 'static>>;

/// Unified interface for storage backends.
///
/// # Path Handling
/// All paths are relative to the storage root and are validated with
/// [`validate_path`](crate::validate_path) before use. A path that would
/// escape the root is an [`InvalidPath`](crate::error::ErrorKind::InvalidPath)
/// error, never a silent rewrite.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use apod_storage::{BoxAsyncRead, StorageBackend, error::Result};
///
/// async fn stage(backend: &dyn StorageBackend, body: BoxAsyncRead) -> Result<String> {
///     let path = Path::new("2024-09-18.jpg");
///     backend.write_stream(path, body).await?;
///     Ok(backend.locate(path)?.display().to_string())
/// }
/// ```
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Name of the configured backend, used for logging only.
    fn name(&self) -> &str;

    /// Stream `reader` into a file, returning the number of bytes written.
    ///
    /// Parent directories are created as needed and an existing file at the
    /// same path is overwritten. Once this returns `Ok` the bytes are durable
    /// enough to be referenced from the archive. On error, whatever was
    /// written so far may be left behind.
    async fn write_stream(&self, path: &Path, reader: BoxAsyncRead) -> Result<u64>;

    /// The location to record for `path`: the backend root joined with the
    /// validated relative path, exactly as the root was configured.
    fn locate(&self, path: &Path) -> Result<PathBuf>;
}
