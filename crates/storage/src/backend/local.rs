//! Local filesystem storage backend.
//!
//! Files are stored under a configured directory and accessed via `tokio::fs`.

use crate::backend::BoxAsyncRead;
use crate::error::{ErrorKind, Result};
use crate::{StorageBackend, path::validate as validate_path};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::instrument;

/// Local filesystem storage backend.
///
/// The root may be relative, in which case it resolves against the process
/// working directory at the time of each operation. [`locate`] reports paths
/// under the root as configured, without canonicalising it.
///
/// The root directory itself is created lazily by the first write.
///
/// [`locate`]: StorageBackend::locate
///
/// # Examples
///
/// ```no_run
/// use apod_storage::backend::LocalBackend;
///
/// # fn example() -> apod_storage::error::Result<()> {
/// let backend = LocalBackend::new("images", "./storage/apod")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct LocalBackend {
    name: String,
    root: PathBuf,
}
impl LocalBackend {
    /// Create a new local filesystem backend.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPath`](ErrorKind::InvalidPath) if the root is empty
    /// or exists but is not a directory.
    pub fn new(name: impl Into<String>, root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if root.as_os_str().is_empty() || (root.exists() && !root.is_dir()) {
            exn::bail!(ErrorKind::InvalidPath(root));
        }
        Ok(Self { name: name.into(), root })
    }

    fn absolute_path(&self, path: &Path) -> Result<PathBuf> {
        Ok(self.root.join(validate_path(path)?))
    }

    fn map_io_error(e: std::io::Error, path: &Path) -> ErrorKind {
        match e.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied(path.to_path_buf()),
            _ => ErrorKind::Io(e),
        }
    }
}

#[async_trait]
impl StorageBackend for LocalBackend {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self, reader), fields(backend = %self.name, path = %path.display()))]
    async fn write_stream(&self, path: &Path, mut reader: BoxAsyncRead) -> Result<u64> {
        let abs_path = self.absolute_path(path)?;
        if let Some(parent) = abs_path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| Self::map_io_error(e, parent))?;
        }
        let mut file = fs::File::create(&abs_path).await.map_err(|e| Self::map_io_error(e, path))?;
        let written = tokio::io::copy(&mut reader, &mut file).await.map_err(ErrorKind::Io)?;
        file.flush().await.map_err(ErrorKind::Io)?;
        file.sync_all().await.map_err(ErrorKind::Io)?;
        tracing::debug!(bytes = written, "blob written");
        Ok(written)
    }

    fn locate(&self, path: &Path) -> Result<PathBuf> {
        self.absolute_path(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(data: &'static [u8]) -> BoxAsyncRead {
        Box::pin(data)
    }

    #[test]
    fn test_new_accepts_relative_root() {
        let backend = LocalBackend::new("images", "./storage/apod").unwrap();
        assert_eq!(backend.name(), "images");
        assert!(LocalBackend::new("images", "").is_err());
    }

    #[test]
    fn test_new_rejects_file_root() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = LocalBackend::new("images", file.path()).unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidPath(_)));
    }

    #[test]
    fn test_locate_keeps_root_verbatim() {
        let backend = LocalBackend::new("images", "./storage/apod").unwrap();
        assert_eq!(
            backend.locate(Path::new("2024-09-18.jpg")).unwrap(),
            PathBuf::from("./storage/apod/2024-09-18.jpg")
        );
        assert!(backend.locate(Path::new("../2024-09-18.jpg")).is_err());
    }

    #[tokio::test]
    async fn test_write_stream_creates_missing_root() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path().join("storage/apod");
        let backend = LocalBackend::new("images", &root).unwrap();
        assert!(!root.exists());
        let written = backend.write_stream(Path::new("2024-09-18.jpg"), body(b"seventeen bytes!!")).await.unwrap();
        assert_eq!(written, 17);
        assert_eq!(std::fs::read(root.join("2024-09-18.jpg")).unwrap(), b"seventeen bytes!!");
    }

    #[tokio::test]
    async fn test_write_stream_overwrites() {
        let temp_dir = tempfile::tempdir().unwrap();
        let backend = LocalBackend::new("images", temp_dir.path()).unwrap();
        let path = Path::new("2024-09-18.jpg");
        backend.write_stream(path, body(b"partial download, much longer")).await.unwrap();
        backend.write_stream(path, body(b"complete")).await.unwrap();
        assert_eq!(std::fs::read(temp_dir.path().join(path)).unwrap(), b"complete");
    }

    #[tokio::test]
    async fn test_failed_source_is_io_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let backend = LocalBackend::new("images", temp_dir.path()).unwrap();
        let failing = interrupted_body();
        let err = backend.write_stream(Path::new("2024-09-18.jpg"), failing).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Io(_)));
    }

    // A reader that yields a few bytes then fails, like a connection reset
    // halfway through a download.
    fn interrupted_body() -> BoxAsyncRead {
        use tokio::io::AsyncReadExt;
        let head: &'static [u8] = b"partial";
        Box::pin(head.chain(FailingReader))
    }

    struct FailingReader;
    impl tokio::io::AsyncRead for FailingReader {
        fn poll_read(
            self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
            _buf: &mut tokio::io::ReadBuf<'_>,
        ) -> std::task::Poll<std::io::Result<()>> {
            std::task::Poll::Ready(Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset")))
        }
    }

    #[tokio::test]
    async fn test_path_security() {
        let temp_dir = tempfile::tempdir().unwrap();
        let backend = LocalBackend::new("images", temp_dir.path()).unwrap();
        assert!(backend.write_stream(Path::new("../escape.jpg"), body(b"bad")).await.is_err());
        assert!(backend.write_stream(Path::new("a/../../b.jpg"), body(b"bad")).await.is_err());
        assert!(!temp_dir.path().parent().unwrap().join("escape.jpg").exists());
    }
}
