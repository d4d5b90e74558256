//! In-memory storage backend for testing.

use crate::backend::BoxAsyncRead;
use crate::error::{ErrorKind, Result};
use crate::path::validate as validate_path;
use crate::StorageBackend;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;
use tokio::sync::RwLock;

/// In-memory storage backend for testing.
///
/// Blobs are kept in a `HashMap` behind a [`RwLock`]. [`locate`] reports
/// paths under a fixed, fictional root so assertions on recorded paths stay
/// stable.
///
/// [`locate`]: StorageBackend::locate
///
/// # Examples
///
/// ```ignore
/// use apod_storage::backend::{MockBackend, StorageBackend};
/// use std::path::Path;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = MockBackend::default();
/// let body: &'static [u8] = b"jpeg bytes";
/// backend.write_stream(Path::new("2024-09-18.jpg"), Box::pin(body)).await?;
/// assert_eq!(backend.get("2024-09-18.jpg").await.as_deref(), Some(&b"jpeg bytes"[..]));
/// # Ok(())
/// # }
/// ```
pub struct MockBackend {
    name: String,
    root: PathBuf,
    blobs: RwLock<HashMap<PathBuf, Vec<u8>>>,
}

impl MockBackend {
    /// Create a mock backend reporting locations under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            name: "mock".to_string(),
            root: root.into(),
            blobs: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored blobs.
    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }

    /// Contents of a stored blob, if any.
    pub async fn get(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.blobs.read().await.get(path.as_ref()).cloned()
    }
}
impl Default for MockBackend {
    fn default() -> Self {
        Self::new("storage/apod")
    }
}

#[async_trait]
impl StorageBackend for MockBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn write_stream(&self, path: &Path, mut reader: BoxAsyncRead) -> Result<u64> {
        let path = validate_path(path)?;
        let mut data = Vec::new();
        reader.read_to_end(&mut data).await.map_err(ErrorKind::Io)?;
        let written = data.len() as u64;
        self.blobs.write().await.insert(path, data);
        Ok(written)
    }

    fn locate(&self, path: &Path) -> Result<PathBuf> {
        Ok(self.root.join(validate_path(path)?))
    }
}
