use crate::error::Result;
use crate::payload::Payload;
use async_trait::async_trait;
use std::pin::Pin;
use std::sync::Arc;
use tokio::io::AsyncRead;

/// An image body still being received. Dropping it abandons the download.
pub type ImageBody = Pin<Box<dyn AsyncRead + Send + 'static>>;

pub type SourceHandle = Arc<dyn ApodSource + Send + Sync>;

/// Where the ingestion worker gets today's picture from.
///
/// Each call is a single attempt. Retrying is the scheduler's business.
#[async_trait]
pub trait ApodSource: Send + Sync {
    /// Fetch the metadata for the current day's picture.
    async fn fetch_latest(&self) -> Result<Payload>;

    /// Start downloading the image at `url`.
    ///
    /// Resolves once the response headers arrived with a 2xx status. Errors
    /// while reading the body (including the download deadline passing)
    /// surface as I/O errors from the returned reader.
    async fn download_image(&self, url: &str) -> Result<ImageBody>;
}
