//! Scripted upstream for testing.

use crate::error::{ErrorKind, Result};
use crate::payload::Payload;
use crate::source::{ApodSource, ImageBody};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// A canned upstream that records how often it was called.
///
/// # Examples
///
/// ```ignore
/// use apod_upstream::{ApodSource, MockSource, Payload};
/// use time::macros::date;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let source = MockSource::new(
///     Payload {
///         title: "Moon".to_string(),
///         explanation: "It's the Moon.".to_string(),
///         date: date!(2024 - 09 - 18),
///         copyright: String::new(),
///         url: "http://u/x.jpg".to_string(),
///     },
///     b"jpeg".to_vec(),
/// );
/// assert_eq!(source.fetch_latest().await.unwrap().date, date!(2024 - 09 - 18));
/// assert_eq!(source.fetch_count(), 1);
/// # }
/// ```
pub struct MockSource {
    payload: Mutex<std::result::Result<Payload, u16>>,
    image: Mutex<Option<Vec<u8>>>,
    fetches: AtomicUsize,
    downloads: AtomicUsize,
}

impl MockSource {
    /// An upstream that publishes `payload` and serves `image` for any URL.
    pub fn new(payload: Payload, image: Vec<u8>) -> Self {
        Self {
            payload: Mutex::new(Ok(payload)),
            image: Mutex::new(Some(image)),
            fetches: AtomicUsize::new(0),
            downloads: AtomicUsize::new(0),
        }
    }

    /// An upstream whose JSON endpoint answers with `status`.
    pub fn failing(status: u16) -> Self {
        Self {
            payload: Mutex::new(Err(status)),
            image: Mutex::new(None),
            fetches: AtomicUsize::new(0),
            downloads: AtomicUsize::new(0),
        }
    }

    /// Make the JSON endpoint answer with `status` from now on.
    pub fn fail_fetch(&self, status: u16) {
        *self.payload.lock().unwrap() = Err(status);
    }

    /// Restore the JSON endpoint to publishing `payload`.
    pub fn publish(&self, payload: Payload) {
        *self.payload.lock().unwrap() = Ok(payload);
    }

    /// Make image downloads answer with a 404 from now on.
    pub fn fail_download(&self) {
        *self.image.lock().unwrap() = None;
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn download_count(&self) -> usize {
        self.downloads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ApodSource for MockSource {
    async fn fetch_latest(&self) -> Result<Payload> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let response = self.payload.lock().unwrap().clone();
        response.map_err(|status| ErrorKind::Status(status).into())
    }

    async fn download_image(&self, _url: &str) -> Result<ImageBody> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        let image = self.image.lock().unwrap().clone();
        match image {
            Some(bytes) => Ok(Box::pin(std::io::Cursor::new(bytes))),
            None => exn::bail!(ErrorKind::Status(404)),
        }
    }
}
