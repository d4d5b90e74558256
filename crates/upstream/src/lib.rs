//! Client for the Astronomy Picture of the Day feed.
//!
//! [`UpstreamClient`] talks to the real JSON endpoint over HTTP. The worker
//! only sees the [`ApodSource`] trait, so tests can swap in `MockSource`
//! (feature `mock`).

mod client;
pub mod error;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod payload;
mod source;

pub use crate::client::UpstreamClient;
pub use crate::error::ErrorKind;
#[cfg(any(test, feature = "mock"))]
pub use crate::mock::MockSource;
pub use crate::payload::Payload;
pub use crate::source::{ApodSource, ImageBody, SourceHandle};
