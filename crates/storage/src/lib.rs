//! Blob storage for archived images.
//!
//! The archive database only records where an image lives; this crate owns
//! the bytes. Writes are streamed straight from the source reader to the
//! backend, so an image is never held in memory in full.

pub mod backend;
pub mod error;
mod path;

pub use crate::backend::{BoxAsyncRead, StorageBackend};
pub use crate::path::validate as validate_path;
use std::sync::Arc;

pub type BackendHandle = Arc<dyn StorageBackend + Send + Sync>;
