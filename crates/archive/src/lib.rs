//! PostgreSQL archive of Astronomy Picture of the Day entries.
//!
//! This crate is the durable half of the archive: one row per calendar date,
//! holding the metadata the upstream feed published and the path of the image
//! blob written to disk before the row was committed. The image bytes
//! themselves live in `apod-storage`; to this crate the path is opaque.
//!
//! # Architecture
//! - [`ArchiveStore`] is the seam every other component depends on. It is
//!   implemented by [`Repository`] (PostgreSQL, via `sqlx`) and, behind the
//!   `mock` feature, by an in-memory `MockStore` for tests.
//! - The `date` column is the natural key. The store enforces uniqueness on it
//!   and reports a conflicting insert as [`ErrorKind::DuplicateDate`] so that
//!   callers can tell "someone beat me to it" apart from a real failure.
//! - The archive is append-only. Entries are never updated or deleted.

mod db;
pub mod entry;
pub mod error;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod models;
mod repo;
mod store;

pub use crate::db::Database;
pub use crate::entry::{ArchiveEntry, NewEntry, parse_date};
pub use crate::error::ErrorKind;
#[cfg(any(test, feature = "mock"))]
pub use crate::mock::MockStore;
pub use crate::repo::Repository;
pub use crate::store::{ArchiveStore, StoreHandle};
