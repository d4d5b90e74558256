//! Relative path validation.
//!
//! Every path handed to a backend is relative to that backend's root. This
//! module normalises such paths and refuses anything that could land outside
//! the root.

use crate::error::{ErrorKind, Result};
use std::path::{Component, Path, PathBuf};

/// Normalise a storage path, rejecting anything that escapes the root.
///
/// `.` components and repeated or trailing separators are dropped, and `..`
/// is resolved as long as it never climbs above the root. Absolute paths are
/// re-rooted rather than rejected. Null bytes, Windows prefixes and paths
/// that normalise to nothing are [`InvalidPath`](ErrorKind::InvalidPath).
///
/// ```
/// use std::path::Path;
/// use apod_storage::validate_path;
///
/// assert_eq!(validate_path("2024-09-18.jpg").unwrap(), Path::new("2024-09-18.jpg"));
/// assert_eq!(validate_path("./2024/../2024-09-18.jpg").unwrap(), Path::new("2024-09-18.jpg"));
/// assert!(validate_path("../2024-09-18.jpg").is_err());
/// ```
pub fn validate(path: impl AsRef<Path>) -> Result<PathBuf> {
    let original = path.as_ref();
    let reject = || ErrorKind::InvalidPath(original.to_path_buf());
    let mut normalised = Vec::new();
    for component in original.components() {
        match component {
            // Null bytes survive Path::components() on Unix but truncate
            // paths in C-based syscalls.
            Component::Normal(part) if part.as_encoded_bytes().contains(&0) => exn::bail!(reject()),
            Component::Normal(part) => normalised.push(part),
            Component::CurDir | Component::RootDir => {},
            Component::ParentDir => {
                if normalised.pop().is_none() {
                    exn::bail!(reject());
                }
            },
            Component::Prefix(_) => exn::bail!(reject()),
        }
    }
    if normalised.is_empty() {
        exn::bail!(reject());
    }
    Ok(normalised.into_iter().collect())
}
