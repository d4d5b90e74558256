//! One ingestion: fetch today's payload, download its image, commit the entry.

use crate::error::{ErrorKind, Result};
use apod_archive::{ArchiveEntry, ArchiveStore, ErrorKind as ArchiveErrorKind, StoreHandle};
use apod_storage::{BackendHandle, StorageBackend};
use apod_upstream::{ApodSource, SourceHandle};
use exn::ResultExt;
use std::path::PathBuf;
use time::Date;
use tracing::instrument;

/// What a successful ingestion did.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Outcome {
    /// A new entry was committed.
    Archived(ArchiveEntry),
    /// The archive already had this date; nothing was written to it.
    AlreadyArchived(Date),
}

/// The fetch, download, persist procedure.
///
/// Idempotent per date: running it again for a date that is already archived
/// is a no-op, and a run that failed after writing the image simply
/// overwrites the same blob next time.
#[derive(Clone)]
pub struct Ingestor {
    source: SourceHandle,
    store: StoreHandle,
    storage: BackendHandle,
}

impl Ingestor {
    pub fn new(source: SourceHandle, store: StoreHandle, storage: BackendHandle) -> Self {
        Self { source, store, storage }
    }

    /// Blob path for a date, relative to the storage root.
    pub fn image_path(date: Date) -> PathBuf {
        PathBuf::from(format!("{date}.jpg"))
    }

    #[instrument(name = "ingest", skip(self), fields(storage = self.storage.name(), date = tracing::field::Empty))]
    pub async fn run(&self) -> Result<Outcome> {
        let payload = self.source.fetch_latest().await.or_raise(|| ErrorKind::Fetch)?;
        let date = payload.date;
        tracing::Span::current().record("date", tracing::field::display(date));

        if self.store.exists_by_date(date).await.or_raise(|| ErrorKind::Check)? {
            tracing::info!(%date, "entry already exists, skipping");
            return Ok(Outcome::AlreadyArchived(date));
        }

        let path = Self::image_path(date);
        let body = self.source.download_image(&payload.url).await.or_raise(|| ErrorKind::Download)?;
        let bytes = self.storage.write_stream(&path, body).await.or_raise(|| ErrorKind::Download)?;
        let location = self.storage.locate(&path).or_raise(|| ErrorKind::Download)?;
        tracing::debug!(%date, bytes, location = %location.display(), "image stored");

        let entry = payload.into_entry(location.to_string_lossy());
        match self.store.save(&entry).await {
            Ok(committed) => Ok(Outcome::Archived(committed)),
            Err(err) if matches!(&*err, ArchiveErrorKind::DuplicateDate(_)) => {
                tracing::info!(%date, "entry committed concurrently, skipping");
                Ok(Outcome::AlreadyArchived(date))
            },
            Err(err) => Err(err).or_raise(|| ErrorKind::Commit),
        }
    }
}
