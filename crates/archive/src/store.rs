use crate::entry::{ArchiveEntry, NewEntry};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use time::Date;

pub type StoreHandle = Arc<dyn ArchiveStore + Send + Sync>;

/// Durable map from calendar date to archive entry.
///
/// # Cancellation
/// Every method is cancel-safe: dropping the returned future (a client
/// disconnecting mid-request, or shutdown) abandons the operation without
/// leaving partial state behind. Reads carry no other cancellation handle.
///
/// # Guarantees
/// - Point reads and [`exists_by_date`](Self::exists_by_date) are
///   linearizable per date.
/// - [`get_all`](Self::get_all) sees at least every entry committed before the
///   call started.
#[async_trait]
pub trait ArchiveStore: Send + Sync {
    /// Whether an entry for `date` has been committed.
    async fn exists_by_date(&self, date: Date) -> Result<bool>;

    /// Insert a new entry, returning it with its assigned identifier.
    ///
    /// Returns [`DuplicateDate`](crate::ErrorKind::DuplicateDate) if the date
    /// is already archived. Callers are expected to check
    /// [`exists_by_date`](Self::exists_by_date) first; the store enforces the
    /// invariant regardless.
    async fn save(&self, entry: &NewEntry) -> Result<ArchiveEntry>;

    /// Look up a single entry; `Ok(None)` means no entry for that date.
    async fn get_by_date(&self, date: Date) -> Result<Option<ArchiveEntry>>;

    /// Every archived entry, oldest date first.
    async fn get_all(&self) -> Result<Vec<ArchiveEntry>>;
}
