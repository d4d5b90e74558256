//! In-memory archive store for testing.

use crate::entry::{ArchiveEntry, NewEntry};
use crate::error::{ErrorKind, Result};
use crate::store::ArchiveStore;
use async_trait::async_trait;
use std::collections::BTreeMap;
use time::Date;
use tokio::sync::RwLock;

/// In-memory archive store for testing.
///
/// Entries are kept in a [`BTreeMap`] keyed by date behind a [`RwLock`], so
/// the uniqueness check and the insert happen under the same write lock and
/// `get_all` comes back in date order, just like the real thing.
///
/// # Examples
///
/// ```ignore
/// use apod_archive::{ArchiveStore, MockStore, NewEntry};
/// use time::macros::date;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let store = MockStore::default();
/// let entry = NewEntry {
///     title: "Moon".to_string(),
///     explanation: "It's the Moon.".to_string(),
///     date: date!(2024 - 09 - 18),
///     copyright: String::new(),
///     local_image_path: "storage/apod/2024-09-18.jpg".to_string(),
/// };
/// store.save(&entry).await.unwrap();
/// assert!(store.exists_by_date(date!(2024 - 09 - 18)).await.unwrap());
/// # }
/// ```
#[derive(Default)]
pub struct MockStore {
    entries: RwLock<(i64, BTreeMap<Date, ArchiveEntry>)>,
}

impl MockStore {
    /// Create a mock store pre-populated with entries (ids assigned in order).
    ///
    /// Panics on duplicate dates. If test setup is wrong, then test should not
    /// pass.
    pub fn with_entries(entries: impl IntoIterator<Item = NewEntry>) -> Self {
        let mut map = BTreeMap::new();
        let mut last_id = 0;
        for entry in entries {
            last_id += 1;
            let date = entry.date;
            if map.insert(date, entry.with_id(last_id)).is_some() {
                panic!("MockStore::with_entries: duplicate date {date}");
            }
        }
        Self { entries: RwLock::new((last_id, map)) }
    }

    /// Number of committed entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.1.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ArchiveStore for MockStore {
    async fn exists_by_date(&self, date: Date) -> Result<bool> {
        Ok(self.entries.read().await.1.contains_key(&date))
    }

    async fn save(&self, entry: &NewEntry) -> Result<ArchiveEntry> {
        let mut guard = self.entries.write().await;
        let (last_id, map) = &mut *guard;
        if map.contains_key(&entry.date) {
            exn::bail!(ErrorKind::DuplicateDate(entry.date));
        }
        *last_id += 1;
        let saved = entry.clone().with_id(*last_id);
        map.insert(entry.date, saved.clone());
        Ok(saved)
    }

    async fn get_by_date(&self, date: Date) -> Result<Option<ArchiveEntry>> {
        Ok(self.entries.read().await.1.get(&date).cloned())
    }

    async fn get_all(&self) -> Result<Vec<ArchiveEntry>> {
        Ok(self.entries.read().await.1.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn new_entry(date: Date) -> NewEntry {
        NewEntry {
            title: "Test".to_string(),
            explanation: String::new(),
            date,
            copyright: String::new(),
            local_image_path: format!("storage/apod/{date}.jpg"),
        }
    }

    #[tokio::test]
    async fn test_save_then_get_by_date() {
        let store = MockStore::default();
        let entry = new_entry(date!(2023 - 09 - 18));
        let saved = store.save(&entry).await.unwrap();
        assert_eq!(saved, entry.with_id(1));
        assert_eq!(store.get_by_date(date!(2023 - 09 - 18)).await.unwrap(), Some(saved));
        assert_eq!(store.get_by_date(date!(2023 - 09 - 19)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_duplicate_date() {
        let store = MockStore::with_entries([new_entry(date!(2023 - 09 - 18))]);
        let err = store.save(&new_entry(date!(2023 - 09 - 18))).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::DuplicateDate(_)));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_get_all_in_date_order() {
        let store = MockStore::with_entries([new_entry(date!(2023 - 09 - 19)), new_entry(date!(2023 - 09 - 18))]);
        let all = store.get_all().await.unwrap();
        assert_eq!(all[0].date, date!(2023 - 09 - 18));
        assert_eq!(all[0].id, 2);
        assert_eq!(all[1].date, date!(2023 - 09 - 19));
    }
}
