//! PostgreSQL-backed [`ArchiveStore`].

use crate::Database;
use crate::entry::{ArchiveEntry, NewEntry};
use crate::error::{ErrorKind, Result};
use crate::models::EntryRow;
use crate::store::ArchiveStore;
use async_trait::async_trait;
use exn::ResultExt;
use sqlx::PgPool;
use time::Date;
use tracing::instrument;

/// Repository for archive entries in the `apod_images` table.
///
/// Cheap to clone; every clone shares the same connection pool.
#[derive(Debug, Clone)]
pub struct Repository {
    pool: PgPool,
}
impl From<&Database> for Repository {
    fn from(db: &Database) -> Self {
        Self { pool: db.pool().clone() }
    }
}
impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn is_unique_violation(err: &sqlx::Error) -> bool {
        matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
    }
}

#[async_trait]
impl ArchiveStore for Repository {
    async fn exists_by_date(&self, date: Date) -> Result<bool> {
        sqlx::query_scalar(include_str!("../queries/exists_by_date.sql"))
            .bind(date)
            .fetch_one(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)
    }

    #[instrument(skip_all, fields(date = %entry.date))]
    async fn save(&self, entry: &NewEntry) -> Result<ArchiveEntry> {
        let inserted: std::result::Result<i64, sqlx::Error> = sqlx::query_scalar(include_str!("../queries/insert_entry.sql"))
            .bind(&entry.title)
            .bind(&entry.explanation)
            .bind(entry.date)
            .bind(&entry.copyright)
            .bind(&entry.local_image_path)
            .fetch_one(&self.pool)
            .await;
        match inserted {
            Ok(id) => Ok(entry.clone().with_id(id)),
            Err(err) if Self::is_unique_violation(&err) => Err(err).or_raise(|| ErrorKind::DuplicateDate(entry.date)),
            Err(err) => Err(err).or_raise(|| ErrorKind::Database),
        }
    }

    async fn get_by_date(&self, date: Date) -> Result<Option<ArchiveEntry>> {
        let row: Option<EntryRow> = sqlx::query_as(include_str!("../queries/get_by_date.sql"))
            .bind(date)
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(row.map(ArchiveEntry::from))
    }

    async fn get_all(&self) -> Result<Vec<ArchiveEntry>> {
        let rows: Vec<EntryRow> = sqlx::query_as(include_str!("../queries/get_all.sql"))
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(rows.into_iter().map(ArchiveEntry::from).collect())
    }
}

// These run against a throwaway database created by `sqlx::test` for each
// test, so they need a reachable server: `DATABASE_URL=postgres://... cargo
// test -- --ignored`.
#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn new_entry(date: Date) -> NewEntry {
        NewEntry {
            title: "Pillars of Creation".to_string(),
            explanation: "Columns of gas and dust.".to_string(),
            date,
            copyright: String::new(),
            local_image_path: format!("storage/apod/{date}.jpg"),
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a PostgreSQL server (DATABASE_URL)"]
    async fn test_save_then_get_by_date(pool: PgPool) {
        let repo = Repository::new(pool);
        let entry = new_entry(date!(2024 - 09 - 18));
        let saved = repo.save(&entry).await.unwrap();
        assert_eq!(saved.clone(), entry.clone().with_id(saved.id));
        let fetched = repo.get_by_date(entry.date).await.unwrap();
        assert_eq!(fetched, Some(saved));
        assert!(repo.exists_by_date(entry.date).await.unwrap());
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a PostgreSQL server (DATABASE_URL)"]
    async fn test_missing_date(pool: PgPool) {
        let repo = Repository::new(pool);
        assert_eq!(repo.get_by_date(date!(2024 - 09 - 18)).await.unwrap(), None);
        assert!(!repo.exists_by_date(date!(2024 - 09 - 18)).await.unwrap());
        assert!(repo.get_all().await.unwrap().is_empty());
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a PostgreSQL server (DATABASE_URL)"]
    async fn test_duplicate_date_is_rejected(pool: PgPool) {
        let repo = Repository::new(pool);
        let entry = new_entry(date!(2024 - 09 - 18));
        repo.save(&entry).await.unwrap();
        let err = repo.save(&entry).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::DuplicateDate(d) if *d == entry.date));
        assert_eq!(repo.get_all().await.unwrap().len(), 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a PostgreSQL server (DATABASE_URL)"]
    async fn test_get_all_is_chronological(pool: PgPool) {
        let repo = Repository::new(pool);
        for date in [date!(2024 - 09 - 20), date!(2024 - 09 - 18), date!(2024 - 09 - 19)] {
            repo.save(&new_entry(date)).await.unwrap();
        }
        let dates: Vec<Date> = repo.get_all().await.unwrap().into_iter().map(|e| e.date).collect();
        assert_eq!(dates, vec![date!(2024 - 09 - 18), date!(2024 - 09 - 19), date!(2024 - 09 - 20)]);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a PostgreSQL server (DATABASE_URL)"]
    async fn test_ids_are_monotonic(pool: PgPool) {
        let repo = Repository::new(pool);
        let first = repo.save(&new_entry(date!(2024 - 09 - 18))).await.unwrap();
        let second = repo.save(&new_entry(date!(2024 - 09 - 19))).await.unwrap();
        assert!(second.id > first.id);
    }
}
