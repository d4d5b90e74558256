//! Database connection and pool management.

use apod_config::DatabaseConfig;
use exn::ResultExt;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::instrument;

use crate::error::{ErrorKind, Result};

/// Embedded migrations that are run automatically on connect.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
// Shared by every HTTP handler and the ingestion worker.
const MAX_CONNECTIONS: u32 = 10;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Database connection pool for the archive.
///
/// This is the main entry point for interacting with the archive database.
/// It manages the PostgreSQL connection pool; hand it to a
/// [`Repository`](crate::Repository) to read and write entries.
#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to the archive database described by `config`.
    ///
    /// The first connection is attempted `config.reconnect_attempts` times
    /// (at least once), sleeping `config.reconnect_wait` between attempts.
    /// Migrations run once a connection succeeds. Startup is expected to abort
    /// if this fails.
    #[instrument(skip_all, fields(host = %config.host, port = config.port, database = %config.name))]
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let options = Self::options(config);
        let attempts = config.reconnect_attempts.max(1);
        let mut attempt = 0;
        let pool = loop {
            attempt += 1;
            match PgPoolOptions::new()
                .max_connections(MAX_CONNECTIONS)
                .acquire_timeout(ACQUIRE_TIMEOUT)
                .connect_with(options.clone())
                .await
            {
                Ok(pool) => break pool,
                Err(err) if attempt < attempts => {
                    tracing::warn!(attempt, attempts, error = %err, "failed to connect to database; retrying");
                    tokio::time::sleep(config.reconnect_wait).await;
                },
                Err(err) => return Err(err).or_raise(|| ErrorKind::Unreachable(attempts)),
            }
        };
        tracing::info!(attempt, "connected to database");
        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Wrap an existing pool (tests, or callers that manage their own pool).
    ///
    /// Migrations are **not** run.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    fn options(config: &DatabaseConfig) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.username)
            .password(&config.password)
            .database(&config.name)
            .application_name(env!("CARGO_PKG_NAME"))
    }

    /// Run database migrations.
    ///
    /// This is called automatically by `connect`.
    #[instrument("performing database migrations", skip(self))]
    pub async fn migrate(&self) -> Result<()> {
        MIGRATOR.run(&self.pool).await.or_raise(|| ErrorKind::Migration)
    }

    /// Get a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Close the database connection pool.
    ///
    /// This waits for all connections to be returned to the pool and then
    /// closes them. After calling this, the Database instance should not
    /// be used.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> DatabaseConfig {
        DatabaseConfig {
            host: "db.internal".to_string(),
            port: 6543,
            username: "apod".to_string(),
            password: "hunter2".to_string(),
            name: "archive".to_string(),
            reconnect_attempts: 2,
            reconnect_wait: Duration::from_millis(10),
        }
    }

    #[test]
    fn test_options_from_config() {
        let options = Database::options(&config());
        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 6543);
        assert_eq!(options.get_username(), "apod");
        assert_eq!(options.get_database(), Some("archive"));
    }

    #[tokio::test]
    async fn test_connect_gives_up_after_configured_attempts() {
        // Nothing listens on port 1; every attempt is refused immediately.
        let config = DatabaseConfig { host: "127.0.0.1".to_string(), port: 1, ..config() };
        let err = Database::connect(&config).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Unreachable(2)));
    }

    #[sqlx::test(migrations = false)]
    #[ignore = "requires a PostgreSQL server (DATABASE_URL)"]
    async fn test_migrations_are_idempotent(pool: PgPool) {
        let db = Database::from_pool(pool);
        db.migrate().await.unwrap();
        // Running migrate again should succeed (already applied)
        db.migrate().await.unwrap();
    }
}
