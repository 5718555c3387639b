//! # SQLite Storage
//!
//! Connection pool setup and the `kv_store` table behind the cart.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      SQLite Key-Value Backend                           │
//! │                                                                         │
//! │  App startup                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SqliteConfig::new(path) ← pool settings                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SqliteStorage::connect(config).await ← pool + migrations              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌────────────────────────────────────────────────┐                    │
//! │  │ kv_store                                       │                    │
//! │  │ key (PK) │ value (JSON text) │ updated_at      │                    │
//! │  └────────────────────────────────────────────────┘                    │
//! │                                                                         │
//! │  set() is an UPSERT: one row per key, always fully overwritten.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! File databases use WAL journaling so a snapshot write never blocks a
//! concurrent read. In-memory databases skip it.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{StorageError, StorageResult};
use crate::migrations;
use crate::storage::KeyValueStorage;

const IN_MEMORY_PATH: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// SQLite backend configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = SqliteConfig::new("/path/to/cart.db")
///     .max_connections(2)
///     .connect_timeout(Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of pooled connections.
    /// Default: 2 (one writer, one reader is plenty for a cart)
    pub max_connections: u32,

    /// Connection acquire timeout.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Whether to run migrations on connect.
    /// Default: true
    pub run_migrations: bool,
}

impl SqliteConfig {
    /// Creates a configuration for the database file at `path`.
    ///
    /// The file is created if it does not exist; its directory must.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SqliteConfig {
            database_path: path.into(),
            max_connections: 2,
            connect_timeout: Duration::from_secs(30),
            run_migrations: true,
        }
    }

    /// Creates an in-memory database configuration (for testing).
    ///
    /// Uses a single connection that is never recycled, since every new
    /// connection to `:memory:` would see an empty database.
    pub fn in_memory() -> Self {
        SqliteConfig {
            database_path: PathBuf::from(IN_MEMORY_PATH),
            max_connections: 1,
            connect_timeout: Duration::from_secs(5),
            run_migrations: true,
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets whether to run migrations on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Checks if this configuration points at an in-memory database.
    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == IN_MEMORY_PATH
    }
}

// =============================================================================
// Storage
// =============================================================================

/// SQLite-backed key-value storage.
///
/// Cheap to clone; clones share the pool.
#[derive(Debug, Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Opens the pool and (optionally) runs migrations.
    ///
    /// ## Returns
    /// * `Ok(SqliteStorage)` - Ready-to-use storage
    /// * `Err(StorageError)` - Connection or migration failed
    pub async fn connect(config: SqliteConfig) -> StorageResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Initializing cart storage"
        );

        let pool = if config.is_in_memory() {
            let options = SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| StorageError::ConnectionFailed(e.to_string()))?;

            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .acquire_timeout(config.connect_timeout)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await
                .map_err(|e| StorageError::ConnectionFailed(e.to_string()))?
        } else {
            let options = SqliteConnectOptions::new()
                .filename(&config.database_path)
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .create_if_missing(true);

            SqlitePoolOptions::new()
                .max_connections(config.max_connections)
                .acquire_timeout(config.connect_timeout)
                .connect_with(options)
                .await
                .map_err(|e| StorageError::ConnectionFailed(e.to_string()))?
        };

        info!(
            max_connections = config.max_connections,
            "Storage pool created"
        );

        let storage = SqliteStorage { pool };

        if config.run_migrations {
            storage.run_migrations().await?;
        }

        Ok(storage)
    }

    /// Runs pending schema migrations. Idempotent.
    pub async fn run_migrations(&self) -> StorageResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    /// Returns the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Closes the pool. Later reads and writes fail with `StorageError::Closed`.
    pub async fn close(&self) {
        info!("Closing cart storage");
        self.pool.close().await;
    }

    /// Checks if the database answers queries.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

impl KeyValueStorage for SqliteStorage {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        debug!(key, "sqlite get");

        let value: Option<String> = sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        debug!(key, bytes = value.len(), "sqlite set");

        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        debug!(key, "sqlite remove");

        sqlx::query("DELETE FROM kv_store WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database() {
        let storage = SqliteStorage::connect(SqliteConfig::in_memory()).await.unwrap();

        assert!(storage.health_check().await);
    }

    #[tokio::test]
    async fn test_config_builder() {
        let config = SqliteConfig::new("/tmp/cart.db")
            .max_connections(4)
            .run_migrations(false);

        assert_eq!(config.max_connections, 4);
        assert!(!config.run_migrations);
        assert!(!config.is_in_memory());
        assert!(SqliteConfig::in_memory().is_in_memory());
    }

    #[tokio::test]
    async fn test_upsert_keeps_one_row() {
        let storage = SqliteStorage::connect(SqliteConfig::in_memory()).await.unwrap();

        storage.set("cart", "[]").await.unwrap();
        storage.set("cart", r#"[{"id":"p1"}]"#).await.unwrap();

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM kv_store")
            .fetch_one(storage.pool())
            .await
            .unwrap();
        assert_eq!(rows, 1);
        assert_eq!(
            storage.get("cart").await.unwrap().as_deref(),
            Some(r#"[{"id":"p1"}]"#)
        );
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let storage = SqliteStorage::connect(SqliteConfig::in_memory()).await.unwrap();

        storage.run_migrations().await.unwrap();

        let (total, applied) = migrations::migration_status(storage.pool()).await.unwrap();
        assert_eq!(total, applied);
    }

    #[tokio::test]
    async fn test_closed_storage_reports_closed() {
        let storage = SqliteStorage::connect(SqliteConfig::in_memory()).await.unwrap();
        storage.close().await;

        let err = storage.set("cart", "[]").await.unwrap_err();

        assert!(matches!(err, StorageError::Closed));
    }

    #[tokio::test]
    async fn test_migration_status_reports_query_failure() {
        let config = SqliteConfig::in_memory().run_migrations(false);
        let storage = SqliteStorage::connect(config).await.unwrap();

        // No _sqlx_migrations table yet
        let err = migrations::migration_status(storage.pool()).await.unwrap_err();
        assert!(matches!(err, StorageError::QueryFailed(_)));

        storage.close().await;
        let err = migrations::migration_status(storage.pool()).await.unwrap_err();
        assert!(matches!(err, StorageError::Closed));
    }
}
