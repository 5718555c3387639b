//! # Storage Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StorageError (this module) ← Adds categorization                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CartError::Storage ← Write failed, cart left unchanged                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError { code: STORAGE_ERROR } → "Couldn't save your cart" toast    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Opening the database failed.
    ///
    /// ## When This Occurs
    /// - Data directory is missing or read-only
    /// - Disk full
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// A read or write statement failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// All pooled connections are busy.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// The store was closed; no further reads or writes are possible.
    #[error("Storage is closed")]
    Closed,

    /// Internal storage error.
    #[error("Internal storage error: {0}")]
    Internal(String),
}

/// Convert sqlx errors to StorageError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::Database       → StorageError::QueryFailed
/// sqlx::Error::PoolTimedOut   → StorageError::PoolExhausted
/// sqlx::Error::PoolClosed     → StorageError::Closed
/// Other                       → StorageError::Internal
/// ```
impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => StorageError::QueryFailed(db_err.message().to_string()),
            sqlx::Error::PoolTimedOut => StorageError::PoolExhausted,
            sqlx::Error::PoolClosed => StorageError::Closed,
            _ => StorageError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StorageError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StorageError::MigrationFailed(err.to_string())
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
