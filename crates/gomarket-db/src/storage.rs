//! # Key-Value Storage
//!
//! The contract the cart store persists through, plus [`Storage`], the
//! backend enum the app wires in.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  get(key)        → Option<String>   (None: nothing stored yet)          │
//! │  set(key, value) → ()               (full overwrite)                    │
//! │  remove(key)     → ()               (missing key is fine)               │
//! │                                                                         │
//! │  All three may suspend on I/O. None of them time out.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::future::Future;

use crate::error::StorageResult;
use crate::memory::MemoryStorage;
use crate::sqlite::SqliteStorage;

// =============================================================================
// Trait
// =============================================================================

/// Durable string-keyed storage.
///
/// Futures are `Send` so stores can be driven from spawned tasks.
pub trait KeyValueStorage: Send + Sync {
    /// Reads the value stored under `key`.
    fn get(&self, key: &str) -> impl Future<Output = StorageResult<Option<String>>> + Send;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> impl Future<Output = StorageResult<()>> + Send;

    /// Deletes the value under `key`.
    fn remove(&self, key: &str) -> impl Future<Output = StorageResult<()>> + Send;
}

// =============================================================================
// Backend Enum
// =============================================================================

/// The storage backend selected at startup.
///
/// ## Why an Enum?
/// The cart store is generic over [`KeyValueStorage`], but the provider
/// scope needs one concrete type. Two backends do not justify boxing.
#[derive(Debug, Clone)]
pub enum Storage {
    /// Process-local map (tests, previews).
    Memory(MemoryStorage),

    /// SQLite file on the device.
    Sqlite(SqliteStorage),
}

impl Storage {
    /// Short backend name for logs.
    pub fn backend_name(&self) -> &'static str {
        match self {
            Storage::Memory(_) => "memory",
            Storage::Sqlite(_) => "sqlite",
        }
    }
}

impl KeyValueStorage for Storage {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        match self {
            Storage::Memory(s) => s.get(key).await,
            Storage::Sqlite(s) => s.get(key).await,
        }
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        match self {
            Storage::Memory(s) => s.set(key, value).await,
            Storage::Sqlite(s) => s.set(key, value).await,
        }
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        match self {
            Storage::Memory(s) => s.remove(key).await,
            Storage::Sqlite(s) => s.remove(key).await,
        }
    }
}

impl From<MemoryStorage> for Storage {
    fn from(storage: MemoryStorage) -> Self {
        Storage::Memory(storage)
    }
}

impl From<SqliteStorage> for Storage {
    fn from(storage: SqliteStorage) -> Self {
        Storage::Sqlite(storage)
    }
}
