//! # gomarket-db: Device Storage for the GoMarketplace Cart
//!
//! A small string-keyed store with two backends. The cart store treats it
//! as opaque durable storage; serialization is the caller's job.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cart Persistence Flow                            │
//! │                                                                         │
//! │  CartStore::increment("p1")                                            │
//! │       │   storage.set("@GoMarketPlace:products", "[...]")              │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    gomarket-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌────────────────┐   ┌───────────────┐   ┌────────────────┐  │   │
//! │  │   │ KeyValueStorage│   │ MemoryStorage │   │ SqliteStorage  │  │   │
//! │  │   │  (storage.rs)  │◄──│ (memory.rs)   │   │ (sqlite.rs)    │  │   │
//! │  │   │  get/set/remove│◄──┼───────────────┼───│ SqlitePool     │  │   │
//! │  │   └────────────────┘   └───────────────┘   └───────┬────────┘  │   │
//! │  │                                                    │           │   │
//! │  └────────────────────────────────────────────────────┼───────────┘   │
//! │                                                       ▼               │
//! │                                     kv_store table (cart.db, WAL)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`storage`] - The `KeyValueStorage` trait and the `Storage` dispatch enum
//! - [`memory`] - Process-local backend
//! - [`sqlite`] - SQLite backend and its configuration
//! - [`migrations`] - Embedded schema migrations
//! - [`error`] - Storage error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gomarket_db::{KeyValueStorage, SqliteConfig, SqliteStorage};
//!
//! let storage = SqliteStorage::connect(SqliteConfig::new("cart.db")).await?;
//! storage.set("@GoMarketPlace:products", "[]").await?;
//! let raw = storage.get("@GoMarketPlace:products").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod memory;
pub mod migrations;
pub mod sqlite;
pub mod storage;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StorageError, StorageResult};
pub use memory::MemoryStorage;
pub use sqlite::{SqliteConfig, SqliteStorage};
pub use storage::{KeyValueStorage, Storage};
