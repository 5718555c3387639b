//! # Memory Storage
//!
//! Process-local backend. Nothing survives a restart; clones share the
//! same map, which is what tests use to "reopen" a store.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::trace;

use crate::error::StorageResult;
use crate::storage::KeyValueStorage;

/// In-memory key-value storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-filled with entries.
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let map = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        MemoryStorage {
            entries: Arc::new(RwLock::new(map)),
        }
    }

    /// Number of stored keys.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Checks if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        trace!(key, "memory get");
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        trace!(key, bytes = value.len(), "memory set");
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        trace!(key, "memory remove");
        self.entries.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_with_entries() {
        let storage = MemoryStorage::with_entries([("a", "1"), ("b", "2")]);

        assert_eq!(storage.len().await, 2);
        assert_eq!(storage.get("b").await.unwrap().as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let storage = MemoryStorage::new();
        let other = storage.clone();

        storage.set("k", "v").await.unwrap();

        assert_eq!(other.get("k").await.unwrap().as_deref(), Some("v"));
        assert!(!other.is_empty().await);
    }
}
