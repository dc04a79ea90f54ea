//! In-process key-value store.
//!
//! [`MemoryStore`] holds all entries in a map behind an async mutex.  It
//! follows the same contract as the file-backed store, which makes it the
//! store of choice for tests and for embedding the page without persistence.

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::trace;

use crate::application::preferences_store::{KeyValueStore, StorageError, StorageRecord};

#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<StorageRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `entries`.
    pub fn with_entries(entries: StorageRecord) -> Self {
        Self {
            entries: Mutex::new(entries),
        }
    }

    /// Returns a copy of every stored entry.
    pub async fn entries(&self) -> StorageRecord {
        self.entries.lock().await.clone()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, defaults: StorageRecord) -> Result<StorageRecord, StorageError> {
        let entries = self.entries.lock().await;
        Ok(defaults
            .into_iter()
            .map(|(key, default)| {
                let value = entries.get(&key).cloned().unwrap_or(default);
                (key, value)
            })
            .collect())
    }

    async fn set(&self, record: StorageRecord) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().await;
        trace!(keys = record.len(), "memory store write");
        entries.extend(record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(pairs: &[(&str, serde_json::Value)]) -> StorageRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[tokio::test]
    async fn test_get_on_empty_store_returns_defaults() {
        let store = MemoryStore::new();

        let got = store.get(record(&[("a", json!(1))])).await.unwrap();

        assert_eq!(got, record(&[("a", json!(1))]));
    }

    #[tokio::test]
    async fn test_get_returns_stored_value_over_default() {
        let store = MemoryStore::with_entries(record(&[("a", json!("stored"))]));

        let got = store
            .get(record(&[("a", json!("default")), ("b", json!(false))]))
            .await
            .unwrap();

        assert_eq!(got["a"], json!("stored"));
        assert_eq!(got["b"], json!(false));
    }

    #[tokio::test]
    async fn test_get_only_returns_requested_keys() {
        let store = MemoryStore::with_entries(record(&[("a", json!(1)), ("other", json!(2))]));

        let got = store.get(record(&[("a", json!(0))])).await.unwrap();

        assert_eq!(got.len(), 1);
    }

    #[tokio::test]
    async fn test_set_overwrites_given_keys_and_keeps_others() {
        // Arrange
        let store = MemoryStore::with_entries(record(&[("a", json!(1)), ("keep", json!(true))]));

        // Act
        store.set(record(&[("a", json!(2))])).await.unwrap();

        // Assert
        let entries = store.entries().await;
        assert_eq!(entries["a"], json!(2));
        assert_eq!(entries["keep"], json!(true));
    }
}
