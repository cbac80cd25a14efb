//! Implements the `Store` trait using in-memory data.
//!
//! Note: this is compiled even in the "production" version of this app so that the ledger and
//! the commands can be driven top-to-bottom without touching the filesystem.

use crate::store::Store;
use crate::Result;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// An implementation of the `Store` trait that holds its values in a map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create a new `MemoryStore` seeded with `data`. The map key is the store key and the map
    /// value is the stored string.
    pub fn new(data: HashMap<String, String>) -> Self {
        Self {
            data: Mutex::new(data),
        }
    }

    /// Convenience for seeding a store from string pairs.
    pub fn with_values<'a>(values: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self::new(
            values
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

#[async_trait::async_trait]
impl Store for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.data.lock().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.data.lock().await.remove(key);
        Ok(())
    }

    async fn snapshot(&self, keys: &[&str]) -> Result<Vec<Option<String>>> {
        let data = self.data.lock().await;
        Ok(keys.iter().map(|key| data.get(*key).cloned()).collect())
    }
}
