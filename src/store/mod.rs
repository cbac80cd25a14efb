//! The key-value store that records are persisted in.
//!
//! The store is deliberately dumb: it maps a key to a string and knows nothing about records.
//! Parsing and aggregation happen in `crate::ledger`.

mod file;
mod memory;

use crate::Result;

pub use file::FileStore;
pub use memory::MemoryStore;

/// An asynchronous string-to-string store, the analogue of a device's local key-value storage.
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    /// Returns the value stored under `key`, or `None` if nothing has been stored yet.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the value stored under `key`.
    async fn set(&self, key: &str, value: String) -> Result<()>;

    /// Removes `key`. Removing a key that does not exist is not an error.
    async fn remove(&self, key: &str) -> Result<()>;

    /// Reads several keys as one consistent view. Implementations that can exclude concurrent
    /// writes while doing so should override this; the default reads the keys one at a time.
    async fn snapshot(&self, keys: &[&str]) -> Result<Vec<Option<String>>> {
        let mut values = Vec::with_capacity(keys.len());
        for key in keys {
            values.push(self.get(key).await?);
        }
        Ok(values)
    }
}
