//! Implements the `Store` trait with one JSON file per key in a directory.

use crate::store::Store;
use crate::{utils, Result};
use anyhow::{bail, Context};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::trace;

/// Stores the value of `key` in `{dir}/{key}.json`. Writes replace the file atomically.
///
/// All operations of one `FileStore` are serialized by a lock, which is what makes `snapshot`
/// consistent with respect to `set` calls made through the same instance. Nothing coordinates
/// separate processes.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    /// Opens a store rooted at `dir`, creating the directory if it does not exist.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        utils::make_dir(&dir)
            .await
            .context("Unable to create the store directory")?;
        Ok(Self {
            dir,
            lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The file that holds the value of `key`.
    pub fn path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }

    async fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path(key)?;
        trace!("reading {}", path.display());
        utils::read_optional(&path)
            .await
            .with_context(|| format!("Unable to read the value for '{key}'"))
    }
}

#[async_trait::async_trait]
impl Store for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().await;
        self.read(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let path = self.path(key)?;
        let _guard = self.lock.lock().await;
        trace!("writing {}", path.display());
        utils::write_replace(&path, value)
            .await
            .with_context(|| format!("Unable to write the value for '{key}'"))
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.path(key)?;
        let _guard = self.lock.lock().await;
        utils::remove(&path).await
    }

    async fn snapshot(&self, keys: &[&str]) -> Result<Vec<Option<String>>> {
        let _guard = self.lock.lock().await;
        let mut values = Vec::with_capacity(keys.len());
        for key in keys {
            values.push(self.read(key).await?);
        }
        Ok(values)
    }
}

/// Keys become file names, so they are limited to characters that cannot escape the directory.
fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        bail!("A store key cannot be empty");
    }
    if !key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        bail!("Invalid store key '{key}': only letters, digits, '_' and '-' are allowed");
    }
    Ok(())
}
