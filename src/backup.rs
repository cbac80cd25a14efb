//! Rotating copies of a store value, written before the value is replaced.

use crate::{utils, Config, Result};
use anyhow::Context;
use chrono::Local;
use std::path::PathBuf;

/// Manages backup file creation and rotation.
///
/// The `Backup` struct is immutable and owns copies of the paths and settings it needs.
/// Create a new instance via `Config::backup()` or `Backup::new()`.
#[derive(Debug, Clone)]
pub struct Backup {
    backups_dir: PathBuf,
    backup_copies: u32,
}

impl Backup {
    /// Creates a new `Backup` instance from a `Config`.
    pub fn new(config: &Config) -> Self {
        Self::with_settings(config.backups(), config.backup_copies())
    }

    pub fn with_settings(backups_dir: impl Into<PathBuf>, backup_copies: u32) -> Self {
        Self {
            backups_dir: backups_dir.into(),
            backup_copies,
        }
    }

    /// Saves the raw value of store key `key`.
    ///
    /// The filename format is `{key}.YYYY-MM-DD-NNN.json` where NNN is a sequence number.
    /// Automatically rotates old backups, keeping only `backup_copies` files per key.
    ///
    /// Returns the path to the created backup file.
    pub async fn save(&self, key: &str, raw: &str) -> Result<PathBuf> {
        let date = today();
        let seq = self.next_sequence_number(key, &date).await?;
        let path = self.backups_dir.join(format!("{key}.{date}-{seq:03}.json"));

        utils::write(&path, raw)
            .await
            .with_context(|| format!("Unable to back up the '{key}' value"))?;

        self.rotate(key).await?;

        Ok(path)
    }

    /// Scans the backups directory for existing files with the given key and date,
    /// and returns the next sequence number.
    async fn next_sequence_number(&self, key: &str, date: &str) -> Result<u32> {
        let mut max_seq: u32 = 0;
        for name in self.file_names().await? {
            if let Some(seq) = parse_sequence_number(&name, key, date) {
                max_seq = max_seq.max(seq);
            }
        }
        Ok(max_seq + 1)
    }

    /// Deletes the oldest backups of `key` beyond `backup_copies`.
    async fn rotate(&self, key: &str) -> Result<()> {
        let mut files: Vec<String> = self
            .file_names()
            .await?
            .into_iter()
            .filter(|name| is_backup_file(name, key))
            .collect();

        // The name sorts by date and then by sequence number.
        files.sort();

        let to_delete = files.len().saturating_sub(self.backup_copies as usize);
        for name in files.into_iter().take(to_delete) {
            utils::remove(self.backups_dir.join(name)).await?;
        }

        Ok(())
    }

    async fn file_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut dir = utils::read_dir(&self.backups_dir).await?;
        while let Some(entry) = dir
            .next_entry()
            .await
            .context("Failed to read directory entry")?
        {
            names.push(entry.file_name().to_string_lossy().to_string());
        }
        Ok(names)
    }
}

/// Returns today's date in YYYY-MM-DD format.
fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Parses the sequence number from a backup filename of the form `{key}.{date}-{NNN}.json`.
/// Returns None if the filename doesn't match.
fn parse_sequence_number(filename: &str, key: &str, date: &str) -> Option<u32> {
    filename
        .strip_prefix(&format!("{key}.{date}-"))?
        .strip_suffix(".json")?
        .parse()
        .ok()
}

fn is_backup_file(filename: &str, key: &str) -> bool {
    filename.starts_with(&format!("{key}.")) && filename.ends_with(".json")
}
