//! Configuration file handling for kantong.
//!
//! The configuration file is stored at `$KANTONG_HOME/config.json` and contains settings for
//! the application such as where the store lives, how often `watch` refreshes, and how many
//! backups to keep.

use crate::backup::Backup;
use crate::store::FileStore;
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_NAME: &str = "kantong";
const CONFIG_VERSION: u8 = 1;
const REFRESH_SECONDS: u64 = 5;
const BACKUP_COPIES: u32 = 5;
const BACKUPS: &str = ".backups";
const STORE: &str = "store";
const CONFIG_JSON: &str = "config.json";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$KANTONG_HOME` and from there it loads `$KANTONG_HOME/config.json`. It provides
/// paths to other items that are either configurable or are expected in a certain location within
/// the home directory.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    backups: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the data directory, its subdirectories, and an initial `config.json` file with
    /// default settings.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the root of data directory, e.g. `$HOME/kantong`
    ///
    /// # Errors
    /// - Returns an error if a `config.json` already exists in `dir`.
    /// - Returns an error if any file operations fail.
    pub async fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        // Create the directory if it does not exist
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the kantong home directory")?;

        // Canonicalize the directory path
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        if config_path.exists() {
            bail!(
                "A config file already exists at '{}'",
                config_path.display()
            )
        }

        let backups = root.join(BACKUPS);
        utils::make_dir(&backups).await?;

        let config_file = ConfigFile::default();
        config_file.save(&config_path).await?;

        let config = Self {
            root,
            backups,
            config_path,
            config_file,
        };
        utils::make_dir(&config.store_path()).await?;
        Ok(config)
    }

    /// This will
    /// - validate that the home directory exists and that the config file exists
    /// - load the config file
    /// - validate that the backups directory exists
    /// - return the loaded configuration object
    pub async fn load(kantong_home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = kantong_home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("Kantong Home is missing, run 'kantong init' first")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!(
                "The config file is missing '{}', run 'kantong init' first",
                config_path.display()
            )
        }
        let config_file = ConfigFile::load(&config_path).await?;

        let config = Self {
            root: root.clone(),
            backups: root.join(BACKUPS),
            config_path,
            config_file,
        };
        if !config.backups.is_dir() {
            bail!(
                "The backups directory is missing '{}'",
                config.backups.display()
            )
        }
        Ok(config)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn backups(&self) -> &Path {
        &self.backups
    }

    pub fn backup_copies(&self) -> u32 {
        self.config_file.backup_copies
    }

    /// How often `watch` refreshes the summary.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.config_file.refresh_seconds)
    }

    /// Returns the configured store directory if it is absolute, otherwise resolves it against
    /// the home directory.
    pub fn store_path(&self) -> PathBuf {
        let p = self.config_file.store_path();
        if p.is_absolute() {
            return p;
        }
        self.root.join(p)
    }

    /// Opens the file store that holds the records.
    pub async fn store(&self) -> Result<FileStore> {
        FileStore::open(self.store_path()).await
    }

    /// Creates a new `Backup` instance for managing backup files.
    pub fn backup(&self) -> Backup {
        Backup::new(self)
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "kantong",
///   "config_version": 1,
///   "refresh_seconds": 5,
///   "backup_copies": 5,
///   "store_path": "store"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "kantong"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Seconds between refreshes in `kantong watch`
    #[serde(default = "default_refresh_seconds")]
    refresh_seconds: u64,

    /// Number of backup copies to keep per store key
    #[serde(default = "default_backup_copies")]
    backup_copies: u32,

    /// Directory holding the store files (optional, relative to the home directory or absolute)
    /// Defaults to $KANTONG_HOME/store if not specified
    #[serde(skip_serializing_if = "Option::is_none")]
    store_path: Option<PathBuf>,
}

fn default_refresh_seconds() -> u64 {
    REFRESH_SECONDS
}

fn default_backup_copies() -> u32 {
    BACKUP_COPIES
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            refresh_seconds: REFRESH_SECONDS,
            backup_copies: BACKUP_COPIES,
            store_path: Some(PathBuf::from(STORE)),
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile asynchronously from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if its values are invalid
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path).await?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        anyhow::ensure!(
            config.config_version <= CONFIG_VERSION,
            "Config file version {} is newer than this program supports ({})",
            config.config_version,
            CONFIG_VERSION
        );
        anyhow::ensure!(
            config.refresh_seconds >= 1,
            "Invalid refresh_seconds in config file: must be at least 1"
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }

    /// Gets the store directory.
    ///
    /// If the path is relative, it should be interpreted as relative to the home directory.
    pub fn store_path(&self) -> PathBuf {
        self.store_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(STORE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn write_config(dir: &TempDir, json: &str) -> PathBuf {
        let config_path = dir.path().join(CONFIG_JSON);
        utils::write(&config_path, json).await.unwrap();
        config_path
    }

    #[tokio::test]
    async fn test_config_create() {
        let dir = TempDir::new().unwrap();
        let home_dir = dir.path().join("kantong_home");

        let config = Config::create(&home_dir).await.unwrap();

        assert!(config.config_path().is_file());
        assert!(config.backups().is_dir());
        assert!(config.store_path().is_dir());
        assert_eq!(config.store_path(), config.root().join(STORE));
        assert_eq!(config.refresh_interval(), Duration::from_secs(5));
        assert_eq!(config.backup_copies(), 5);
    }

    #[tokio::test]
    async fn test_config_create_twice_fails() {
        let dir = TempDir::new().unwrap();
        Config::create(dir.path()).await.unwrap();
        let result = Config::create(dir.path()).await;
        assert!(result.unwrap_err().to_string().contains("already exists"));
    }

    #[tokio::test]
    async fn test_config_create_then_load() {
        let dir = TempDir::new().unwrap();
        let created = Config::create(dir.path()).await.unwrap();
        let loaded = Config::load(dir.path()).await.unwrap();
        assert_eq!(created.root(), loaded.root());
        assert_eq!(created.store_path(), loaded.store_path());
        assert_eq!(created.config_file, loaded.config_file);
    }

    #[tokio::test]
    async fn test_config_load_missing_home() {
        let dir = TempDir::new().unwrap();
        assert!(Config::load(dir.path().join("nope")).await.is_err());
    }

    #[tokio::test]
    async fn test_config_load_missing_backups_dir() {
        let dir = TempDir::new().unwrap();
        Config::create(dir.path()).await.unwrap();
        tokio::fs::remove_dir(dir.path().join(BACKUPS)).await.unwrap();
        let err = Config::load(dir.path()).await.unwrap_err();
        assert!(err.to_string().contains("backups directory is missing"));
    }

    #[test]
    fn test_config_file_default() {
        let config = ConfigFile::default();
        assert_eq!(config.app_name, "kantong");
        assert_eq!(config.refresh_seconds, 5);
        assert_eq!(config.backup_copies, 5);
        assert_eq!(config.store_path(), PathBuf::from(STORE));
    }

    #[tokio::test]
    async fn test_config_file_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");

        let original = ConfigFile {
            refresh_seconds: 3,
            backup_copies: 9,
            store_path: Some(PathBuf::from("/var/lib/kantong")),
            ..ConfigFile::default()
        };
        original.save(&config_path).await.unwrap();

        let loaded = ConfigFile::load(&config_path).await.unwrap();
        assert_eq!(original, loaded);
    }

    #[tokio::test]
    async fn test_config_file_load_with_minimal_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(
            &temp_dir,
            r#"{
                "app_name": "kantong",
                "config_version": 1
            }"#,
        )
        .await;

        let config = ConfigFile::load(&path).await.unwrap();
        assert_eq!(config.refresh_seconds, REFRESH_SECONDS);
        assert_eq!(config.backup_copies, BACKUP_COPIES);
        assert_eq!(config.store_path(), PathBuf::from(STORE));
    }

    #[tokio::test]
    async fn test_config_file_load_invalid_app_name() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(
            &temp_dir,
            r#"{ "app_name": "wrong_app", "config_version": 1 }"#,
        )
        .await;

        let result = ConfigFile::load(&path).await;
        assert!(result.unwrap_err().to_string().contains("Invalid app_name"));
    }

    #[tokio::test]
    async fn test_config_file_load_zero_refresh() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(
            &temp_dir,
            r#"{ "app_name": "kantong", "config_version": 1, "refresh_seconds": 0 }"#,
        )
        .await;

        let result = ConfigFile::load(&path).await;
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("refresh_seconds"));
    }

    #[tokio::test]
    async fn test_config_file_load_newer_version() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(
            &temp_dir,
            r#"{ "app_name": "kantong", "config_version": 2 }"#,
        )
        .await;
        assert!(ConfigFile::load(&path).await.is_err());
    }

    #[test]
    fn test_config_file_serialization_omits_none_fields() {
        let config = ConfigFile {
            store_path: None,
            ..ConfigFile::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("store_path"));
    }

    #[test]
    fn test_absolute_store_path_is_kept() {
        let config = Config {
            root: PathBuf::from("/home/user/kantong"),
            backups: PathBuf::from("/home/user/kantong/.backups"),
            config_path: PathBuf::from("/home/user/kantong/config.json"),
            config_file: ConfigFile {
                store_path: Some(PathBuf::from("/data/store")),
                ..ConfigFile::default()
            },
        };
        assert_eq!(config.store_path(), PathBuf::from("/data/store"));
    }
}
