use crate::commands::Out;
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the data directory, its subdirectories and an initial `config.json` with default
/// settings.
///
/// # Arguments
/// - `kantong_home` - The directory that will be the root of data directory, e.g. `$HOME/kantong`
///
/// # Errors
/// - Returns an error if the directory already holds a `config.json`.
/// - Returns an error if any file operations fail.
pub async fn init(kantong_home: &Path) -> Result<Out<()>> {
    let config = Config::create(kantong_home)
        .await
        .context("Unable to create the data directory and configs")?;
    Ok(format!(
        "Successfully created the kantong directory at {}",
        config.root().display()
    )
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_creates_home() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("kantong");
        let out = init(&home).await.unwrap();
        assert!(out.message().starts_with("Successfully created"));
        assert!(home.join("config.json").is_file());
        assert!(Config::load(&home).await.is_ok());
    }

    #[tokio::test]
    async fn test_init_twice_fails() {
        let dir = TempDir::new().unwrap();
        init(dir.path()).await.unwrap();
        let err = init(dir.path()).await.unwrap_err();
        assert!(format!("{err:#}").contains("already exists"));
    }
}
