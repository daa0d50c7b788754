//! Persisted boolean flags.
//!
//! The only value this application persists is the launch gate: a single
//! `first_launch` flag, defaulting to `true` when absent. The store is kept
//! generic over keys anyway so the read contract (explicit default at the
//! call site, never inferred from storage errors) stays in one place.

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tokio::fs::{OpenOptions, create_dir_all, read_to_string};
use tokio::io::AsyncWriteExt;

/// Key of the launch gate flag.
pub const FIRST_LAUNCH_KEY: &str = "first_launch";

/// Errors that can occur while persisting flags.
#[derive(Debug, thiserror::Error)]
pub enum FlagStoreError {
    /// Failed to determine the user's configuration directory. This usually
    /// occurs when required environment variables are missing (e.g., `$HOME`
    /// on Unix or `%APPDATA%` on Windows).
    #[error("failed to obtain user's directories")]
    DirectoriesNotFound,
    /// An I/O error occurred while writing the flag file.
    #[error("failed to write flags: {0}")]
    Io(#[from] std::io::Error),
    /// Failed to serialize the flags to TOML.
    #[error("failed to serialize flags: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// A persisted key-value store of boolean flags.
///
/// Reads are answered from memory; absence is reported as `None` so callers
/// own their defaults. Writes go through to the backing storage.
#[async_trait]
pub trait FlagStore: std::fmt::Debug + Send + Sync {
    /// The stored value for `key`, or `None` when it was never set.
    fn get(&self, key: &str) -> Option<bool>;

    /// Stores `value` under `key`.
    async fn set(&mut self, key: &str, value: bool) -> Result<(), FlagStoreError>;
}

/// On-disk shape of the flag file: a flat TOML table of booleans.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct FlagFile {
    #[serde(flatten)]
    flags: BTreeMap<String, bool>,
}

/// Flag store backed by a TOML file in the user's configuration directory.
#[derive(Debug)]
pub struct TomlFlagStore {
    path: PathBuf,
    file: FlagFile,
}

impl TomlFlagStore {
    /// Loads the flag store from disk.
    ///
    /// A missing, unreadable, or corrupt flag file degrades to the empty set
    /// with a logged warning, which the launch gate reads as a first launch.
    pub async fn load() -> Result<Self, FlagStoreError> {
        let path = flags_path()?;
        log::info!("Loading persisted flags from {path:?}");
        let file = match read_to_string(&path).await {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(flags) => flags,
                Err(error) => {
                    log::warn!("Persisted flags are corrupt, starting over: {error}");
                    FlagFile::default()
                }
            },
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => FlagFile::default(),
            Err(error) => {
                log::warn!("Failed to read persisted flags, starting over: {error}");
                FlagFile::default()
            }
        };
        Ok(Self { path, file })
    }

    async fn save(&self) -> Result<(), FlagStoreError> {
        if let Some(parent) = self.path.parent() {
            create_dir_all(parent).await?;
        }

        let contents = toml::to_string_pretty(&self.file)?;
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .await?;
        file.write_all(contents.as_bytes()).await?;
        file.sync_all().await?;
        Ok(())
    }
}

#[async_trait]
impl FlagStore for TomlFlagStore {
    fn get(&self, key: &str) -> Option<bool> {
        self.file.flags.get(key).copied()
    }

    async fn set(&mut self, key: &str, value: bool) -> Result<(), FlagStoreError> {
        self.file.flags.insert(key.to_string(), value);
        self.save().await
    }
}

fn flags_path() -> Result<PathBuf, FlagStoreError> {
    match ProjectDirs::from("dev", "mingle", "mingle") {
        Some(dirs) => Ok(dirs.config_dir().join("flags.toml")),
        None => Err(FlagStoreError::DirectoriesNotFound),
    }
}

/// In-memory flag store, used by tests and as the degraded fallback when
/// flag storage is unavailable.
#[derive(Debug, Default)]
pub struct MemoryFlagStore {
    flags: BTreeMap<String, bool>,
}

impl MemoryFlagStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FlagStore for MemoryFlagStore {
    fn get(&self, key: &str) -> Option<bool> {
        self.flags.get(key).copied()
    }

    async fn set(&mut self, key: &str, value: bool) -> Result<(), FlagStoreError> {
        self.flags.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_reports_absence_then_value() {
        let mut store = MemoryFlagStore::new();
        assert_eq!(store.get(FIRST_LAUNCH_KEY), None);

        store.set(FIRST_LAUNCH_KEY, false).await.unwrap();
        assert_eq!(store.get(FIRST_LAUNCH_KEY), Some(false));
    }
}
