//! Key/value storage for settings, history, characters, and presets.
//!
//! Values are JSON strings under fixed keys. [`FileStore`] keeps one file
//! per key in a data directory; [`MemoryStore`] keeps them in memory and can
//! enforce a byte quota the way browser storage does.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::error::TableResult;

/// Key for persisted [`sixpool_engine::Settings`].
pub const SETTINGS_KEY: &str = "settings";
/// Key for persisted roll history.
pub const HISTORY_KEY: &str = "history";
/// Key for the persisted character.
pub const CHARACTER_KEY: &str = "character";
/// Key for persisted roll presets.
pub const PRESETS_KEY: &str = "presets";

/// Errors raised by a [`KeyValueStore`].
#[derive(Debug, Error)]
pub enum StorageError {
    /// Writing the value would exceed the store's quota.
    #[error("quota exceeded writing '{key}': {size} bytes over a {quota} byte quota")]
    QuotaExceeded {
        /// Key being written.
        key: String,
        /// Total bytes the store would hold after the write.
        size: usize,
        /// Maximum bytes the store may hold.
        quota: usize,
    },

    /// The backing filesystem failed.
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

/// A durable string key/value store.
pub trait KeyValueStore {
    /// Read the value under `key`, if present.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the value under `key`. Missing keys are not an error.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Read and deserialize the JSON value under `key`.
pub fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> TableResult<Option<T>> {
    match store.get(key)? {
        Some(text) => Ok(Some(serde_json::from_str(&text)?)),
        None => Ok(None),
    }
}

/// Serialize `value` as JSON and write it under `key`.
pub fn save_json<T: Serialize + ?Sized>(
    store: &mut dyn KeyValueStore,
    key: &str,
    value: &T,
) -> TableResult<()> {
    let text = serde_json::to_string(value)?;
    store.set(key, &text)?;
    Ok(())
}

/// One JSON file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store files under `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory holding the files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(path)?))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// An in-memory store with an optional total byte quota.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStore {
    /// An unbounded in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the total size of all stored values to `bytes`.
    pub fn with_quota(mut self, bytes: usize) -> Self {
        self.quota = Some(bytes);
        self
    }

    /// Total bytes currently stored.
    pub fn used(&self) -> usize {
        self.entries.values().map(String::len).sum()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(quota) = self.quota {
            let existing = self.entries.get(key).map_or(0, String::len);
            let size = self.used() - existing + value.len();
            if size > quota {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    size,
                    quota,
                });
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn memory_store_quota() {
        let mut store = MemoryStore::new().with_quota(10);
        store.set("a", "12345").unwrap();
        // replacing a value only counts the difference
        store.set("a", "1234567890").unwrap();
        let err = store.set("b", "x").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { size: 11, .. }));
        assert_eq!(store.get("b").unwrap(), None);
    }

    #[test]
    fn file_store_roundtrip() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::new(dir.path().join("data"));
        assert_eq!(store.get(SETTINGS_KEY).unwrap(), None);
        store.set(SETTINGS_KEY, "{}").unwrap();
        assert!(dir.path().join("data/settings.json").exists());
        assert_eq!(store.get(SETTINGS_KEY).unwrap().as_deref(), Some("{}"));
        store.remove(SETTINGS_KEY).unwrap();
        store.remove(SETTINGS_KEY).unwrap();
        assert_eq!(store.get(SETTINGS_KEY).unwrap(), None);
    }

    #[test]
    fn json_helpers() {
        let mut store = MemoryStore::new();
        save_json(&mut store, "nums", &vec![1, 2, 3]).unwrap();
        let nums: Option<Vec<u32>> = load_json(&store, "nums").unwrap();
        assert_eq!(nums, Some(vec![1, 2, 3]));
        let missing: Option<Vec<u32>> = load_json(&store, "other").unwrap();
        assert_eq!(missing, None);
    }

    #[test]
    fn load_json_reports_bad_data() {
        let mut store = MemoryStore::new();
        store.set("nums", "not json").unwrap();
        assert!(load_json::<Vec<u32>>(&store, "nums").is_err());
    }
}
