//! Key/value persistence for client-side state.
//!
//! Each key maps to one JSON file in the storage directory. Writes go to a
//! temporary file first and are renamed into place.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur when loading or saving persisted state.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid storage key '{key}'")]
    InvalidKey { key: String },

    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Directory-backed store of JSON values under fixed keys.
#[derive(Debug, Clone)]
pub struct PersistentStore {
    dir: PathBuf,
}

impl PersistentStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::InvalidKey {
                key: key.to_string(),
            });
        }
        Ok(self.dir.join(format!("{key}.json")))
    }

    /// Load the value stored under `key`, or `None` if nothing was saved.
    pub fn load_persisted<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let path = self.path_for(key)?;
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::Read { path, source }),
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| StoreError::Parse { path, source })
    }

    /// Like [`load_persisted`](Self::load_persisted), but a file that no
    /// longer parses is logged and treated as absent. The next save
    /// overwrites it.
    pub fn load_or_discard<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.load_persisted(key) {
            Err(StoreError::Parse { path, source }) => {
                tracing::warn!(
                    key,
                    path = %path.display(),
                    error = %source,
                    "Discarding unreadable persisted state"
                );
                Ok(None)
            }
            other => other,
        }
    }

    /// Save `value` under `key`, replacing any previous value.
    pub fn save_persisted<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        let body = serde_json::to_vec_pretty(value).map_err(|source| StoreError::Serialize {
            key: key.to_string(),
            source,
        })?;

        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Write {
            path: self.dir.clone(),
            source,
        })?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, body).map_err(|source| StoreError::Write {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| StoreError::Write {
            path: path.clone(),
            source,
        })?;

        tracing::trace!(key, path = %path.display(), "Persisted state saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_key_loads_none() {
        let dir = TempDir::new().unwrap();
        let store = PersistentStore::new(dir.path().to_path_buf());
        let value: Option<String> = store.load_persisted("theme-store").unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = PersistentStore::new(dir.path().join("nested"));
        store.save_persisted("theme-store", "dark").unwrap();
        let value: Option<String> = store.load_persisted("theme-store").unwrap();
        assert_eq!(value.as_deref(), Some("dark"));
        assert!(!dir.path().join("nested/theme-store.json.tmp").exists());
    }

    #[test]
    fn rejects_path_like_keys() {
        let dir = TempDir::new().unwrap();
        let store = PersistentStore::new(dir.path().to_path_buf());
        assert!(matches!(
            store.save_persisted("../escape", &1),
            Err(StoreError::InvalidKey { .. })
        ));
    }

    #[test]
    fn corrupt_file_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("activity-store.json"), "{not json").unwrap();
        let store = PersistentStore::new(dir.path().to_path_buf());
        let result: Result<Option<Vec<u32>>, _> = store.load_persisted("activity-store");
        assert!(matches!(result, Err(StoreError::Parse { .. })));

        let discarded: Option<Vec<u32>> = store.load_or_discard("activity-store").unwrap();
        assert!(discarded.is_none());
    }
}
