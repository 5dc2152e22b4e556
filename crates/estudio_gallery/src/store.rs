//! Key-value stores the gallery persists into.
//!
//! Each key holds one JSON document. [`FileKeyValueStore`] keeps one file per
//! key; [`MemoryKeyValueStore`] is used by tests and previews.

use estudio_error::{EstudioResult, StorageError, StorageErrorKind};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info};

/// String-keyed document storage.
///
/// Operations are synchronous and whole-value: callers read a document,
/// modify it and write it back.
pub trait KeyValueStore: Send + Sync + std::fmt::Debug {
    /// Read a value. Missing keys are `Ok(None)`.
    fn get(&self, key: &str) -> EstudioResult<Option<String>>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> EstudioResult<()>;

    /// Delete a value. Missing keys are not an error.
    fn remove(&self, key: &str) -> EstudioResult<()>;
}

/// One `<key>.json` file per key inside a data directory.
///
/// Writes go to a temporary file that is then renamed over the target, so
/// a failed write leaves the previous value in place.
#[derive(Debug, Clone, derive_getters::Getters)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    /// Open a store, creating the directory if needed.
    #[tracing::instrument(skip(dir))]
    pub fn new(dir: impl Into<PathBuf>) -> EstudioResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                dir.display(),
                e
            )))
        })?;
        info!(path = %dir.display(), "Opened gallery store");
        Ok(Self { dir })
    }

    /// File backing a key.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", name))
    }
}

fn write_atomically(path: &Path, value: &str) -> Result<(), StorageError> {
    let temp_path = path.with_extension("json.tmp");
    std::fs::write(&temp_path, value).map_err(|e| {
        StorageError::new(StorageErrorKind::FileWrite(format!(
            "{}: {}",
            temp_path.display(),
            e
        )))
    })?;
    std::fs::rename(&temp_path, path).map_err(|e| {
        let _ = std::fs::remove_file(&temp_path);
        StorageError::new(StorageErrorKind::FileWrite(format!(
            "rename {} to {}: {}",
            temp_path.display(),
            path.display(),
            e
        )))
    })
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> EstudioResult<Option<String>> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                path.display(),
                e
            )))
            .into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> EstudioResult<()> {
        let path = self.path_for(key);
        write_atomically(&path, value)?;
        debug!(key, bytes = value.len(), "Stored value");
        Ok(())
    }

    fn remove(&self, key: &str) -> EstudioResult<()> {
        let path = self.path_for(key);
        match std::fs::remove_file(&path) {
            Ok(()) => {
                debug!(key, "Removed value");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::new(StorageErrorKind::FileRemove(format!(
                "{}: {}",
                path.display(),
                e
            )))
            .into()),
        }
    }
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn values(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.values.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> EstudioResult<Option<String>> {
        Ok(self.values().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> EstudioResult<()> {
        self.values().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> EstudioResult<()> {
        self.values().remove(key);
        Ok(())
    }
}
