//! Durable client-side state.
//!
//! Everything the client keeps between runs is a handful of small records in
//! a key-value store: the auth session under [`AUTH_STORAGE_KEY`] and the
//! theme preference under [`THEME_STORAGE_KEY`]. Each record is written and
//! removed as a whole.

use std::{
    collections::HashMap,
    fs,
    io::{self, ErrorKind},
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use crate::error::StorageError;

mod auth;
mod theme;

pub use auth::{AuthStorage, StoredAuthState};
pub use theme::{Theme, ThemeStorage};

pub const AUTH_STORAGE_KEY: &str = "pftracker.auth";
pub const THEME_STORAGE_KEY: &str = "pftracker.theme";

/// Synchronous, local key-value storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    /// Replaces the whole value stored under `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    /// Removes `key`; removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Stores every key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    /// A file that is not UTF-8 fails with [`ErrorKind::InvalidData`].
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let bytes = match fs::read(self.path_for(key)) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        String::from_utf8(bytes)
            .map(Some)
            .map_err(|err| io::Error::new(ErrorKind::InvalidData, err).into())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;

        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        if let Err(err) = fs::rename(&tmp, &path) {
            if let Err(cleanup) = fs::remove_file(&tmp) {
                tracing::warn!(path = %tmp.display(), "failed to remove temporary file: {cleanup}");
            }
            return Err(err.into());
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Process-local store, for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        guard.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_round_trips_and_removes() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("state"));

        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "{\"a\":1}").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("{\"a\":1}"));
        assert!(dir.path().join("state/k.json").exists());

        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn file_store_remove_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.remove("missing").unwrap();
        store.remove("missing").unwrap();
    }

    #[test]
    fn file_store_set_overwrites_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.set("k", "first").unwrap();
        store.set("k", "second").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("second"));
        assert!(!dir.path().join("k.json.tmp").exists());
    }

    #[test]
    fn failed_replace_keeps_no_temporary_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("k.json")).unwrap();
        let store = FileStore::new(dir.path());

        assert!(matches!(store.set("k", "value"), Err(StorageError::Io(_))));
        assert!(!dir.path().join("k.json.tmp").exists());
    }

    #[test]
    fn non_utf8_file_reads_as_invalid_data() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("k.json"), [0xff, 0xfe]).unwrap();
        let store = FileStore::new(dir.path());

        assert!(matches!(
            store.get("k"),
            Err(StorageError::Io(err)) if err.kind() == ErrorKind::InvalidData
        ));
    }

    #[test]
    fn memory_store_keys_are_independent() {
        let store = MemoryStore::new();
        store.set(AUTH_STORAGE_KEY, "a").unwrap();
        store.set(THEME_STORAGE_KEY, "b").unwrap();
        store.remove(AUTH_STORAGE_KEY).unwrap();
        assert_eq!(store.get(AUTH_STORAGE_KEY).unwrap(), None);
        assert_eq!(store.get(THEME_STORAGE_KEY).unwrap().as_deref(), Some("b"));
    }
}
