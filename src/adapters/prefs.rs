//! Preference store adapter.
//!
//! Implements [`StoragePort`] as a small key-value map.  Two backends:
//!
//! - **file**: the whole map is serialized to a JSON file and rewritten
//!   on every change (write to a temp file, then rename, so a crash never
//!   leaves a half-written store).
//! - **memory**: nothing leaves the process; used by tests and as the
//!   fallback when the file cannot be opened.
//!
//! Values are opaque bytes; callers encode them with `postcard`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::app::ports::{StorageError, StoragePort};

pub struct PrefsStore {
    path: Option<PathBuf>,
    store: BTreeMap<String, Vec<u8>>,
}

impl PrefsStore {
    /// Volatile store.
    pub fn in_memory() -> Self {
        info!("PrefsStore: in-memory backend");
        Self {
            path: None,
            store: BTreeMap::new(),
        }
    }

    /// File-backed store.  A missing file is an empty store; an
    /// unreadable or corrupt one is an error.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let store = match std::fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json).map_err(|_| StorageError::Corrupted)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                warn!("PrefsStore: cannot read {}: {}", path.display(), e);
                return Err(StorageError::IoError);
            }
        };
        info!("PrefsStore: {} ({} keys)", path.display(), store.len());
        Ok(Self {
            path: Some(path),
            store,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn composite_key(namespace: &str, key: &str) -> String {
        format!("{}::{}", namespace, key)
    }

    fn flush(&self) -> Result<(), StorageError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(&self.store).map_err(|_| StorageError::IoError)?;
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, json)
            .and_then(|()| std::fs::rename(&tmp, path))
            .map_err(|e| {
                warn!("PrefsStore: write to {} failed: {}", path.display(), e);
                StorageError::IoError
            })
    }
}

impl StoragePort for PrefsStore {
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError> {
        let data = self
            .store
            .get(&Self::composite_key(namespace, key))
            .ok_or(StorageError::NotFound)?;
        if data.len() > buf.len() {
            return Err(StorageError::BufferTooSmall);
        }
        buf[..data.len()].copy_from_slice(data);
        Ok(data.len())
    }

    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        self.store
            .insert(Self::composite_key(namespace, key), data.to_vec());
        self.flush()
    }

    fn exists(&self, namespace: &str, key: &str) -> bool {
        self.store
            .contains_key(&Self::composite_key(namespace, key))
    }
}
