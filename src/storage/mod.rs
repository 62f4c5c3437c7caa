//! Durable key/value storage
//!
//! The client keeps its credentials in a small key/value store that survives
//! restarts, the terminal counterpart of browser local storage.
//!
//! - [`FileStore`] - JSON object on disk, written through a temp file + rename
//! - [`MemoryStore`] - process-local map, used by tests and ephemeral runs

use crate::types::{ClientError, Result};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Storage key of the bearer token.
pub const AUTH_TOKEN_KEY: &str = "auth_token";
/// Storage key of the serialized user profile.
pub const AUTH_USER_KEY: &str = "auth_user";

/// String key/value storage that survives the current process.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a key. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

// ============= File-backed store =============

/// Key/value pairs stored as one JSON object file.
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw file content; `None` when the file does not exist yet.
    fn read(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(storage_error(&self.path)(e)),
        }
    }

    /// Read the whole map. A missing file is empty; an unreadable or
    /// malformed one is an error.
    fn load(&self) -> Result<BTreeMap<String, String>> {
        let Some(content) = self.read()? else {
            return Ok(BTreeMap::new());
        };
        serde_json::from_str(&content).map_err(|e| {
            ClientError::Storage(format!("{}: malformed storage file: {}", self.path.display(), e))
        })
    }

    /// Map to modify before a write. A malformed file is replaced.
    fn load_for_write(&self) -> Result<BTreeMap<String, String>> {
        let Some(content) = self.read()? else {
            return Ok(BTreeMap::new());
        };
        Ok(serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!("Replacing malformed storage file {:?}: {}", self.path, e);
            BTreeMap::new()
        }))
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(storage_error(&self.path))?;
            }
        }

        let content = serde_json::to_string_pretty(entries)
            .map_err(|e| ClientError::Storage(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content).map_err(storage_error(&tmp))?;
        fs::rename(&tmp, &self.path).map_err(storage_error(&self.path))?;
        Ok(())
    }
}

fn storage_error(path: &Path) -> impl Fn(std::io::Error) -> ClientError + '_ {
    move |e| ClientError::Storage(format!("{}: {}", path.display(), e))
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock();
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.lock();
        let mut entries = self.load_for_write()?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.lock.lock();
        let mut entries = self.load_for_write()?;
        if entries.remove(key).is_none() && !self.path.exists() {
            return Ok(());
        }
        self.save(&entries)
    }
}

// ============= In-memory store =============

#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}
