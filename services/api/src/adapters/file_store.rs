//! services/api/src/adapters/file_store.rs
//!
//! A file-backed implementation of the `KeyValueStore` port from the `core`
//! crate. The whole store is one JSON object mapping keys to string values,
//! rewritten on every change.

use college_path_core::ports::{KeyValueStore, PortError, PortResult};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// Durable key-value storage in a single JSON file.
#[derive(Debug)]
pub struct FileKeyValueStore {
    path: PathBuf,
    quota: usize,
    entries: BTreeMap<String, String>,
}

impl FileKeyValueStore {
    /// Opens the store at `path`, starting empty if the file does not exist.
    pub fn open(path: impl Into<PathBuf>, quota: usize) -> PortResult<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => BTreeMap::new(),
            Ok(text) => serde_json::from_str(&text).map_err(|e| {
                PortError::Unexpected(format!("{} is not a key-value file: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(PortError::Unexpected(e.to_string())),
        };
        debug!(path = %path.display(), keys = entries.len(), "Opened state file");
        Ok(Self { path, quota, entries })
    }

    /// Writes `entries` to a sibling temp file and renames it over the
    /// store, so a crash mid-write never leaves a truncated file.
    fn flush(&self, entries: &BTreeMap<String, String>) -> PortResult<()> {
        let encoded =
            serde_json::to_string_pretty(entries).map_err(|e| PortError::Unexpected(e.to_string()))?;
        if encoded.len() > self.quota {
            return Err(PortError::QuotaExceeded {
                needed: encoded.len(),
                quota: self.quota,
            });
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, encoded).map_err(|e| PortError::Unexpected(e.to_string()))?;
        fs::rename(&tmp, &self.path).map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(())
    }
}

//=========================================================================================
// `KeyValueStore` Trait Implementation
//=========================================================================================

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> PortResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> PortResult<()> {
        let mut next = self.entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.flush(&next)?;
        self.entries = next;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> PortResult<()> {
        if !self.entries.contains_key(key) {
            return Ok(());
        }
        let mut next = self.entries.clone();
        next.remove(key);
        self.flush(&next)?;
        self.entries = next;
        Ok(())
    }
}
