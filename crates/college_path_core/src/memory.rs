//! crates/college_path_core/src/memory.rs
//!
//! An in-process implementation of the `KeyValueStore` port.

use std::collections::HashMap;

use crate::ports::{KeyValueStore, PortError, PortResult};

/// A `HashMap`-backed key-value store with an optional size quota.
///
/// The quota counts the bytes of every key and value currently stored, which
/// is close enough to how browser storage accounts for usage.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    entries: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: HashMap::new(),
            quota: Some(quota),
        }
    }

    /// Pre-populates a key, bypassing the quota. Useful for simulating state
    /// left behind by an earlier run.
    pub fn seed(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn usage_with(&self, key: &str, value: &str) -> usize {
        let others: usize = self
            .entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum();
        others + key.len() + value.len()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> PortResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> PortResult<()> {
        if let Some(quota) = self.quota {
            let needed = self.usage_with(key, value);
            if needed > quota {
                return Err(PortError::QuotaExceeded { needed, quota });
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> PortResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_rejects_oversized_write_and_keeps_old_value() {
        let mut store = MemoryKeyValueStore::with_quota(16);
        store.set("k", "small").unwrap();

        let err = store.set("k", "this value is far too long").unwrap_err();
        assert!(matches!(err, PortError::QuotaExceeded { quota: 16, .. }));
        assert_eq!(store.get("k").unwrap().as_deref(), Some("small"));
    }

    #[test]
    fn overwriting_a_key_does_not_double_count_it() {
        let mut store = MemoryKeyValueStore::with_quota(10);
        store.set("key", "1234567").unwrap();
        store.set("key", "7654321").unwrap();
        assert_eq!(store.get("key").unwrap().as_deref(), Some("7654321"));
    }

    #[test]
    fn removing_absent_key_is_ok() {
        let mut store = MemoryKeyValueStore::new();
        store.remove("missing").unwrap();
        assert!(store.is_empty());
    }
}
