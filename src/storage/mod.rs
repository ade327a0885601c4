// src/storage/mod.rs

//! Process-wide key-value store shared across jobs.
//!
//! `GlobalStorage` is a handle: clones refer to the same underlying map, so
//! a write through one clone is immediately visible through every other.
//! Jobs only ever hold a clone for the duration of one execution.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::Value;
use tracing::debug;

use crate::errors::{Result, ScriptJobError};
use crate::fs::FileSystem;

#[derive(Debug, Clone, Default)]
pub struct GlobalStorage {
    inner: Arc<RwLock<BTreeMap<String, Value>>>,
}

impl GlobalStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.read().contains_key(key)
    }

    pub fn count(&self) -> usize {
        self.read().len()
    }

    /// Insert or replace `key`.
    pub fn insert(&self, key: impl Into<String>, value: Value) {
        let key = key.into();
        debug!(key = %key, "globalstorage insert");
        self.write().insert(key, value);
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    /// Remove `key`, returning how many entries were removed (0 or 1).
    pub fn remove(&self, key: &str) -> usize {
        let removed = self.write().remove(key).is_some();
        if removed {
            debug!(key = %key, "globalstorage remove");
        }
        usize::from(removed)
    }

    pub fn value(&self, key: &str) -> Option<Value> {
        self.read().get(key).cloned()
    }

    /// Merge the top-level mapping of a YAML document into the store.
    ///
    /// Existing keys are overwritten. A document that is not a mapping is a
    /// configuration error.
    pub fn load_yaml(&self, fs: &dyn FileSystem, path: &Path) -> Result<usize> {
        let text = fs.read_to_string(path)?;
        let doc: serde_yaml::Value = serde_yaml::from_str(&text)?;
        let Value::Object(map) = serde_json::to_value(doc)? else {
            return Err(ScriptJobError::ConfigError(format!(
                "storage seed {:?} is not a YAML mapping",
                path
            )));
        };

        let loaded = map.len();
        let mut guard = self.write();
        for (key, value) in map {
            guard.insert(key, value);
        }
        debug!(path = ?path, loaded, "globalstorage seeded from YAML");
        Ok(loaded)
    }

    /// Write the whole store as a pretty-printed JSON object.
    pub fn save_json(&self, fs: &dyn FileSystem, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(&*self.read())?;
        fs.write(path, text.as_bytes())?;
        Ok(())
    }

    // Poisoning is ignored: every write leaves the map consistent.
    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<String, Value>> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<String, Value>> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}
