//! The persisted key-value seam and its in-memory implementation.

use pulse_core::{PulseResult, StoreError};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Synchronous string key-value store.
///
/// This is the shape of the host's persisted storage: get/set/remove of
/// whole string values, no transactions, no watches. Every Pulse store
/// serializes its entire collection to one key on each mutation, so the
/// backend only ever sees full-document writes.
pub trait StateStore: Send + Sync {
    fn get(&self, key: &str) -> PulseResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> PulseResult<()>;
    fn remove(&self, key: &str) -> PulseResult<()>;
}

/// In-memory [`StateStore`] for tests and embedders without a host backend.
///
/// `Clone` shares the underlying map, so several stores can be pointed at
/// the same logical storage the way they would share the host's store.
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Keys currently present, unordered. Test helper.
    pub fn keys(&self) -> PulseResult<Vec<String>> {
        let entries = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(entries.keys().cloned().collect())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for MemoryStore {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> PulseResult<Option<String>> {
        let entries = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> PulseResult<()> {
        let mut entries = self.entries.write().map_err(|_| StoreError::LockPoisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> PulseResult<()> {
        let mut entries = self.entries.write().map_err(|_| StoreError::LockPoisoned)?;
        entries.remove(key);
        Ok(())
    }
}
