//! Whole-document JSON collections over a [`StateStore`] key.

use crate::StateStore;
use pulse_core::{PulseResult, StoreError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::warn;

/// A typed collection persisted as one JSON array under a fixed key.
///
/// Every store in the workspace follows the same single-writer policy:
/// load the whole array, mutate in memory, save the whole array. A missing
/// key loads as an empty collection; an unparsable document is treated the
/// same way (and logged), so corrupted storage degrades to an empty view
/// instead of an error.
pub struct Collection<T> {
    store: Arc<dyn StateStore>,
    key: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Collection<T> {
    pub fn new(store: Arc<dyn StateStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            _marker: PhantomData,
        }
    }

    /// The document key this collection persists under.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl<T: DeserializeOwned> Collection<T> {
    /// Load the full collection. Missing or corrupt documents load as empty.
    pub fn load(&self) -> PulseResult<Vec<T>> {
        let Some(raw) = self.store.get(&self.key)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(items) => Ok(items),
            Err(err) => {
                warn!(key = %self.key, error = %err, "corrupt document, recovering as empty");
                Ok(Vec::new())
            }
        }
    }
}

impl<T: Serialize> Collection<T> {
    /// Persist the full collection, replacing the previous document.
    pub fn save(&self, items: &[T]) -> PulseResult<()> {
        let raw = serde_json::to_string(items).map_err(|err| StoreError::Serialize {
            key: self.key.clone(),
            reason: err.to_string(),
        })?;
        self.store.set(&self.key, &raw)
    }
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            key: self.key.clone(),
            _marker: PhantomData,
        }
    }
}
