//! In-memory [`KeyValueStorage`] adapter.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::KeyValueStorage;
use crate::types::errors::StorageError;

#[derive(Default)]
struct MemoryState {
    values: HashMap<String, String>,
    order: Vec<String>,
}

/// A process-local map. Keys enumerate in first-insertion order.
#[derive(Default)]
pub struct InMemoryStorage {
    state: Mutex<MemoryState>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every key.
    pub fn clear(&self) -> Result<(), StorageError> {
        let mut state = self.lock()?;
        state.values.clear();
        state.order.clear();
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, StorageError> {
        self.state
            .lock()
            .map_err(|e| StorageError::Backend(format!("memory store poisoned: {}", e)))
    }
}

impl KeyValueStorage for InMemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.values.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut state = self.lock()?;
        if state.values.insert(key.to_string(), value.to_string()).is_none() {
            state.order.push(key.to_string());
        }
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut state = self.lock()?;
        if state.values.remove(key).is_some() {
            state.order.retain(|k| k != key);
        }
        Ok(())
    }

    fn len(&self) -> Result<usize, StorageError> {
        Ok(self.lock()?.values.len())
    }

    fn key(&self, index: usize) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.order.get(index).cloned())
    }
}
