// Mediamarks repositories
// Managers own CRUD and paginated queries over entities kept in a key-value store.
// Each entity is stored under its own id; an id index key lists them in insertion order.

pub mod bookmark_manager;
pub mod tag_manager;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::storage::KeyValueStorage;
use crate::types::errors::{RepositoryError, StorageError};

/// Page size used when a query builder is not given an explicit limit.
pub const DEFAULT_QUERY_LIMIT: usize = 10;

/// The ordered id list stored under one well-known key.
pub(crate) struct IdIndex<'a> {
    storage: &'a dyn KeyValueStorage,
    key: &'static str,
}

impl<'a> IdIndex<'a> {
    pub(crate) fn new(storage: &'a dyn KeyValueStorage, key: &'static str) -> Self {
        Self { storage, key }
    }

    /// Reads the index. A missing or empty value is an empty index.
    pub(crate) fn load(&self) -> Result<Vec<String>, RepositoryError> {
        match self.storage.get_item(self.key)? {
            Some(serialized) if !serialized.is_empty() => serde_json::from_str(&serialized)
                .map_err(|e| RepositoryError::MalformedRecord(format!("index '{}': {}", self.key, e))),
            _ => Ok(Vec::new()),
        }
    }

    pub(crate) fn store(&self, ids: &[String]) -> Result<(), RepositoryError> {
        let serialized = serde_json::to_string(ids)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.storage.set_item(self.key, &serialized)?;
        Ok(())
    }

    /// Appends `id` unless the index already lists it.
    pub(crate) fn append_if_absent(&self, id: &str) -> Result<bool, RepositoryError> {
        let mut ids = self.load()?;
        if ids.iter().any(|existing| existing == id) {
            return Ok(false);
        }
        ids.push(id.to_string());
        self.store(&ids)?;
        Ok(true)
    }

    /// Drops the first occurrence of `id`. The index is rewritten either way.
    pub(crate) fn remove(&self, id: &str) -> Result<(), RepositoryError> {
        let mut ids = self.load()?;
        if let Some(pos) = ids.iter().position(|existing| existing == id) {
            ids.remove(pos);
        }
        self.store(&ids)
    }
}

/// Reads and decodes the record stored under `id`.
pub(crate) fn read_record<T: DeserializeOwned>(
    storage: &dyn KeyValueStorage,
    kind: &str,
    id: &str,
) -> Result<T, RepositoryError> {
    let saved = storage
        .get_item(id)?
        .ok_or_else(|| RepositoryError::NotFound(format!("{} {}", kind, id)))?;
    serde_json::from_str(&saved)
        .map_err(|e| RepositoryError::MalformedRecord(format!("{} {}: {}", kind, id, e)))
}

pub(crate) fn write_record<T: Serialize>(
    storage: &dyn KeyValueStorage,
    id: &str,
    record: &T,
) -> Result<(), RepositoryError> {
    let serialized = serde_json::to_string(record)
        .map_err(|e| StorageError::Serialization(e.to_string()))?;
    storage.set_item(id, &serialized)?;
    Ok(())
}

/// Applies an offset/limit window, like `slice(offset, offset + limit)`.
pub(crate) fn page<T>(items: Vec<T>, offset: usize, limit: usize) -> Vec<T> {
    items.into_iter().skip(offset).take(limit).collect()
}
