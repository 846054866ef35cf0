//! Key-value storage adapters.
//!
//! Everything the repositories persist goes through [`KeyValueStorage`], a
//! synchronous string-to-string map with positional key enumeration. Two
//! adapters ship with the crate:
//!
//! - [`InMemoryStorage`]: a plain map, used by tests and ephemeral sessions.
//! - [`SqliteStorage`]: a persistent store on top of [`crate::database::Database`].
//!
//! Single reads and writes are atomic; nothing spans more than one call.

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryStorage;
pub use sqlite::SqliteStorage;

use crate::types::errors::StorageError;

/// Minimal contract of a string-keyed store.
pub trait KeyValueStorage: Send + Sync {
    /// Returns the value stored under `key`, if any.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    /// Stores `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    /// Removes `key`. Removing an absent key is not an error.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
    /// Number of stored keys.
    fn len(&self) -> Result<usize, StorageError>;
    /// Key at position `index` in insertion order, or `None` past the end.
    fn key(&self, index: usize) -> Result<Option<String>, StorageError>;

    fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }
}
