//! Persistent [`KeyValueStorage`] adapter backed by SQLite.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, OptionalExtension};

use super::KeyValueStorage;
use crate::database::Database;
use crate::types::errors::StorageError;

/// Stores every key as a row of the `kv_store` table.
pub struct SqliteStorage {
    db: Mutex<Database>,
}

impl SqliteStorage {
    /// Opens (or creates) the store at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        Ok(Self::from_database(Database::open(path)?))
    }

    /// Opens a throwaway in-memory SQLite store.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        Ok(Self::from_database(Database::open_in_memory()?))
    }

    pub fn from_database(db: Database) -> Self {
        Self { db: Mutex::new(db) }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Database>, StorageError> {
        self.db
            .lock()
            .map_err(|e| StorageError::Backend(format!("database lock poisoned: {}", e)))
    }
}

impl KeyValueStorage for SqliteStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let db = self.lock()?;
        let value = db
            .connection()
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let db = self.lock()?;
        db.connection().execute(
            "INSERT INTO kv_store (key, value, seq) \
             VALUES (?1, ?2, (SELECT COALESCE(MAX(seq), 0) + 1 FROM kv_store)) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let db = self.lock()?;
        db.connection()
            .execute("DELETE FROM kv_store WHERE key = ?1", params![key])?;
        Ok(())
    }

    fn len(&self) -> Result<usize, StorageError> {
        let db = self.lock()?;
        let count: i64 = db
            .connection()
            .query_row("SELECT COUNT(*) FROM kv_store", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn key(&self, index: usize) -> Result<Option<String>, StorageError> {
        let db = self.lock()?;
        let key = db
            .connection()
            .query_row(
                "SELECT key FROM kv_store ORDER BY seq LIMIT 1 OFFSET ?1",
                params![index as i64],
                |row| row.get(0),
            )
            .optional()?;
        Ok(key)
    }
}
