//! SQLite backing for the key-value storage adapter.
//!
//! A single `kv_store` table holds every key with its opaque string value and
//! an insertion sequence number, so keys enumerate in the order they were
//! first written. [`crate::storage::SqliteStorage`] is the only user.

pub mod connection;
pub mod migrations;

pub use connection::Database;
