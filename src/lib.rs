//! Mediamarks: personal bookmarks for images and videos.
//!
//! Bookmarks and tags live in a key-value store behind repository managers;
//! provider connectors fill in titles, authors, dimensions and thumbnails from
//! a media URL. This library crate exposes all modules for the RPC binary and
//! the integration tests.

pub mod app;
pub mod database;
pub mod managers;
pub mod platform;
pub mod rpc_handler;
pub mod services;
pub mod storage;
pub mod types;
