//! Schema bootstrap for the `kv_store` table behind `SqliteStorage`.
//!
//! Failures surface as `StorageError` so callers of the key-value contract
//! see a single error type whichever backend they run on. The on-disk
//! schema version lives in `PRAGMA user_version`; a file stamped by a newer
//! build is refused instead of being read with the wrong layout.

pub mod migrations;
mod open;

pub(crate) use open::{open_kv_connection, open_kv_connection_in_memory};
