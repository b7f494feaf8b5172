//! SQLite-backed key-value storage.
//!
//! # Invariants
//! - One row per key; `set_item` upserts.
//! - The connection is migrated before the first read or write.

use super::storage::{KeyValueStorage, StorageResult};
use crate::db::{open_kv_connection, open_kv_connection_in_memory};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Durable storage owning one migrated SQLite connection.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens (or creates) the database file at `path`.
    ///
    /// # Errors
    /// - `SchemaTooNew` when the file was written by a newer build.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        Ok(Self {
            conn: open_kv_connection(path.as_ref())?,
        })
    }

    pub fn in_memory() -> StorageResult<Self> {
        Ok(Self {
            conn: open_kv_connection_in_memory()?,
        })
    }
}

impl KeyValueStorage for SqliteStorage {
    fn set_item(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn remove_item(&mut self, key: &str) -> StorageResult<()> {
        self.conn
            .execute("DELETE FROM kv_store WHERE key = ?1;", [key])?;
        Ok(())
    }
}
