use propmap_core::db::migrations::latest_version;
use propmap_core::{KeyValueStorage, SqliteStorage, StorageError};
use rusqlite::Connection;
use std::path::Path;

fn kv_rows(path: &Path) -> Vec<(String, String, i64)> {
    let conn = Connection::open(path).unwrap();
    let mut stmt = conn
        .prepare("SELECT key, value, updated_at FROM kv_store ORDER BY key;")
        .unwrap();
    let rows = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    rows
}

#[test]
fn set_item_upserts_a_single_row_and_refreshes_updated_at() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("propmap.db");
    let mut storage = SqliteStorage::open(&path).unwrap();

    storage.set_item("properties", "[]").unwrap();
    Connection::open(&path)
        .unwrap()
        .execute("UPDATE kv_store SET updated_at = 0 WHERE key = 'properties';", [])
        .unwrap();
    storage.set_item("properties", "[1]").unwrap();

    let rows = kv_rows(&path);
    assert_eq!(rows.len(), 1);
    let (key, value, updated_at) = &rows[0];
    assert_eq!(key, "properties");
    assert_eq!(value, "[1]");
    assert!(*updated_at > 0, "upsert must stamp a fresh updated_at");
}

#[test]
fn keys_are_unique_at_the_schema_level() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("propmap.db");
    let mut storage = SqliteStorage::open(&path).unwrap();
    storage.set_item("properties", "[]").unwrap();

    let conn = Connection::open(&path).unwrap();
    let duplicate = conn.execute(
        "INSERT INTO kv_store (key, value) VALUES ('properties', 'other');",
        [],
    );
    assert!(duplicate.is_err());

    let missing_value = conn.execute("INSERT INTO kv_store (key) VALUES ('empty');", []);
    assert!(missing_value.is_err());
    assert_eq!(storage.get_item("properties").unwrap().as_deref(), Some("[]"));
}

#[test]
fn remove_item_deletes_the_row_and_tolerates_absent_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("propmap.db");
    let mut storage = SqliteStorage::open(&path).unwrap();
    storage.set_item("properties", "[]").unwrap();
    storage.set_item("other", "x").unwrap();

    storage.remove_item("properties").unwrap();
    storage.remove_item("properties").unwrap();

    let keys: Vec<String> = kv_rows(&path).into_iter().map(|(key, _, _)| key).collect();
    assert_eq!(keys, vec!["other".to_string()]);
}

#[test]
fn reopening_keeps_values_and_schema_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("propmap.db");
    {
        let mut storage = SqliteStorage::open(&path).unwrap();
        storage.set_item("properties", "[]").unwrap();
    }

    let storage = SqliteStorage::open(&path).unwrap();
    assert_eq!(storage.get_item("properties").unwrap().as_deref(), Some("[]"));
    let version: u32 = Connection::open(&path)
        .unwrap()
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, latest_version());
}

#[test]
fn file_from_newer_build_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");
    Connection::open(&path)
        .unwrap()
        .execute_batch("PRAGMA user_version = 999;")
        .unwrap();

    match SqliteStorage::open(&path) {
        Err(StorageError::SchemaTooNew { found, supported }) => {
            assert_eq!(found, 999);
            assert_eq!(supported, latest_version());
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("newer schema must not open"),
    }
}
