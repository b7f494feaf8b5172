//! Connection bootstrap for key-value storage.
//!
//! # Invariants
//! - Returned connections have the `kv_store` schema fully applied.
//! - Every open attempt emits exactly one terminal `kv_open` event.

use super::migrations::apply_migrations;
use crate::repo::storage::StorageResult;
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub(crate) fn open_kv_connection(path: &Path) -> StorageResult<Connection> {
    open_with("file", || Connection::open(path))
}

/// Contents live only as long as the returned connection.
pub(crate) fn open_kv_connection_in_memory() -> StorageResult<Connection> {
    open_with("memory", Connection::open_in_memory)
}

fn open_with(
    mode: &'static str,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> StorageResult<Connection> {
    let started_at = Instant::now();
    info!("event=kv_open module=db status=start mode={mode}");

    let mut conn = connect().map_err(|err| {
        error!(
            "event=kv_open module=db status=error mode={mode} duration_ms={} error_code=kv_open_failed error={err}",
            started_at.elapsed().as_millis()
        );
        err
    })?;

    if let Err(err) = bootstrap_connection(&mut conn) {
        error!(
            "event=kv_open module=db status=error mode={mode} duration_ms={} error_code=kv_schema_failed error={err}",
            started_at.elapsed().as_millis()
        );
        return Err(err);
    }

    info!(
        "event=kv_open module=db status=ok mode={mode} duration_ms={}",
        started_at.elapsed().as_millis()
    );
    Ok(conn)
}

fn bootstrap_connection(conn: &mut Connection) -> StorageResult<()> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    apply_migrations(conn)?;
    Ok(())
}
