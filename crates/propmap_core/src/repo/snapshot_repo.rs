//! Snapshot persistence adapter.
//!
//! # Responsibility
//! - Write the full ordered collection under one fixed key.
//! - Read it back as plain records, failing soft on corruption.
//!
//! # Invariants
//! - `save` overwrites the previous snapshot; there is no versioning.
//! - `load` never returns an error; corrupt or unreadable data reads as empty.

use super::storage::{KeyValueStorage, StorageError, StorageResult};
use crate::model::property::{Property, StoredProperty};
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key the snapshot lives under unless configured otherwise.
pub const DEFAULT_SNAPSHOT_KEY: &str = "properties";

/// Reasons a snapshot could not be read.
#[derive(Debug)]
pub enum SnapshotError {
    /// Snapshot text does not decode into a record sequence.
    Corrupt(serde_json::Error),
    Storage(StorageError),
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Corrupt(err) => write!(f, "snapshot is corrupt: {err}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Corrupt(err) => Some(err),
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<StorageError> for SnapshotError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Reads and writes the collection snapshot through a storage collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRepository {
    key: String,
}

impl Default for SnapshotRepository {
    fn default() -> Self {
        Self::new(DEFAULT_SNAPSHOT_KEY)
    }
}

impl SnapshotRepository {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Serializes `properties` in order and overwrites the stored snapshot.
    pub fn save<S: KeyValueStorage + ?Sized>(
        &self,
        storage: &mut S,
        properties: &[Property],
    ) -> StorageResult<()> {
        let encoded = serde_json::to_string(properties).map_err(StorageError::Encode)?;
        storage.set_item(&self.key, &encoded)?;
        debug!(
            "event=snapshot_save module=repo status=ok records={} bytes={}",
            properties.len(),
            encoded.len()
        );
        Ok(())
    }

    /// Reads the snapshot, distinguishing absent, corrupt and unreadable.
    ///
    /// Returns `Ok(None)` when no snapshot is stored.
    pub fn try_load<S: KeyValueStorage + ?Sized>(
        &self,
        storage: &S,
    ) -> Result<Option<Vec<StoredProperty>>, SnapshotError> {
        let Some(raw) = storage.get_item(&self.key)? else {
            return Ok(None);
        };
        let records = serde_json::from_str::<Option<Vec<StoredProperty>>>(&raw)
            .map_err(SnapshotError::Corrupt)?;
        Ok(records)
    }

    /// Reads the snapshot as plain records; empty when absent or unreadable.
    pub fn load<S: KeyValueStorage + ?Sized>(&self, storage: &S) -> Vec<StoredProperty> {
        match self.try_load(storage) {
            Ok(Some(records)) => {
                debug!(
                    "event=snapshot_load module=repo status=ok records={}",
                    records.len()
                );
                records
            }
            Ok(None) => {
                debug!("event=snapshot_load module=repo status=ok records=0 reason=absent");
                Vec::new()
            }
            Err(err) => {
                warn!(
                    "event=snapshot_load module=repo status=error error_code=snapshot_unreadable error={err}"
                );
                Vec::new()
            }
        }
    }

    /// Removes the snapshot key.
    pub fn clear<S: KeyValueStorage + ?Sized>(&self, storage: &mut S) -> StorageResult<()> {
        storage.remove_item(&self.key)?;
        debug!("event=snapshot_clear module=repo status=ok");
        Ok(())
    }
}
