//! Authoritative in-memory property collection.
//!
//! # Responsibility
//! - Own the ordered record collection (insertion = display order).
//! - Keep the storage snapshot in step with every mutation.
//! - Rebuild typed records from stored plain records at startup.
//!
//! # Invariants
//! - Record ids are unique within the collection.
//! - After `add` returns `Ok`, the record is both in memory and in storage.
//! - `add` and `reset` are the only mutators; there is no edit or delete.

use crate::model::property::{Property, PropertyId, StoredProperty};
use crate::repo::snapshot_repo::SnapshotRepository;
use crate::repo::storage::{KeyValueStorage, StorageError, StorageResult};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    /// The collection already holds a record with this id.
    DuplicateId(PropertyId),
    Storage(StorageError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateId(id) => write!(f, "property {id} is already in the collection"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::DuplicateId(_) => None,
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<StorageError> for StoreError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Counts produced by `PropertyStore::hydrate`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HydrationReport {
    pub restored: usize,
    pub skipped_invalid: usize,
    pub skipped_duplicate: usize,
    /// Stored records whose id the collection already held.
    pub already_present: usize,
}

#[derive(Debug, Clone, Default)]
pub struct PropertyStore {
    properties: Vec<Property>,
}

impl PropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `property` and rewrites the snapshot.
    ///
    /// # Errors
    /// - `DuplicateId` when the id is already held; nothing is written.
    /// - `Storage` when the snapshot write fails; the append is rolled back
    ///   so memory and storage stay identical.
    pub fn add<S: KeyValueStorage + ?Sized>(
        &mut self,
        property: Property,
        storage: &mut S,
        snapshots: &SnapshotRepository,
    ) -> StoreResult<()> {
        let id = property.id();
        if self.find_by_id(id).is_some() {
            warn!("event=property_add module=store status=rejected reason=duplicate_id id={id}");
            return Err(StoreError::DuplicateId(id));
        }
        self.properties.push(property);

        if let Err(err) = snapshots.save(storage, &self.properties) {
            self.properties.pop();
            warn!(
                "event=property_add module=store status=error error_code=snapshot_write_failed id={id} error={err}"
            );
            return Err(err.into());
        }

        info!(
            "event=property_add module=store status=ok id={id} total={}",
            self.properties.len()
        );
        Ok(())
    }

    /// Linear lookup by id.
    pub fn find_by_id(&self, id: PropertyId) -> Option<&Property> {
        self.properties.iter().find(|property| property.id() == id)
    }

    /// Current collection in display order.
    pub fn all(&self) -> &[Property] {
        &self.properties
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Appends records rebuilt from `stored` that the collection lacks.
    ///
    /// Held records are never dropped or replaced, so hydrating over a
    /// corrupt or stale snapshot cannot shrink the collection. Records that
    /// fail validation or repeat an earlier stored id are skipped.
    pub fn hydrate(&mut self, stored: &[StoredProperty]) -> HydrationReport {
        let mut report = HydrationReport::default();
        let mut restored: Vec<Property> = Vec::new();

        for record in stored {
            if self.find_by_id(record.id).is_some() {
                report.already_present += 1;
                continue;
            }
            if restored.iter().any(|property| property.id() == record.id) {
                report.skipped_duplicate += 1;
                warn!(
                    "event=property_hydrate module=store status=skipped reason=duplicate_id id={}",
                    record.id
                );
                continue;
            }
            match Property::rehydrate(record) {
                Ok(property) => restored.push(property),
                Err(err) => {
                    report.skipped_invalid += 1;
                    warn!(
                        "event=property_hydrate module=store status=skipped reason=invalid_record id={} error={err}",
                        record.id
                    );
                }
            }
        }

        report.restored = restored.len();
        self.properties.extend(restored);
        info!(
            "event=property_hydrate module=store status=ok restored={} already_present={} skipped_invalid={} skipped_duplicate={}",
            report.restored,
            report.already_present,
            report.skipped_invalid,
            report.skipped_duplicate
        );
        report
    }

    /// Removes the snapshot, then empties the collection.
    ///
    /// # Errors
    /// - Returns the storage error and leaves the collection untouched when
    ///   the snapshot cannot be removed.
    pub fn reset<S: KeyValueStorage + ?Sized>(
        &mut self,
        storage: &mut S,
        snapshots: &SnapshotRepository,
    ) -> StorageResult<()> {
        snapshots.clear(storage)?;
        let dropped = self.properties.len();
        self.properties.clear();
        info!("event=property_reset module=store status=ok dropped={dropped}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{PropertyStore, StoreError};
    use crate::model::property::{Coordinates, Property, StoredProperty};
    use crate::repo::snapshot_repo::SnapshotRepository;
    use crate::repo::storage::{KeyValueStorage, MemoryStorage, StorageError, StorageResult};

    struct ReadOnlyStorage;

    impl KeyValueStorage for ReadOnlyStorage {
        fn set_item(&mut self, _key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::Backend("read-only".to_string()))
        }

        fn get_item(&self, _key: &str) -> StorageResult<Option<String>> {
            Ok(None)
        }

        fn remove_item(&mut self, _key: &str) -> StorageResult<()> {
            Err(StorageError::Backend("read-only".to_string()))
        }
    }

    fn sample() -> Property {
        Property::commercial(Coordinates::new(12.9, 77.6), 100.0, 500.0, 8.0)
    }

    #[test]
    fn add_keeps_insertion_order_and_finds_by_id() {
        let mut storage = MemoryStorage::new();
        let snapshots = SnapshotRepository::default();
        let mut store = PropertyStore::new();

        let first = sample();
        let second = Property::residential(Coordinates::new(1.0, 2.0), 50.0, 10.0, 3.0);
        store.add(first.clone(), &mut storage, &snapshots).unwrap();
        store.add(second.clone(), &mut storage, &snapshots).unwrap();

        let ids: Vec<_> = store.all().iter().map(Property::id).collect();
        assert_eq!(ids, vec![first.id(), second.id()]);
        assert_eq!(store.find_by_id(second.id()), Some(&second));
        assert_eq!(snapshots.load(&storage).len(), 2);
    }

    #[test]
    fn failed_snapshot_write_rolls_back_append() {
        let mut storage = ReadOnlyStorage;
        let snapshots = SnapshotRepository::default();
        let mut store = PropertyStore::new();

        let err = store.add(sample(), &mut storage, &snapshots).unwrap_err();
        assert!(matches!(err, StoreError::Storage(StorageError::Backend(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn add_rejects_an_id_already_held() {
        let mut storage = MemoryStorage::new();
        let snapshots = SnapshotRepository::default();
        let mut store = PropertyStore::new();
        let property = sample();
        store.add(property.clone(), &mut storage, &snapshots).unwrap();

        let err = store.add(property.clone(), &mut storage, &snapshots).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId(id) if id == property.id()));
        assert_eq!(store.len(), 1);
        assert_eq!(snapshots.load(&storage).len(), 1);
    }

    #[test]
    fn hydrate_keeps_held_records_and_appends_missing_ones() {
        let mut storage = MemoryStorage::new();
        let snapshots = SnapshotRepository::default();
        let mut store = PropertyStore::new();
        let held = sample();
        store.add(held.clone(), &mut storage, &snapshots).unwrap();

        let report = store.hydrate(&[]);
        assert_eq!(report.restored, 0);
        assert_eq!(store.all(), &[held.clone()]);

        let extra = Property::residential(Coordinates::new(1.0, 2.0), 50.0, 10.0, 3.0);
        let stored: Vec<StoredProperty> =
            serde_json::from_value(serde_json::json!([held, extra])).unwrap();
        let report = store.hydrate(&stored);
        assert_eq!(report.already_present, 1);
        assert_eq!(report.restored, 1);
        let ids: Vec<_> = store.all().iter().map(Property::id).collect();
        assert_eq!(ids, vec![held.id(), extra.id()]);
    }

    #[test]
    fn failed_reset_keeps_collection() {
        let mut memory = MemoryStorage::new();
        let snapshots = SnapshotRepository::default();
        let mut store = PropertyStore::new();
        store.add(sample(), &mut memory, &snapshots).unwrap();

        let mut read_only = ReadOnlyStorage;
        assert!(store.reset(&mut read_only, &snapshots).is_err());
        assert_eq!(store.len(), 1);
    }
}
