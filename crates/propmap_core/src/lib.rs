//! Core domain logic for PropMap.
//! This crate is the single source of truth for property record invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;
pub mod validation;
pub mod view;

pub use config::{ConfigError, SessionConfig};
pub use logging::{default_log_level, init_logging, init_logging_for, logging_status};
pub use model::property::{
    describe, Coordinates, Property, PropertyDetails, PropertyId, PropertyKind, StoredProperty,
};
pub use repo::snapshot_repo::{SnapshotError, SnapshotRepository, DEFAULT_SNAPSHOT_KEY};
pub use repo::sqlite_storage::SqliteStorage;
pub use repo::storage::{KeyValueStorage, MemoryStorage, StorageError, StorageResult};
pub use service::session::{
    GeolocationError, GeolocationSource, Ignored, MapState, Outcome, Session, SessionError,
    SessionResult,
};
pub use store::{HydrationReport, PropertyStore, StoreError, StoreResult};
pub use validation::{
    validate, NumericField, PropertyDraft, PropertyForm, ValidationError, VariantRate,
};
pub use view::{ListDetail, ListEntry, ListView, MapError, MapWidget, MarkerPopup, PanOptions};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
