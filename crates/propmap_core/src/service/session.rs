//! Session composition root.
//!
//! # Responsibility
//! - Wire the store, snapshot repository and view projections to injected
//!   storage, map and list collaborators.
//! - Gate every map-dependent operation on successful geolocation.
//! - Keep markers and list entries in step with the collection.
//!
//! # Invariants
//! - Operations issued before the map is ready are ignored, never queued.
//! - Each record gets at most one marker and one list entry per view
//!   lifetime; hydration re-runs never duplicate earlier renders.
//! - Only the first geolocation outcome is honored.

use crate::config::{ConfigError, SessionConfig};
use crate::model::property::{Coordinates, Property, PropertyId};
use crate::repo::snapshot_repo::SnapshotRepository;
use crate::repo::storage::{KeyValueStorage, StorageError};
use crate::store::{HydrationReport, PropertyStore, StoreError};
use crate::validation::{validate, PropertyForm, ValidationError};
use crate::view::{focus, render_list_entry, render_marker, ListView, MapWidget, MarkerPopup};
use log::{debug, error, info, warn};
use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

const OWN_LOCATION_LABEL: &str = "Your Location";

pub type SessionResult<T> = Result<T, SessionError>;

/// Geolocation request failed; carries the source's reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeolocationError(pub String);

impl Display for GeolocationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Error for GeolocationError {}

/// One-shot position provider.
///
/// Hosts with an asynchronous source call `Session::resolve_position`
/// themselves once the request settles.
pub trait GeolocationSource {
    fn current_position(&mut self) -> Result<Coordinates, GeolocationError>;
}

#[derive(Debug)]
pub enum SessionError {
    Config(ConfigError),
    Validation(ValidationError),
    Storage(StorageError),
    DuplicateProperty(PropertyId),
    GeolocationUnavailable(String),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::DuplicateProperty(id) => write!(f, "property {id} already exists"),
            Self::GeolocationUnavailable(reason) => {
                write!(f, "Could not get your position: {reason}")
            }
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::DuplicateProperty(_) | Self::GeolocationUnavailable(_) => None,
        }
    }
}

impl From<ConfigError> for SessionError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<StoreError> for SessionError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::DuplicateId(id) => Self::DuplicateProperty(id),
            StoreError::Storage(err) => Self::Storage(err),
        }
    }
}

impl From<ValidationError> for SessionError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StorageError> for SessionError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Why an operation was dropped without effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ignored {
    MapNotReady,
    AlreadyResolved,
    UnknownProperty(PropertyId),
}

/// Result of an event handler that may be ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome<T> {
    Applied(T),
    Ignored(Ignored),
}

impl<T> Outcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    pub fn applied(self) -> Option<T> {
        match self {
            Self::Applied(value) => Some(value),
            Self::Ignored(_) => None,
        }
    }
}

/// Map lifecycle driven by the geolocation outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum MapState {
    Pending,
    Ready { center: Coordinates },
    Unavailable { reason: String },
}

/// One user session over a property collection.
pub struct Session<S, M, L>
where
    S: KeyValueStorage,
    M: MapWidget,
    L: ListView,
{
    config: SessionConfig,
    snapshots: SnapshotRepository,
    store: PropertyStore,
    storage: S,
    map: M,
    list: L,
    map_state: MapState,
    pending_click: Option<Coordinates>,
    location_marker: Option<M::Marker>,
    markers: HashMap<PropertyId, M::Marker>,
    listed: HashSet<PropertyId>,
}

impl<S, M, L> Session<S, M, L>
where
    S: KeyValueStorage,
    M: MapWidget,
    L: ListView,
{
    /// Restores the snapshot and renders list entries.
    ///
    /// Markers are deferred until the map is ready. A corrupt or unreadable
    /// snapshot starts an empty session.
    ///
    /// # Errors
    /// - `Config` when `config` fails `SessionConfig::validate`.
    pub fn start(storage: S, map: M, list: L, config: SessionConfig) -> SessionResult<Self> {
        let config = config.validate()?;
        Ok(Self::assemble(storage, map, list, config))
    }

    /// Restores using `SessionConfig::default()`.
    pub fn with_defaults(storage: S, map: M, list: L) -> Self {
        Self::assemble(storage, map, list, SessionConfig::default())
    }

    fn assemble(storage: S, map: M, list: L, config: SessionConfig) -> Self {
        let snapshots = SnapshotRepository::new(config.snapshot_key.clone());
        let mut session = Self {
            config,
            snapshots,
            store: PropertyStore::new(),
            storage,
            map,
            list,
            map_state: MapState::Pending,
            pending_click: None,
            location_marker: None,
            markers: HashMap::new(),
            listed: HashSet::new(),
        };

        let stored = session.snapshots.load(&session.storage);
        let report = session.store.hydrate(&stored);
        session.render_views();
        info!(
            "event=session_start module=service status=ok restored={}",
            report.restored
        );
        session
    }

    /// Requests a position from `source` and feeds it to `resolve_position`.
    pub fn locate<G: GeolocationSource + ?Sized>(
        &mut self,
        source: &mut G,
    ) -> SessionResult<Outcome<()>> {
        if self.map_state != MapState::Pending {
            return Ok(self.ignore("locate", Ignored::AlreadyResolved));
        }
        let position = source.current_position();
        self.resolve_position(position)
    }

    /// Applies the geolocation outcome.
    ///
    /// On success initializes the map, places the own-location marker and
    /// renders deferred markers for every record.
    ///
    /// # Errors
    /// - `GeolocationUnavailable` when the position or map init failed; map
    ///   features stay disabled for the session.
    pub fn resolve_position(
        &mut self,
        position: Result<Coordinates, GeolocationError>,
    ) -> SessionResult<Outcome<()>> {
        if self.map_state != MapState::Pending {
            return Ok(self.ignore("resolve_position", Ignored::AlreadyResolved));
        }

        let center = match position {
            Ok(center) => center,
            Err(err) => return Err(self.disable_map(err.0)),
        };
        if let Err(err) = self.map.initialize(center, self.config.map_zoom_level) {
            return Err(self.disable_map(err.0));
        }

        self.map_state = MapState::Ready { center };
        self.render_views();
        info!(
            "event=map_ready module=service status=ok markers={}",
            self.markers.len()
        );
        Ok(Outcome::Applied(()))
    }

    /// Remembers the clicked location for the next submit.
    pub fn on_map_click(&mut self, coords: Coordinates) -> Outcome<()> {
        if !self.is_map_ready() {
            return self.ignore("map_click", Ignored::MapNotReady);
        }
        self.pending_click = Some(coords);
        Outcome::Applied(())
    }

    /// Validates `form`, creates the record, persists it and renders it.
    ///
    /// # Errors
    /// - `Validation` when any input is rejected; nothing is created.
    /// - `Storage` when the snapshot write fails; nothing is created.
    pub fn submit(&mut self, form: &PropertyForm) -> SessionResult<Outcome<PropertyId>> {
        if !self.is_map_ready() {
            return Ok(self.ignore("submit", Ignored::MapNotReady));
        }

        let draft = validate(form, self.pending_click).map_err(|err| {
            debug!("event=property_submit module=service status=rejected error={err}");
            err
        })?;
        let property = Property::from_draft(&draft);
        let id = property.id();

        self.store
            .add(property, &mut self.storage, &self.snapshots)?;
        self.pending_click = None;
        self.render_views();
        Ok(Outcome::Applied(id))
    }

    /// Pans the map to the record behind a clicked list entry.
    pub fn on_list_click(&mut self, id: PropertyId) -> Outcome<()> {
        if !self.is_map_ready() {
            return self.ignore("list_click", Ignored::MapNotReady);
        }
        let Some(property) = self.store.find_by_id(id) else {
            return self.ignore("list_click", Ignored::UnknownProperty(id));
        };
        focus(&mut self.map, property, self.config.map_zoom_level);
        Outcome::Applied(())
    }

    /// Drops every record and rebuilds views as for a fresh session.
    ///
    /// # Errors
    /// - `Storage` when the snapshot cannot be removed; views and collection
    ///   are left as they were.
    pub fn reset(&mut self) -> SessionResult<()> {
        self.store.reset(&mut self.storage, &self.snapshots)?;

        self.pending_click = None;
        self.list.clear_entries();
        self.listed.clear();
        if self.is_map_ready() {
            self.map.clear_markers();
        }
        self.location_marker = None;
        self.markers.clear();
        self.render_views();
        info!("event=session_reset module=service status=ok");
        Ok(())
    }

    /// Re-runs hydration from storage, rendering only what is missing.
    ///
    /// Records already held stay in place even when the snapshot no longer
    /// carries them.
    pub fn reload(&mut self) -> HydrationReport {
        let stored = self.snapshots.load(&self.storage);
        let report = self.store.hydrate(&stored);
        self.render_views();
        report
    }

    pub fn properties(&self) -> &[Property] {
        self.store.all()
    }

    pub fn find(&self, id: PropertyId) -> Option<&Property> {
        self.store.find_by_id(id)
    }

    pub fn is_map_ready(&self) -> bool {
        matches!(self.map_state, MapState::Ready { .. })
    }

    pub fn map_state(&self) -> &MapState {
        &self.map_state
    }

    pub fn pending_click(&self) -> Option<Coordinates> {
        self.pending_click
    }

    pub fn marker(&self, id: PropertyId) -> Option<&M::Marker> {
        self.markers.get(&id)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn list(&self) -> &L {
        &self.list
    }

    /// Renders whatever the views are missing.
    fn render_views(&mut self) {
        for property in self.store.all() {
            if self.listed.insert(property.id()) {
                render_list_entry(&mut self.list, property);
            }
        }

        let MapState::Ready { center } = self.map_state else {
            return;
        };
        if self.location_marker.is_none() {
            let handle = self
                .map
                .add_marker(center, &MarkerPopup::plain(OWN_LOCATION_LABEL));
            self.location_marker = Some(handle);
        }
        for property in self.store.all() {
            if !self.markers.contains_key(&property.id()) {
                let handle = render_marker(&mut self.map, property);
                self.markers.insert(property.id(), handle);
            }
        }
    }

    fn disable_map(&mut self, reason: String) -> SessionError {
        error!("event=map_ready module=service status=error error_code=geolocation_unavailable");
        self.map_state = MapState::Unavailable {
            reason: reason.clone(),
        };
        SessionError::GeolocationUnavailable(reason)
    }

    fn ignore<T>(&self, operation: &'static str, reason: Ignored) -> Outcome<T> {
        match reason {
            Ignored::UnknownProperty(id) => {
                warn!("event={operation} module=service status=ignored reason=unknown_property id={id}")
            }
            Ignored::MapNotReady => {
                debug!("event={operation} module=service status=ignored reason=map_not_ready")
            }
            Ignored::AlreadyResolved => {
                debug!("event={operation} module=service status=ignored reason=already_resolved")
            }
        }
        Outcome::Ignored(reason)
    }
}
