#![allow(dead_code)]

use propmap_core::{
    Coordinates, GeolocationError, GeolocationSource, ListEntry, ListView, MapError, MapWidget,
    MarkerPopup, PanOptions, PropertyForm,
};

/// Map widget double recording every call.
#[derive(Debug, Default)]
pub struct RecordingMap {
    pub fail_init: bool,
    pub initialized: Option<(Coordinates, u8)>,
    pub markers: Vec<(Coordinates, MarkerPopup)>,
    pub views: Vec<(Coordinates, u8, PanOptions)>,
    pub clears: usize,
}

impl MapWidget for RecordingMap {
    type Marker = usize;

    fn initialize(&mut self, center: Coordinates, zoom: u8) -> Result<(), MapError> {
        if self.fail_init {
            return Err(MapError("tile layer failed".to_string()));
        }
        self.initialized = Some((center, zoom));
        Ok(())
    }

    fn add_marker(&mut self, coords: Coordinates, popup: &MarkerPopup) -> usize {
        self.markers.push((coords, popup.clone()));
        self.markers.len() - 1
    }

    fn set_view(&mut self, coords: Coordinates, zoom: u8, options: &PanOptions) {
        self.views.push((coords, zoom, *options));
    }

    fn clear_markers(&mut self) {
        self.markers.clear();
        self.clears += 1;
    }
}

/// List view double recording appended entries.
#[derive(Debug, Default)]
pub struct RecordingList {
    pub entries: Vec<ListEntry>,
    pub clears: usize,
}

impl ListView for RecordingList {
    fn append_entry(&mut self, entry: &ListEntry) {
        self.entries.push(entry.clone());
    }

    fn clear_entries(&mut self) {
        self.entries.clear();
        self.clears += 1;
    }
}

/// Geolocation double answering once with a fixed result.
pub struct FixedPosition {
    pub result: Result<Coordinates, GeolocationError>,
    pub calls: usize,
}

impl FixedPosition {
    pub fn at(lat: f64, lng: f64) -> Self {
        Self {
            result: Ok(Coordinates::new(lat, lng)),
            calls: 0,
        }
    }

    pub fn denied() -> Self {
        Self {
            result: Err(GeolocationError("permission denied".to_string())),
            calls: 0,
        }
    }
}

impl GeolocationSource for FixedPosition {
    fn current_position(&mut self) -> Result<Coordinates, GeolocationError> {
        self.calls += 1;
        self.result.clone()
    }
}

pub fn commercial_form(size: &str, cost: &str, input_rate: &str) -> PropertyForm {
    PropertyForm {
        kind: "commercial".to_string(),
        size: size.to_string(),
        cost: cost.to_string(),
        input_rate: input_rate.to_string(),
        elevation_gain: String::new(),
    }
}

pub fn residential_form(size: &str, cost: &str, elevation_gain: &str) -> PropertyForm {
    PropertyForm {
        kind: "residential".to_string(),
        size: size.to_string(),
        cost: cost.to_string(),
        input_rate: String::new(),
        elevation_gain: elevation_gain.to_string(),
    }
}
