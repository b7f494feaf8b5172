//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `propmap_core` linkage.
//! - Drive one scripted session against stdout-backed collaborators.

use propmap_core::{
    Coordinates, GeolocationError, GeolocationSource, ListEntry, ListView, MapError, MapWidget,
    MarkerPopup, MemoryStorage, PanOptions, PropertyForm, Session,
};

struct StdoutMap {
    next_marker: u32,
}

impl MapWidget for StdoutMap {
    type Marker = u32;

    fn initialize(&mut self, center: Coordinates, zoom: u8) -> Result<(), MapError> {
        println!("map init center=({}, {}) zoom={zoom}", center.lat, center.lng);
        Ok(())
    }

    fn add_marker(&mut self, coords: Coordinates, popup: &MarkerPopup) -> u32 {
        self.next_marker += 1;
        println!(
            "marker #{} at ({}, {}): {}",
            self.next_marker, coords.lat, coords.lng, popup.content
        );
        self.next_marker
    }

    fn set_view(&mut self, coords: Coordinates, zoom: u8, _options: &PanOptions) {
        println!("map view ({}, {}) zoom={zoom}", coords.lat, coords.lng);
    }

    fn clear_markers(&mut self) {
        println!("markers cleared");
    }
}

struct StdoutList;

impl ListView for StdoutList {
    fn append_entry(&mut self, entry: &ListEntry) {
        let details = entry
            .details
            .iter()
            .map(|detail| format!("{} {} {}", detail.icon, detail.value, detail.unit))
            .collect::<Vec<_>>()
            .join(" | ");
        println!("list {}: {details}", entry.title);
    }

    fn clear_entries(&mut self) {
        println!("list cleared");
    }
}

struct FixedPosition(Coordinates);

impl GeolocationSource for FixedPosition {
    fn current_position(&mut self) -> Result<Coordinates, GeolocationError> {
        Ok(self.0)
    }
}

fn main() {
    println!("propmap_core ping={}", propmap_core::ping());
    println!("propmap_core version={}", propmap_core::core_version());

    let mut session = Session::with_defaults(
        MemoryStorage::new(),
        StdoutMap { next_marker: 0 },
        StdoutList,
    );
    if let Err(err) = session.locate(&mut FixedPosition(Coordinates::new(12.97, 77.59))) {
        eprintln!("{err}");
        return;
    }

    session.on_map_click(Coordinates::new(12.9, 77.6));
    let form = PropertyForm {
        kind: "commercial".to_string(),
        size: "100".to_string(),
        cost: "500".to_string(),
        input_rate: "8".to_string(),
        elevation_gain: String::new(),
    };
    match session.submit(&form) {
        Ok(outcome) => {
            if let Some(id) = outcome.applied() {
                session.on_list_click(id);
            }
        }
        Err(err) => eprintln!("{err}"),
    }
    println!("records={}", session.properties().len());
}
