//! Contracts for the map widget and list presentation collaborators.

use super::sync::{ListEntry, MarkerPopup};
use crate::model::property::Coordinates;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Map widget failed to come up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapError(pub String);

impl Display for MapError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "map unavailable: {}", self.0)
    }
}

impl Error for MapError {}

/// Animation options for `MapWidget::set_view`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanOptions {
    pub animate: bool,
    /// Pan animation length in seconds.
    pub pan_duration: f64,
}

impl Default for PanOptions {
    fn default() -> Self {
        Self {
            animate: true,
            pan_duration: 1.0,
        }
    }
}

/// Interactive map the core places markers on.
///
/// Click events are forwarded by the host to `Session::on_map_click`.
pub trait MapWidget {
    /// Opaque handle of a placed marker.
    type Marker;

    fn initialize(&mut self, center: Coordinates, zoom: u8) -> Result<(), MapError>;
    fn add_marker(&mut self, coords: Coordinates, popup: &MarkerPopup) -> Self::Marker;
    fn set_view(&mut self, coords: Coordinates, zoom: u8, options: &PanOptions);
    fn clear_markers(&mut self);
}

/// Sidebar list of record summaries.
pub trait ListView {
    fn append_entry(&mut self, entry: &ListEntry);
    fn clear_entries(&mut self);
}
