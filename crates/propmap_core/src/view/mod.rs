//! View collaborators and record projections.
//!
//! # Responsibility
//! - Define the narrow map-widget and list-view contracts the core drives.
//! - Project records into marker popups and list entries.
//!
//! # Invariants
//! - Projections are pure functions of record state.
//! - Nothing in this module keeps rendering state between calls.

pub mod collaborators;
pub mod sync;

pub use collaborators::{ListView, MapError, MapWidget, PanOptions};
pub use sync::{
    focus, list_entry, marker_popup, render_list_entry, render_marker, ListDetail, ListEntry,
    MarkerPopup,
};
