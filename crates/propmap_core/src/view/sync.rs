//! Marker and list projections of property records.

use super::collaborators::{ListView, MapWidget, PanOptions};
use crate::model::property::{Property, PropertyId, PropertyKind};

const POPUP_MAX_WIDTH: u32 = 250;
const POPUP_MIN_WIDTH: u32 = 100;
const SIZE_UNIT: &str = "meter sq";
const COST_UNIT: &str = "Rupees";
const RATE_UNIT: &str = "Rs/m-sq";

/// Popup attached to a map marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerPopup {
    pub content: String,
    /// Styling hook, e.g. `commercial-popup`; `None` for plain popups.
    pub class_name: Option<String>,
    pub max_width: u32,
    pub min_width: u32,
    pub auto_close: bool,
    pub close_on_click: bool,
}

impl MarkerPopup {
    /// Default-styled popup with the given text.
    pub fn plain(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            class_name: None,
            max_width: POPUP_MAX_WIDTH,
            min_width: POPUP_MIN_WIDTH,
            auto_close: true,
            close_on_click: true,
        }
    }
}

/// One icon/value/unit row of a list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListDetail {
    pub icon: &'static str,
    pub value: String,
    pub unit: &'static str,
}

/// Summary block rendered in the list for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub id: PropertyId,
    pub kind: PropertyKind,
    pub title: String,
    pub details: Vec<ListDetail>,
}

pub fn marker_popup(property: &Property) -> MarkerPopup {
    let kind = property.kind();
    MarkerPopup {
        content: format!("{} {}", kind.glyph(), property.description()),
        class_name: Some(format!("{}-popup", kind.as_str())),
        max_width: POPUP_MAX_WIDTH,
        min_width: POPUP_MIN_WIDTH,
        auto_close: false,
        close_on_click: false,
    }
}

pub fn list_entry(property: &Property) -> ListEntry {
    let kind = property.kind();
    let details = property.details();

    ListEntry {
        id: property.id(),
        kind,
        title: property.description().to_string(),
        details: vec![
            ListDetail {
                icon: kind.glyph(),
                value: property.size().to_string(),
                unit: SIZE_UNIT,
            },
            ListDetail {
                icon: "💰",
                value: property.cost().to_string(),
                unit: COST_UNIT,
            },
            ListDetail {
                icon: "🤑",
                value: format!("{:.1}", details.metric()),
                unit: kind.metric_unit(),
            },
            ListDetail {
                icon: "💲",
                value: details.rate().to_string(),
                unit: RATE_UNIT,
            },
        ],
    }
}

/// Places a marker for `property` and returns the widget's handle.
pub fn render_marker<M: MapWidget + ?Sized>(map: &mut M, property: &Property) -> M::Marker {
    map.add_marker(property.coords(), &marker_popup(property))
}

pub fn render_list_entry<L: ListView + ?Sized>(list: &mut L, property: &Property) {
    list.append_entry(&list_entry(property));
}

/// Recenters the map on `property` with an animated pan.
pub fn focus<M: MapWidget + ?Sized>(map: &mut M, property: &Property, zoom: u8) {
    map.set_view(property.coords(), zoom, &PanOptions::default());
}

#[cfg(test)]
mod tests {
    use super::{list_entry, marker_popup};
    use crate::model::property::{Coordinates, Property};
    use chrono::{Local, TimeZone};

    #[test]
    fn marker_popup_is_sticky_and_kind_styled() {
        let created_at = Local.with_ymd_and_hms(2024, 11, 2, 9, 0, 0).unwrap();
        let property =
            Property::residential_at(Coordinates::new(1.0, 2.0), 10.0, 5.0, 2.0, created_at);

        let popup = marker_popup(&property);
        assert_eq!(
            popup.content,
            "🏘️ Residential Property Purchased on November 2"
        );
        assert_eq!(popup.class_name.as_deref(), Some("residential-popup"));
        assert!(!popup.auto_close);
        assert!(!popup.close_on_click);
    }

    #[test]
    fn list_entry_formats_metric_with_one_decimal() {
        let property = Property::commercial(Coordinates::new(1.0, 2.0), 100.0, 500.0, 8.0);

        let entry = list_entry(&property);
        let values: Vec<&str> = entry.details.iter().map(|d| d.value.as_str()).collect();
        assert_eq!(values, vec!["100", "500", "300.0", "8"]);
        assert_eq!(entry.details[2].unit, "Rupees");
        assert_eq!(entry.id, property.id());
    }
}
