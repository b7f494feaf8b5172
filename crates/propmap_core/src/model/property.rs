//! Property domain model.
//!
//! # Responsibility
//! - Define the canonical record shared by marker, list and snapshot views.
//! - Construct typed records from validated inputs and derive their
//!   description and metric.
//! - Rebuild typed records from stored plain records.
//!
//! # Invariants
//! - `id` is stable and never reused for another record.
//! - `size`, `cost` and the variant rate are finite and strictly positive.
//! - `description` and `pace`/`speed` are derived once and never mutated.
//!
//! # See also
//! - `crate::validation` for the checks every constructor path relies on.

use crate::validation::{ensure_positive, NumericField, PropertyDraft, ValidationError, VariantRate};
use chrono::{DateTime, Datelike, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Stable identifier for every property record.
pub type PropertyId = Uuid;

/// Latitude/longitude pair supplied by the map click collaborator.
///
/// Serialized as a `[lat, lng]` array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Returns whether both components are finite and inside WGS84 bounds.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

impl From<[f64; 2]> for Coordinates {
    fn from(value: [f64; 2]) -> Self {
        Self::new(value[0], value[1])
    }
}

impl From<Coordinates> for [f64; 2] {
    fn from(value: Coordinates) -> Self {
        [value.lat, value.lng]
    }
}

/// Closed set of property variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    Commercial,
    Residential,
}

impl PropertyKind {
    /// Wire/selector name (`commercial|residential`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Commercial => "commercial",
            Self::Residential => "residential",
        }
    }

    /// Capitalized name used in descriptions.
    pub fn label(self) -> &'static str {
        match self {
            Self::Commercial => "Commercial",
            Self::Residential => "Residential",
        }
    }

    /// Icon shown next to markers and list entries.
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Commercial => "🏭",
            Self::Residential => "🏘️",
        }
    }

    /// Unit label for the derived metric.
    pub fn metric_unit(self) -> &'static str {
        match self {
            Self::Commercial => "Rupees",
            Self::Residential => "km/h",
        }
    }

    /// Parses a form selector value, ignoring case and surrounding spaces.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "commercial" => Some(Self::Commercial),
            "residential" => Some(Self::Residential),
            _ => None,
        }
    }
}

/// Variant-specific inputs and their derived metric.
///
/// Flattened into the record on the wire, tagged by `type`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyDetails {
    Commercial { input_rate: f64, pace: f64 },
    Residential { elevation_gain: f64, speed: f64 },
}

impl PropertyDetails {
    /// Derives details for `rate`, computing the metric from `size`/`cost`.
    fn derive(size: f64, cost: f64, rate: VariantRate) -> Self {
        match rate {
            VariantRate::Commercial { input_rate } => Self::Commercial {
                input_rate,
                pace: size * input_rate - cost,
            },
            VariantRate::Residential { elevation_gain } => Self::Residential {
                elevation_gain,
                speed: size * elevation_gain - cost,
            },
        }
    }

    pub fn kind(&self) -> PropertyKind {
        match self {
            Self::Commercial { .. } => PropertyKind::Commercial,
            Self::Residential { .. } => PropertyKind::Residential,
        }
    }

    /// `input_rate` or `elevation_gain`.
    pub fn rate(&self) -> f64 {
        match *self {
            Self::Commercial { input_rate, .. } => input_rate,
            Self::Residential { elevation_gain, .. } => elevation_gain,
        }
    }

    /// `pace` or `speed`.
    pub fn metric(&self) -> f64 {
        match *self {
            Self::Commercial { pace, .. } => pace,
            Self::Residential { speed, .. } => speed,
        }
    }
}

/// Canonical property record.
///
/// Fields are private so derived values cannot drift from their inputs;
/// the record is read through accessors only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Property {
    id: PropertyId,
    created_at: DateTime<Local>,
    coords: Coordinates,
    size: f64,
    cost: f64,
    description: String,
    visit_count: u32,
    #[serde(flatten)]
    details: PropertyDetails,
}

impl Property {
    /// Creates a commercial record stamped with the current local time.
    ///
    /// Inputs are assumed to have passed `crate::validation::validate`.
    pub fn commercial(coords: Coordinates, size: f64, cost: f64, input_rate: f64) -> Self {
        Self::commercial_at(coords, size, cost, input_rate, Local::now())
    }

    pub fn commercial_at(
        coords: Coordinates,
        size: f64,
        cost: f64,
        input_rate: f64,
        created_at: DateTime<Local>,
    ) -> Self {
        Self::build(
            Uuid::new_v4(),
            created_at,
            coords,
            size,
            cost,
            VariantRate::Commercial { input_rate },
        )
    }

    /// Creates a residential record stamped with the current local time.
    ///
    /// Inputs are assumed to have passed `crate::validation::validate`.
    pub fn residential(coords: Coordinates, size: f64, cost: f64, elevation_gain: f64) -> Self {
        Self::residential_at(coords, size, cost, elevation_gain, Local::now())
    }

    pub fn residential_at(
        coords: Coordinates,
        size: f64,
        cost: f64,
        elevation_gain: f64,
        created_at: DateTime<Local>,
    ) -> Self {
        Self::build(
            Uuid::new_v4(),
            created_at,
            coords,
            size,
            cost,
            VariantRate::Residential { elevation_gain },
        )
    }

    /// Creates a record from a validated form draft.
    pub fn from_draft(draft: &PropertyDraft) -> Self {
        Self::build(
            Uuid::new_v4(),
            Local::now(),
            draft.coords,
            draft.size,
            draft.cost,
            draft.rate,
        )
    }

    /// Rebuilds a typed record from a stored plain record.
    ///
    /// Identity, timestamp and inputs are kept; description and metric are
    /// derived again from them, so stored derived values are never trusted.
    ///
    /// # Errors
    /// - Returns `ValidationError` when stored inputs break record invariants.
    pub fn rehydrate(stored: &StoredProperty) -> Result<Self, ValidationError> {
        if !stored.coords.is_valid() {
            return Err(ValidationError::InvalidCoordinates {
                lat: stored.coords.lat,
                lng: stored.coords.lng,
            });
        }
        let size = ensure_positive(NumericField::Size, Some(stored.size))?;
        let cost = ensure_positive(NumericField::Cost, Some(stored.cost))?;
        let rate = match stored.kind {
            PropertyKind::Commercial => VariantRate::Commercial {
                input_rate: ensure_positive(NumericField::InputRate, stored.input_rate)?,
            },
            PropertyKind::Residential => VariantRate::Residential {
                elevation_gain: ensure_positive(
                    NumericField::ElevationGain,
                    stored.elevation_gain,
                )?,
            },
        };

        let mut property =
            Self::build(stored.id, stored.created_at, stored.coords, size, cost, rate);
        property.visit_count = stored.visit_count;
        Ok(property)
    }

    fn build(
        id: PropertyId,
        created_at: DateTime<Local>,
        coords: Coordinates,
        size: f64,
        cost: f64,
        rate: VariantRate,
    ) -> Self {
        let details = PropertyDetails::derive(size, cost, rate);
        Self {
            id,
            created_at,
            coords,
            size,
            cost,
            description: describe(details.kind(), &created_at),
            visit_count: 0,
            details,
        }
    }

    pub fn id(&self) -> PropertyId {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }

    pub fn coords(&self) -> Coordinates {
        self.coords
    }

    pub fn kind(&self) -> PropertyKind {
        self.details.kind()
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Reserved for interaction tracking; no operation increments it yet.
    pub fn visit_count(&self) -> u32 {
        self.visit_count
    }

    pub fn details(&self) -> &PropertyDetails {
        &self.details
    }
}

/// Plain record as read back from a snapshot.
///
/// Carries stored fields only; derived values present in the snapshot are
/// read but ignored by `Property::rehydrate`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StoredProperty {
    pub id: PropertyId,
    pub created_at: DateTime<Local>,
    pub coords: Coordinates,
    #[serde(rename = "type")]
    pub kind: PropertyKind,
    pub size: f64,
    pub cost: f64,
    #[serde(default)]
    pub input_rate: Option<f64>,
    #[serde(default)]
    pub elevation_gain: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub visit_count: u32,
}

/// Builds `"<Kind> Property Purchased on <Month> <Day>"`.
pub fn describe(kind: PropertyKind, created_at: &DateTime<Local>) -> String {
    format!(
        "{} Property Purchased on {} {}",
        kind.label(),
        MONTH_NAMES[created_at.month0() as usize],
        created_at.day()
    )
}

#[cfg(test)]
mod tests {
    use super::{describe, Coordinates, PropertyKind};
    use chrono::{Local, TimeZone};

    #[test]
    fn describe_uses_full_month_and_unpadded_day() {
        let created_at = Local.with_ymd_and_hms(2024, 3, 7, 12, 0, 0).unwrap();
        assert_eq!(
            describe(PropertyKind::Residential, &created_at),
            "Residential Property Purchased on March 7"
        );
    }

    #[test]
    fn kind_parse_ignores_case_and_spaces() {
        assert_eq!(PropertyKind::parse(" Commercial "), Some(PropertyKind::Commercial));
        assert_eq!(PropertyKind::parse("RESIDENTIAL"), Some(PropertyKind::Residential));
        assert_eq!(PropertyKind::parse("industrial"), None);
    }

    #[test]
    fn coordinates_reject_out_of_range_values() {
        assert!(Coordinates::new(12.9, 77.6).is_valid());
        assert!(!Coordinates::new(91.0, 0.0).is_valid());
        assert!(!Coordinates::new(0.0, f64::NAN).is_valid());
    }
}
