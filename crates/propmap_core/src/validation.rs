//! Form input validation pipeline.
//!
//! # Responsibility
//! - Turn raw form values plus the pending map click into a typed draft.
//! - Produce user-displayable reasons for rejected input.
//!
//! # Invariants
//! - Validation is all-or-nothing: no draft exists unless every field passed.
//! - Only the rate field of the selected kind is inspected.

use crate::model::property::{Coordinates, PropertyKind};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Numeric form field names, as reported in validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericField {
    Size,
    Cost,
    InputRate,
    ElevationGain,
}

impl NumericField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Size => "size",
            Self::Cost => "cost",
            Self::InputRate => "input_rate",
            Self::ElevationGain => "elevation_gain",
        }
    }
}

/// Validation failure; `Display` output is meant for the user.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Submitted before any map click.
    MissingCoordinates,
    /// Selector value is neither `commercial` nor `residential`.
    UnknownKind(String),
    /// Field is missing, unparseable, non-finite, zero or negative.
    NonPositiveInput { field: NumericField },
    /// Click position outside WGS84 bounds.
    InvalidCoordinates { lat: f64, lng: f64 },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingCoordinates => write!(f, "Click on the map to pick a location first!"),
            Self::UnknownKind(value) => write!(f, "Unknown property type `{value}`"),
            Self::NonPositiveInput { field } => write!(
                f,
                "Inputs have to be positive numbers! ({})",
                field.as_str()
            ),
            Self::InvalidCoordinates { lat, lng } => {
                write!(f, "Location ({lat}, {lng}) is outside the map")
            }
        }
    }
}

impl Error for ValidationError {}

/// Raw values as entered in the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyForm {
    pub kind: String,
    pub size: String,
    pub cost: String,
    pub input_rate: String,
    pub elevation_gain: String,
}

/// Variant-specific rate after validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VariantRate {
    Commercial { input_rate: f64 },
    Residential { elevation_gain: f64 },
}

/// Fully validated input, ready for record construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropertyDraft {
    pub coords: Coordinates,
    pub size: f64,
    pub cost: f64,
    pub rate: VariantRate,
}

/// Validates `form` against the pending map `click`.
///
/// # Errors
/// - `UnknownKind` when the selector is not a known variant.
/// - `MissingCoordinates` / `InvalidCoordinates` for a bad or absent click.
/// - `NonPositiveInput` for the first failing numeric field, in form order.
pub fn validate(
    form: &PropertyForm,
    click: Option<Coordinates>,
) -> Result<PropertyDraft, ValidationError> {
    let kind = PropertyKind::parse(&form.kind)
        .ok_or_else(|| ValidationError::UnknownKind(form.kind.trim().to_string()))?;

    let coords = click.ok_or(ValidationError::MissingCoordinates)?;
    if !coords.is_valid() {
        return Err(ValidationError::InvalidCoordinates {
            lat: coords.lat,
            lng: coords.lng,
        });
    }

    let size = ensure_positive(NumericField::Size, parse_number(&form.size))?;
    let cost = ensure_positive(NumericField::Cost, parse_number(&form.cost))?;
    let rate = match kind {
        PropertyKind::Commercial => VariantRate::Commercial {
            input_rate: ensure_positive(NumericField::InputRate, parse_number(&form.input_rate))?,
        },
        PropertyKind::Residential => VariantRate::Residential {
            elevation_gain: ensure_positive(
                NumericField::ElevationGain,
                parse_number(&form.elevation_gain),
            )?,
        },
    };

    Ok(PropertyDraft {
        coords,
        size,
        cost,
        rate,
    })
}

/// Accepts `value` only when present, finite and strictly positive.
pub fn ensure_positive(field: NumericField, value: Option<f64>) -> Result<f64, ValidationError> {
    match value {
        Some(number) if number.is_finite() && number > 0.0 => Ok(number),
        _ => Err(ValidationError::NonPositiveInput { field }),
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::{ensure_positive, parse_number, NumericField, ValidationError};

    #[test]
    fn parse_number_trims_and_rejects_garbage() {
        assert_eq!(parse_number(" 12.5 "), Some(12.5));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("12abc"), None);
    }

    #[test]
    fn ensure_positive_rejects_zero_nan_and_infinity() {
        for value in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = ensure_positive(NumericField::Cost, Some(value)).unwrap_err();
            assert_eq!(
                err,
                ValidationError::NonPositiveInput {
                    field: NumericField::Cost
                }
            );
        }
        assert_eq!(ensure_positive(NumericField::Cost, Some(0.5)), Ok(0.5));
    }

    #[test]
    fn error_message_names_field() {
        let err = ValidationError::NonPositiveInput {
            field: NumericField::ElevationGain,
        };
        assert_eq!(
            err.to_string(),
            "Inputs have to be positive numbers! (elevation_gain)"
        );
    }
}
