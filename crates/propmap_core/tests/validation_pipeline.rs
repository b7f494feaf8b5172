mod common;

use common::{commercial_form, residential_form};
use propmap_core::{validate, Coordinates, NumericField, PropertyForm, ValidationError, VariantRate};

fn click() -> Option<Coordinates> {
    Some(Coordinates::new(12.9, 77.6))
}

#[test]
fn accepts_positive_commercial_input() {
    let draft = validate(&commercial_form("100", " 500 ", "8"), click()).unwrap();

    assert_eq!(draft.coords, Coordinates::new(12.9, 77.6));
    assert_eq!(draft.size, 100.0);
    assert_eq!(draft.cost, 500.0);
    assert_eq!(draft.rate, VariantRate::Commercial { input_rate: 8.0 });
}

#[test]
fn residential_ignores_unused_commercial_rate() {
    let mut form = residential_form("10", "5", "2.5");
    form.input_rate = "garbage".to_string();

    let draft = validate(&form, click()).unwrap();
    assert_eq!(
        draft.rate,
        VariantRate::Residential {
            elevation_gain: 2.5
        }
    );
}

#[test]
fn rejects_non_positive_or_non_finite_fields() {
    let cases = [
        (commercial_form("-5", "500", "8"), NumericField::Size),
        (commercial_form("0", "500", "8"), NumericField::Size),
        (commercial_form("100", "NaN", "8"), NumericField::Cost),
        (commercial_form("100", "500", "inf"), NumericField::InputRate),
        (commercial_form("100", "500", ""), NumericField::InputRate),
        (residential_form("10", "5", "-1"), NumericField::ElevationGain),
        (residential_form("abc", "5", "1"), NumericField::Size),
    ];

    for (form, field) in cases {
        let err = validate(&form, click()).unwrap_err();
        assert_eq!(err, ValidationError::NonPositiveInput { field }, "form: {form:?}");
        assert!(err.to_string().starts_with("Inputs have to be positive numbers!"));
    }
}

#[test]
fn rejects_missing_click() {
    let err = validate(&commercial_form("100", "500", "8"), None).unwrap_err();
    assert_eq!(err, ValidationError::MissingCoordinates);
}

#[test]
fn rejects_out_of_range_click() {
    let err = validate(
        &commercial_form("100", "500", "8"),
        Some(Coordinates::new(120.0, 0.0)),
    )
    .unwrap_err();
    assert!(matches!(err, ValidationError::InvalidCoordinates { .. }));
}

#[test]
fn rejects_unknown_kind() {
    let form = PropertyForm {
        kind: " industrial ".to_string(),
        ..commercial_form("100", "500", "8")
    };

    let err = validate(&form, click()).unwrap_err();
    assert_eq!(err, ValidationError::UnknownKind("industrial".to_string()));
}
