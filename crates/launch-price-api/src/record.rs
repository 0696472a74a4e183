//! Launch record: the validated form of a prediction request.
//!
//! Validation here is structural only (presence, JSON types, year bounds).
//! `Year` is coerced leniently from integral floats and decimal strings.
//! Whether a categorical label is known is decided by the codec.

use serde_json::Value as JsonValue;

use crate::codec::CategoricalField;
use crate::error::{FieldViolation, SchemaError};
use crate::normalize::NumericField;

/// Accepted year range, inclusive. A usability guard; the scaler itself is unbounded.
pub const YEAR_MIN: i64 = 1950;
pub const YEAR_MAX: i64 = 2100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRecord {
    pub year: i64,
    pub organisation: String,
    pub rocket_status: String,
    pub mission_status: String,
    pub country: String,
}

impl LaunchRecord {
    pub fn label(&self, field: CategoricalField) -> &str {
        match field {
            CategoricalField::Organisation => &self.organisation,
            CategoricalField::RocketStatus => &self.rocket_status,
            CategoricalField::MissionStatus => &self.mission_status,
            CategoricalField::Country => &self.country,
        }
    }

    /// Validate a request body, reporting every offending field at once.
    pub fn from_json(body: &JsonValue) -> Result<Self, SchemaError> {
        let Some(obj) = body.as_object() else {
            return Err(SchemaError {
                violations: vec![FieldViolation::new("body", "expected a JSON object")],
            });
        };

        let mut violations = Vec::new();

        let year_key = NumericField::Year.request_key();
        let year = match obj.get(year_key) {
            None | Some(JsonValue::Null) => {
                violations.push(FieldViolation::new(year_key, "field required"));
                None
            }
            Some(v) => match year_value(v) {
                Some(y) if (YEAR_MIN..=YEAR_MAX).contains(&y) => Some(y),
                Some(y) => {
                    violations.push(FieldViolation::new(
                        year_key,
                        format!("{y} is outside {YEAR_MIN}..={YEAR_MAX}"),
                    ));
                    None
                }
                None => {
                    violations.push(FieldViolation::new(year_key, "must be an integer"));
                    None
                }
            },
        };

        let mut labels: [Option<String>; 4] = Default::default();
        for (slot, field) in labels.iter_mut().zip(CategoricalField::ALL) {
            let key = field.request_key();
            match obj.get(key) {
                Some(JsonValue::String(s)) => *slot = Some(s.clone()),
                None | Some(JsonValue::Null) => {
                    violations.push(FieldViolation::new(key, "field required"))
                }
                Some(_) => violations.push(FieldViolation::new(key, "must be a string")),
            }
        }

        match (year, labels) {
            (Some(year), [Some(organisation), Some(rocket_status), Some(mission_status), Some(country)])
                if violations.is_empty() =>
            {
                Ok(Self {
                    year,
                    organisation,
                    rocket_status,
                    mission_status,
                    country,
                })
            }
            _ => Err(SchemaError { violations }),
        }
    }
}

/// Integral value of `Year`. Besides JSON integers this takes floats with no
/// fractional part and decimal strings, so `2020.0` and `"2020"` both mean 2020.
fn year_value(v: &JsonValue) -> Option<i64> {
    match v {
        JsonValue::Number(n) => n.as_i64().or_else(|| {
            let f = n.as_f64()?;
            // `as` saturates, so huge integral floats fail the range check instead.
            (f.is_finite() && f.fract() == 0.0).then_some(f as i64)
        }),
        JsonValue::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(year: JsonValue) -> JsonValue {
        json!({
            "Year": year,
            "Organisation": "SpaceX",
            "Rocket_Status": "StatusActive",
            "Mission_Status": "Success",
            "Country": "USA"
        })
    }

    fn fields(err: &SchemaError) -> Vec<&str> {
        err.violations.iter().map(|v| v.field.as_str()).collect()
    }

    #[test]
    fn accepts_well_formed_record() {
        let rec = LaunchRecord::from_json(&body(json!(2020))).expect("valid");
        assert_eq!(rec.year, 2020);
        assert_eq!(rec.label(CategoricalField::Organisation), "SpaceX");
        assert_eq!(rec.label(CategoricalField::Country), "USA");
    }

    #[test]
    fn year_bounds_are_inclusive() {
        assert!(LaunchRecord::from_json(&body(json!(1950))).is_ok());
        assert!(LaunchRecord::from_json(&body(json!(2100))).is_ok());
        for y in [1949, 2101, 1800] {
            let err = LaunchRecord::from_json(&body(json!(y))).unwrap_err();
            assert_eq!(fields(&err), ["Year"], "year {y}");
        }
    }

    #[test]
    fn year_must_be_an_integer() {
        for v in [
            json!(2020.5),
            json!("2020.5"),
            json!("twenty"),
            json!(""),
            json!(true),
            json!([2020]),
        ] {
            let err = LaunchRecord::from_json(&body(v.clone())).unwrap_err();
            assert_eq!(err.violations[0].message, "must be an integer", "value {v}");
        }
    }

    #[test]
    fn year_accepts_integral_floats_and_numeric_strings() {
        for v in [json!(2020.0), json!("2020"), json!(" 2020 ")] {
            let rec = LaunchRecord::from_json(&body(v.clone())).expect("coerced year");
            assert_eq!(rec.year, 2020, "value {v}");
        }
    }

    #[test]
    fn coerced_years_are_still_range_checked() {
        for v in [json!("1949"), json!(2101.0), json!(1e300)] {
            let err = LaunchRecord::from_json(&body(v.clone())).unwrap_err();
            assert_eq!(fields(&err), ["Year"], "value {v}");
            assert!(err.violations[0].message.contains("outside"), "value {v}");
        }
    }

    #[test]
    fn reports_all_offending_fields_in_request_order() {
        let err = LaunchRecord::from_json(&json!({
            "Year": 3000,
            "Organisation": 7,
            "Mission_Status": "Success"
        }))
        .unwrap_err();
        assert_eq!(
            fields(&err),
            ["Year", "Organisation", "Rocket_Status", "Country"]
        );
        assert_eq!(err.violations[1].message, "must be a string");
        assert_eq!(err.violations[2].message, "field required");
    }

    #[test]
    fn non_object_body_is_rejected() {
        let err = LaunchRecord::from_json(&json!([1, 2, 3])).unwrap_err();
        assert_eq!(fields(&err), ["body"]);
    }

    #[test]
    fn unknown_labels_pass_schema_validation() {
        let mut b = body(json!(2020));
        b["Organisation"] = json!("Tesla");
        let rec = LaunchRecord::from_json(&b).expect("schema only checks types");
        assert_eq!(rec.organisation, "Tesla");
    }

    #[test]
    fn extra_keys_are_ignored() {
        let mut b = body(json!(2020));
        b["Payload"] = json!("Starlink");
        assert!(LaunchRecord::from_json(&b).is_ok());
    }
}
