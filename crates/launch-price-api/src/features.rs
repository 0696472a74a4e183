//! Feature assembler: packs encoded categories and the scaled year into the
//! fixed layout the predictor was fit with.
//!
//! The layout is `FEATURE_ORDER`. Changing it is a model-version change: the
//! artifact manifest must declare the same order or loading fails.

use std::fmt;

use crate::codec::CategoricalField;

pub const FEATURE_COUNT: usize = 5;

/// Column names in the order the predictor consumes them.
pub const FEATURE_ORDER: [&str; FEATURE_COUNT] = [
    "Year_scaled",
    "Organisation_encoded",
    "Rocket_Status_encoded",
    "Mission_Status_encoded",
    "Country_encoded",
];

/// The four categorical codes for one record, addressed by field rather than position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodedCategories {
    pub organisation: u32,
    pub rocket_status: u32,
    pub mission_status: u32,
    pub country: u32,
}

impl EncodedCategories {
    pub fn set(&mut self, field: CategoricalField, code: u32) {
        match field {
            CategoricalField::Organisation => self.organisation = code,
            CategoricalField::RocketStatus => self.rocket_status = code,
            CategoricalField::MissionStatus => self.mission_status = code,
            CategoricalField::Country => self.country = code,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Value of a named column, if the name is part of `FEATURE_ORDER`.
    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURE_ORDER
            .iter()
            .position(|n| *n == name)
            .map(|idx| self.0[idx])
    }
}

impl fmt::Display for FeatureVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = FEATURE_ORDER
            .iter()
            .zip(self.0.iter())
            .map(|(name, v)| format!("{name}={v}"))
            .collect();
        write!(f, "[{}]", parts.join(", "))
    }
}

/// Pack inputs into `FEATURE_ORDER`. Performs no validation.
pub fn assemble(encoded: &EncodedCategories, year_scaled: f64) -> FeatureVector {
    FeatureVector([
        year_scaled,
        f64::from(encoded.organisation),
        f64::from(encoded.rocket_status),
        f64::from(encoded.mission_status),
        f64::from(encoded.country),
    ])
}
