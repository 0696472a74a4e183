//! Category codec: maps raw categorical labels to their training-time codes.
//!
//! This is the only place an unknown label is rejected. Anything layered on top
//! (e.g. the `/vocabulary` listing) reads from here rather than keeping its own
//! copy of the label sets.

pub mod load;
pub mod types;

pub use load::*;
pub use types::*;

use crate::error::PipelineError;

/// One vocabulary per categorical field, fixed once built.
#[derive(Debug, Clone)]
pub struct CategoryCodec {
    organisation: Vocabulary,
    rocket_status: Vocabulary,
    mission_status: Vocabulary,
    country: Vocabulary,
}

impl CategoryCodec {
    pub fn new(
        organisation: Vocabulary,
        rocket_status: Vocabulary,
        mission_status: Vocabulary,
        country: Vocabulary,
    ) -> Self {
        Self {
            organisation,
            rocket_status,
            mission_status,
            country,
        }
    }

    pub fn vocabulary(&self, field: CategoricalField) -> &Vocabulary {
        match field {
            CategoricalField::Organisation => &self.organisation,
            CategoricalField::RocketStatus => &self.rocket_status,
            CategoricalField::MissionStatus => &self.mission_status,
            CategoricalField::Country => &self.country,
        }
    }

    /// Encode `label` for `field`, or fail with `UnknownCategory`.
    pub fn encode(&self, field: CategoricalField, label: &str) -> Result<u32, PipelineError> {
        self.vocabulary(field)
            .code(label)
            .ok_or_else(|| PipelineError::UnknownCategory {
                field,
                value: label.to_string(),
            })
    }
}
