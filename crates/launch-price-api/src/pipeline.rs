//! Request-scoped inference chain: codec → normalizer → assembler → scorer.
//!
//! The pipeline owns only immutable state, so one instance is shared by every
//! request without locking.

use std::sync::Arc;

use crate::artifacts::ArtifactBundle;
use crate::codec::{CategoricalField, CategoryCodec};
use crate::error::{PipelineError, PredictorError};
use crate::features::{EncodedCategories, FeatureVector, assemble};
use crate::normalize::{Normalizer, NumericField};
use crate::predictor::Scorer;
use crate::record::LaunchRecord;

/// Price estimate for one launch record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub price_million_usd: f64,
    pub features: FeatureVector,
}

pub struct InferencePipeline {
    codec: CategoryCodec,
    normalizer: Normalizer,
    scorer: Arc<dyn Scorer>,
    model_version: String,
}

impl InferencePipeline {
    pub fn new(
        codec: CategoryCodec,
        normalizer: Normalizer,
        scorer: Arc<dyn Scorer>,
        model_version: impl Into<String>,
    ) -> Self {
        Self {
            codec,
            normalizer,
            scorer,
            model_version: model_version.into(),
        }
    }

    pub fn from_bundle(bundle: ArtifactBundle) -> Self {
        Self::new(
            bundle.codec,
            bundle.normalizer,
            Arc::new(bundle.scorer),
            bundle.manifest.model_version,
        )
    }

    pub fn codec(&self) -> &CategoryCodec {
        &self.codec
    }

    pub fn model_version(&self) -> &str {
        &self.model_version
    }

    /// Encode every categorical field, failing on the first unknown label.
    pub fn encode(&self, record: &LaunchRecord) -> Result<EncodedCategories, PipelineError> {
        let mut encoded = EncodedCategories::default();
        for field in CategoricalField::ALL {
            encoded.set(field, self.codec.encode(field, record.label(field))?);
        }
        Ok(encoded)
    }

    pub fn features(&self, record: &LaunchRecord) -> Result<FeatureVector, PipelineError> {
        let encoded = self.encode(record)?;
        // Years are within a few thousand, so the conversion is exact.
        let raw_year = record.year as f64;
        let params = self.normalizer.params(NumericField::Year);
        if params.outside_training_range(raw_year) {
            tracing::warn!(
                year = record.year,
                training_range = ?params.training_range,
                "year outside training range; prediction extrapolates"
            );
        }
        let year_scaled = self.normalizer.scale(NumericField::Year, raw_year);
        Ok(assemble(&encoded, year_scaled))
    }

    pub fn predict(&self, record: &LaunchRecord) -> Result<Prediction, PipelineError> {
        let features = self.features(record)?;
        tracing::debug!("assembled features {}", features);
        let price = self.scorer.predict(&features)?;
        if !price.is_finite() {
            return Err(PredictorError::NonFinite(price).into());
        }
        Ok(Prediction {
            price_million_usd: price,
            features,
        })
    }
}
