//! Launch price inference service.
//!
//! Maps raw launch attributes to the feature layout a trained regression tree
//! was fit with and returns its price estimate. All model state is loaded once
//! from an artifact bundle and is read-only afterwards.

pub mod artifacts;
pub mod codec;
pub mod config;
pub mod error;
pub mod features;
pub mod handler;
pub mod normalize;
pub mod pipeline;
pub mod predictor;
pub mod record;

pub use artifacts::ArtifactBundle;
pub use error::{ArtifactError, PipelineError, PredictorError, SchemaError};
pub use pipeline::{InferencePipeline, Prediction};
pub use record::LaunchRecord;
