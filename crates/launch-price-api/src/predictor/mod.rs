//! Predictor seam: the trained model consumed as an opaque scorer.

pub mod load;
pub mod tree;

pub use load::*;
pub use tree::*;

use crate::error::PredictorError;
use crate::features::FeatureVector;

/// A loaded regression model: feature vector in, price estimate out.
///
/// Implementations are immutable after construction and shared across
/// request handlers.
pub trait Scorer: Send + Sync {
    /// Number of features the model was fit with.
    fn n_features(&self) -> usize;

    fn predict(&self, features: &FeatureVector) -> Result<f64, PredictorError>;
}
