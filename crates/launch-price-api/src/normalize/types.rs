use std::fmt;

use serde::Deserialize;
use thiserror::Error;

/// Numeric request fields that are rescaled before assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericField {
    Year,
}

impl NumericField {
    pub fn request_key(self) -> &'static str {
        match self {
            NumericField::Year => "Year",
        }
    }
}

impl fmt::Display for NumericField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.request_key())
    }
}

/// Training-time scaling transform for one numeric field.
///
/// Each variant evaluates its arithmetic in the same order as the library that
/// fit it, so results match training bit for bit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalerKind {
    /// `(x - mean) / scale`
    Standard { mean: f64, scale: f64 },
    /// `x * scale + min`
    MinMax { scale: f64, min: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalerParams {
    pub kind: ScalerKind,
    /// Raw range observed during training, if the artifact recorded it.
    pub training_range: Option<(f64, f64)>,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ScalerError {
    #[error("scale must be finite and non-zero (got {0})")]
    BadScale(f64),
    #[error("{name} must be finite (got {value})")]
    NonFinite { name: &'static str, value: f64 },
    #[error("training_range lower bound {0} exceeds upper bound {1}")]
    InvertedRange(f64, f64),
}

impl ScalerParams {
    pub fn apply(&self, raw: f64) -> f64 {
        match self.kind {
            ScalerKind::Standard { mean, scale } => (raw - mean) / scale,
            ScalerKind::MinMax { scale, min } => raw * scale + min,
        }
    }

    pub fn outside_training_range(&self, raw: f64) -> bool {
        self.training_range
            .map(|(lo, hi)| raw < lo || raw > hi)
            .unwrap_or(false)
    }

    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            ScalerKind::Standard { .. } => "standard",
            ScalerKind::MinMax { .. } => "min_max",
        }
    }

    pub fn from_raw(raw: RawScaler) -> Result<Self, ScalerError> {
        let (kind, range) = match raw {
            RawScaler::Standard {
                mean,
                scale,
                training_range,
            } => {
                // A scaler fit without centering/scaling stores null for that step.
                let mean = mean.unwrap_or(0.0);
                let scale = scale.unwrap_or(1.0);
                finite("mean", mean)?;
                (ScalerKind::Standard { mean, scale }, training_range)
            }
            RawScaler::MinMax {
                scale,
                min,
                training_range,
            } => {
                finite("min", min)?;
                (ScalerKind::MinMax { scale, min }, training_range)
            }
        };
        let scale = match kind {
            ScalerKind::Standard { scale, .. } | ScalerKind::MinMax { scale, .. } => scale,
        };
        if !scale.is_finite() || scale == 0.0 {
            return Err(ScalerError::BadScale(scale));
        }
        let training_range = match range {
            Some([lo, hi]) => {
                finite("training_range", lo)?;
                finite("training_range", hi)?;
                if lo > hi {
                    return Err(ScalerError::InvertedRange(lo, hi));
                }
                Some((lo, hi))
            }
            None => None,
        };
        Ok(Self {
            kind,
            training_range,
        })
    }
}

fn finite(name: &'static str, value: f64) -> Result<(), ScalerError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ScalerError::NonFinite { name, value })
    }
}

/// On-disk scaler layout, tagged by `kind`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RawScaler {
    Standard {
        mean: Option<f64>,
        scale: Option<f64>,
        training_range: Option<[f64; 2]>,
    },
    MinMax {
        scale: f64,
        min: f64,
        training_range: Option<[f64; 2]>,
    },
}
