//! Numeric normalizer: applies the training-time scaler to raw numeric fields.
//!
//! There is no hard bound here. Values beyond the training range extrapolate
//! silently; the pipeline logs them but never blocks.

pub mod load;
pub mod types;

pub use load::*;
pub use types::*;

/// Scaling parameters per numeric field, fixed once built.
#[derive(Debug, Clone)]
pub struct Normalizer {
    year: ScalerParams,
}

impl Normalizer {
    pub fn new(year: ScalerParams) -> Self {
        Self { year }
    }

    pub fn params(&self, field: NumericField) -> &ScalerParams {
        match field {
            NumericField::Year => &self.year,
        }
    }

    pub fn scale(&self, field: NumericField, raw: f64) -> f64 {
        self.params(field).apply(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_year_with_its_params() {
        let n = Normalizer::new(ScalerParams {
            kind: ScalerKind::Standard {
                mean: 1990.0,
                scale: 10.0,
            },
            training_range: None,
        });
        assert_eq!(n.scale(NumericField::Year, 2020.0), 3.0);
        assert_eq!(n.scale(NumericField::Year, 1950.0), -4.0);
    }
}
