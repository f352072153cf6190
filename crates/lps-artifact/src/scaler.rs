//! Fitted one-dimensional target scaling.

use serde::{Deserialize, Serialize};

use lps_model::{InverseScaler, PipelineError};

use crate::bundle::SCALER_KEY;
use crate::error::{ArtifactError, Result};

fn unit_range() -> (f64, f64) {
    (0.0, 1.0)
}

/// Scaling that was applied to prices before fitting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FittedScaler {
    /// Maps `[data_min, data_max]` onto `feature_range`.
    MinMax {
        data_min: f64,
        data_max: f64,
        #[serde(default = "unit_range")]
        feature_range: (f64, f64),
    },
    /// Maps prices to `(price - mean) / scale`.
    Standard { mean: f64, scale: f64 },
}

impl FittedScaler {
    pub fn kind_name(&self) -> &'static str {
        match self {
            FittedScaler::MinMax { .. } => "min_max",
            FittedScaler::Standard { .. } => "standard",
        }
    }

    /// Scales a price into the target space the pipeline predicts in.
    pub fn transform(&self, price: f64) -> f64 {
        match *self {
            FittedScaler::MinMax {
                data_min,
                data_max,
                feature_range: (low, high),
            } => (price - data_min) / (data_max - data_min) * (high - low) + low,
            FittedScaler::Standard { mean, scale } => (price - mean) / scale,
        }
    }

    /// Maps one scaled value back to a price.
    pub fn inverse(&self, scaled: f64) -> f64 {
        match *self {
            FittedScaler::MinMax {
                data_min,
                data_max,
                feature_range: (low, high),
            } => (scaled - low) / (high - low) * (data_max - data_min) + data_min,
            FittedScaler::Standard { mean, scale } => scaled * scale + mean,
        }
    }

    /// Price range seen during fitting, when the scaler records one.
    pub fn price_range(&self) -> Option<(f64, f64)> {
        match *self {
            FittedScaler::MinMax {
                data_min, data_max, ..
            } => Some((data_min, data_max)),
            FittedScaler::Standard { .. } => None,
        }
    }

    /// Parameters must make the inverse finite and strictly increasing.
    pub(crate) fn check(&self) -> Result<()> {
        match *self {
            FittedScaler::MinMax {
                data_min,
                data_max,
                feature_range: (low, high),
            } => {
                if ![data_min, data_max, low, high].iter().all(|v| v.is_finite()) {
                    return Err(ArtifactError::invalid(
                        SCALER_KEY,
                        "min_max parameters must be finite",
                    ));
                }
                if data_max <= data_min || high <= low {
                    return Err(ArtifactError::invalid(
                        SCALER_KEY,
                        format!(
                            "min_max needs data_min < data_max and an increasing feature_range \
                             (got {data_min}..{data_max}, {low}..{high})"
                        ),
                    ));
                }
                Ok(())
            }
            FittedScaler::Standard { mean, scale } => {
                if !mean.is_finite() || !scale.is_finite() || scale <= 0.0 {
                    return Err(ArtifactError::invalid(
                        SCALER_KEY,
                        format!("standard needs a finite mean and a positive scale (got {mean}, {scale})"),
                    ));
                }
                Ok(())
            }
        }
    }
}

impl InverseScaler for FittedScaler {
    fn inverse_transform(
        &self,
        values: &[Vec<f64>],
    ) -> std::result::Result<Vec<Vec<f64>>, PipelineError> {
        values
            .iter()
            .map(|row| match row.as_slice() {
                [scaled] => Ok(vec![self.inverse(*scaled)]),
                other => Err(PipelineError::ShapeMismatch {
                    expected: "1 value per row".to_string(),
                    found: format!("{} values", other.len()),
                }),
            })
            .collect()
    }
}
