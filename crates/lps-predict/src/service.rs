//! The prediction service.

use std::fmt;
use std::sync::Arc;

use lps_artifact::ArtifactBundle;
use lps_model::{FeatureRecord, InverseScaler, PipelineError, PredictionResult, PricePipeline};

use crate::error::{PredictionError, PredictionStage};

/// Stateless estimator over a shared pipeline and inverse scaling.
///
/// Cloning is cheap and clones share the same fitted objects.
#[derive(Clone)]
pub struct PredictionService {
    pipeline: Arc<dyn PricePipeline>,
    scaler: Arc<dyn InverseScaler>,
}

impl PredictionService {
    pub fn new(pipeline: Arc<dyn PricePipeline>, scaler: Arc<dyn InverseScaler>) -> Self {
        Self { pipeline, scaler }
    }

    /// Uses the fitted objects of a loaded bundle.
    pub fn from_bundle(bundle: &ArtifactBundle) -> Self {
        Self::new(bundle.pipeline_handle(), bundle.scaler_handle())
    }

    /// Estimates the price of one configuration.
    ///
    /// The record is not checked against the catalog here; levels the
    /// pipeline does not know surface as a [`PredictionError`].
    pub fn predict(&self, record: &FeatureRecord) -> Result<PredictionResult, PredictionError> {
        let frame = record
            .to_frame()
            .map_err(|e| PredictionError::new(PredictionStage::Frame, e.into()))?;

        let scaled = self
            .pipeline
            .predict(&frame)
            .and_then(|values| values.first().copied().ok_or(PipelineError::EmptyOutput))
            .and_then(|value| finite(value, "the pipeline"))
            .map_err(|e| PredictionError::new(PredictionStage::Predict, e))?;
        tracing::debug!(scaled, "Pipeline prediction");

        let price = self
            .scaler
            .inverse_transform(&[vec![scaled]])
            .and_then(|rows| {
                rows.first()
                    .and_then(|row| row.first())
                    .copied()
                    .ok_or_else(|| PipelineError::ShapeMismatch {
                        expected: "1 row with 1 value".to_string(),
                        found: format!("{} rows", rows.len()),
                    })
            })
            .and_then(|value| finite(value, "the inverse scaling"))
            .map_err(|e| PredictionError::new(PredictionStage::Inverse, e))?;
        tracing::debug!(price, "Inverse scaled price");

        Ok(PredictionResult { scaled, price })
    }
}

impl fmt::Debug for PredictionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredictionService").finish_non_exhaustive()
    }
}

fn finite(value: f64, origin: &'static str) -> Result<f64, PipelineError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(PipelineError::NonFinite { value, origin })
    }
}
