//! Per-request prediction errors.

use std::fmt;

use lps_model::PipelineError;
use thiserror::Error;

/// Step of the prediction sequence that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionStage {
    /// Building the single-row feature table.
    Frame,
    /// Encoding and estimating.
    Predict,
    /// Inverting the target scaling.
    Inverse,
}

impl fmt::Display for PredictionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PredictionStage::Frame => "building the feature table",
            PredictionStage::Predict => "running the pipeline",
            PredictionStage::Inverse => "inverting the price scale",
        };
        f.write_str(label)
    }
}

/// A failed estimate. The bundle and other requests are unaffected.
#[derive(Debug, Error)]
#[error("prediction failed while {stage}: {source}")]
pub struct PredictionError {
    stage: PredictionStage,
    #[source]
    source: PipelineError,
}

impl PredictionError {
    pub fn new(stage: PredictionStage, source: PipelineError) -> Self {
        Self { stage, source }
    }

    pub fn stage(&self) -> PredictionStage {
        self.stage
    }

    /// Underlying cause.
    pub fn cause(&self) -> &PipelineError {
        &self.source
    }

    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match &self.source {
            PipelineError::UnknownCategory { column, value } => format!(
                "The model was not trained on {column} '{value}'. Pick another value and resubmit."
            ),
            PipelineError::NotNumeric { column, value } => {
                format!("{column} must be a number, got '{value}'.")
            }
            PipelineError::MissingValue { column } => format!("{column} is required."),
            other => format!("Could not estimate a price for this configuration: {other}."),
        }
    }
}
