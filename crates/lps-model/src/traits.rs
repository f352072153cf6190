//! Capabilities a price estimate is built from.
//!
//! The prediction service only sees these two traits, so fitted artifacts and
//! test stubs are interchangeable.

use polars::prelude::DataFrame;

use crate::error::PipelineError;

/// Fitted feature transforms plus regression estimator.
pub trait PricePipeline: Send + Sync {
    /// Predicts one scaled value per row of `frame`.
    fn predict(&self, frame: &DataFrame) -> Result<Vec<f64>, PipelineError>;
}

/// Fitted one-dimensional target scaling.
pub trait InverseScaler: Send + Sync {
    /// Maps scaled values back to prices.
    ///
    /// `values` is two-dimensional with exactly one value per row; the output
    /// has the same shape.
    fn inverse_transform(&self, values: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, PipelineError>;
}
