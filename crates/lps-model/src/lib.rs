//! Data model for laptop price estimation.
//!
//! # Module Organization
//!
//! - [`schema`]: column names and order the fitted pipeline expects
//! - [`catalog`]: enumerated and bounded domains for every record field
//! - [`record`]: the [`FeatureRecord`] submitted for one estimate
//! - [`traits`]: the two capabilities a prediction needs
//! - [`error`]: pipeline and validation errors

pub mod catalog;
pub mod error;
pub mod record;
pub mod schema;
pub mod traits;

use serde::{Deserialize, Serialize};

pub use catalog::{DomainKind, FieldDomain, field_domains};
pub use error::{DomainViolation, PipelineError, ValidationError};
pub use record::FeatureRecord;
pub use schema::{ColumnKind, FEATURE_COLUMNS, column_kind};
pub use traits::{InverseScaler, PricePipeline};

/// Outcome of one successful estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Raw pipeline output, in the scaled target space.
    pub scaled: f64,
    /// Price after inverting the target scaling.
    pub price: f64,
}
