//! Pipeline and validation errors.

use polars::prelude::PolarsError;
use thiserror::Error;

/// Failure raised while encoding, estimating or inverse scaling.
///
/// Every variant is recoverable: it describes one bad input, never a broken
/// artifact.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("schema mismatch: expected columns [{expected}], found [{found}]")]
    SchemaMismatch { expected: String, found: String },

    #[error("column not found: {0}")]
    ColumnNotFound(String),

    #[error("unknown category '{value}' in column {column}")]
    UnknownCategory { column: String, value: String },

    #[error("missing value in column {column}")]
    MissingValue { column: String },

    #[error("cannot read column {column} as a number (value '{value}')")]
    NotNumeric { column: String, value: String },

    #[error("shape mismatch: expected {expected}, found {found}")]
    ShapeMismatch { expected: String, found: String },

    #[error("pipeline returned no predictions")]
    EmptyOutput,

    #[error("non-finite value {value} produced by {origin}")]
    NonFinite { value: f64, origin: &'static str },

    #[error("polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// One field outside its catalog domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainViolation {
    pub column: &'static str,
    pub value: String,
    pub expected: String,
}

/// A record that the presentation layer must not submit.
#[derive(Debug, Clone, Error)]
#[error(
    "{} field(s) outside their allowed values: {}",
    .violations.len(),
    describe(.violations)
)]
pub struct ValidationError {
    pub violations: Vec<DomainViolation>,
}

fn describe(violations: &[DomainViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{} = '{}'", v.column, v.value))
        .collect::<Vec<_>>()
        .join(", ")
}
