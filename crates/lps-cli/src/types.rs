use std::path::PathBuf;

use lps_model::{FeatureRecord, PredictionResult, ValidationError};
use lps_predict::PredictionError;

/// Process exit code on success.
pub const EXIT_OK: i32 = 0;
/// Unusable bundle or input, or a batch with failed rows.
pub const EXIT_FAILURE: i32 = 1;
/// A valid single-record request that produced no estimate.
pub const EXIT_NOT_ESTIMATED: i32 = 2;

/// What happened to a single-record request.
#[derive(Debug)]
pub enum PredictOutcome {
    Estimated {
        record: FeatureRecord,
        result: PredictionResult,
    },
    /// The record has values outside the catalog; nothing was predicted.
    Rejected(ValidationError),
    Failed(PredictionError),
}

impl PredictOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            PredictOutcome::Estimated { .. } => EXIT_OK,
            PredictOutcome::Rejected(_) | PredictOutcome::Failed(_) => EXIT_NOT_ESTIMATED,
        }
    }
}

#[derive(Debug)]
pub struct BatchRow {
    pub row: usize,
    pub brand: Option<String>,
    pub outcome: Result<PredictionResult, String>,
}

#[derive(Debug)]
pub struct BatchReport {
    pub input: PathBuf,
    pub rows: Vec<BatchRow>,
}

impl BatchReport {
    pub fn failed(&self) -> usize {
        self.rows.iter().filter(|row| row.outcome.is_err()).count()
    }

    /// Any failed row fails the run.
    pub fn exit_code(&self) -> i32 {
        if self.failed() > 0 { EXIT_FAILURE } else { EXIT_OK }
    }
}
