//! The fitted prediction pipeline.

mod encoder;
mod estimator;

use std::collections::BTreeSet;

use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

use lps_model::{PipelineError, PricePipeline};

use crate::bundle::MODEL_KEY;
use crate::error::{ArtifactError, Result};

pub use encoder::{ColumnStep, HandleUnknown, OneHotEncoder, PassthroughColumns, StandardColumns};
pub use estimator::{Estimator, ForestModel, LinearModel, RegressionTree, TREE_LEAF};

/// Column steps followed by a regression estimator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedPipeline {
    /// Columns the pipeline was fitted on, in order.
    pub feature_names_in: Vec<String>,
    pub preprocessor: Vec<ColumnStep>,
    pub estimator: Estimator,
}

impl FittedPipeline {
    /// Length of an encoded row.
    pub fn encoded_width(&self) -> usize {
        self.preprocessor.iter().map(ColumnStep::width).sum()
    }

    /// Encodes every row of `frame` after checking its schema.
    pub fn encode(&self, frame: &DataFrame) -> std::result::Result<Vec<Vec<f64>>, PipelineError> {
        self.check_schema(frame)?;
        let width = self.encoded_width();
        let mut rows = vec![Vec::with_capacity(width); frame.height()];
        for step in &self.preprocessor {
            step.encode_into(frame, &mut rows)?;
        }
        tracing::debug!(rows = rows.len(), width, "Encoded feature table");
        Ok(rows)
    }

    fn check_schema(&self, frame: &DataFrame) -> std::result::Result<(), PipelineError> {
        let found: Vec<&str> = frame
            .get_column_names()
            .into_iter()
            .map(|name| name.as_str())
            .collect();
        if found.len() == self.feature_names_in.len()
            && found.iter().zip(&self.feature_names_in).all(|(a, b)| *a == b.as_str())
        {
            return Ok(());
        }
        Err(PipelineError::SchemaMismatch {
            expected: self.feature_names_in.join(", "),
            found: found.join(", "),
        })
    }

    pub(crate) fn check(&self) -> Result<()> {
        if self.feature_names_in.is_empty() {
            return Err(ArtifactError::invalid(MODEL_KEY, "feature_names_in is empty"));
        }
        let known: BTreeSet<&str> = self.feature_names_in.iter().map(String::as_str).collect();
        if known.len() != self.feature_names_in.len() {
            return Err(ArtifactError::invalid(
                MODEL_KEY,
                "feature_names_in lists a column twice",
            ));
        }
        if self.preprocessor.is_empty() {
            return Err(ArtifactError::invalid(MODEL_KEY, "preprocessor has no steps"));
        }
        let mut consumed = BTreeSet::new();
        for step in &self.preprocessor {
            step.check()?;
            for column in step.columns() {
                if !known.contains(column.as_str()) {
                    return Err(ArtifactError::invalid(
                        MODEL_KEY,
                        format!("{} step reads unknown column {column}", step.kind_name()),
                    ));
                }
                if !consumed.insert(column.as_str()) {
                    return Err(ArtifactError::invalid(
                        MODEL_KEY,
                        format!("column {column} is encoded by more than one step"),
                    ));
                }
            }
        }
        self.estimator.check(self.encoded_width())
    }
}

impl PricePipeline for FittedPipeline {
    fn predict(&self, frame: &DataFrame) -> std::result::Result<Vec<f64>, PipelineError> {
        self.encode(frame)?
            .iter()
            .map(|row| self.estimator.predict_row(row))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{IntoColumn, NamedFrom, Series};

    fn pipeline() -> FittedPipeline {
        FittedPipeline {
            feature_names_in: vec!["Brand".to_string(), "RAM(GB)".to_string()],
            preprocessor: vec![
                ColumnStep::OneHot(OneHotEncoder {
                    columns: vec!["Brand".to_string()],
                    categories: vec![vec!["ASUS".to_string(), "DELL".to_string()]],
                    handle_unknown: HandleUnknown::Error,
                }),
                ColumnStep::Passthrough(PassthroughColumns {
                    columns: vec!["RAM(GB)".to_string()],
                }),
            ],
            estimator: Estimator::Linear(LinearModel {
                coef: vec![0.25, 0.125, 0.01],
                intercept: 0.5,
            }),
        }
    }

    fn frame(columns: &[(&str, &str)], ram: i64) -> DataFrame {
        let mut out = Vec::new();
        for (name, value) in columns {
            out.push(Series::new((*name).into(), [*value]).into_column());
        }
        out.push(Series::new("RAM(GB)".into(), [ram]).into_column());
        DataFrame::new(out).expect("frame")
    }

    #[test]
    fn predicts_linear_output() {
        let pipeline = pipeline();
        pipeline.check().expect("valid pipeline");
        let predicted = pipeline
            .predict(&frame(&[("Brand", "DELL")], 16))
            .expect("predict");
        assert_eq!(predicted.len(), 1);
        assert!((predicted[0] - (0.5 + 0.125 + 0.16)).abs() < 1e-12);
    }

    #[test]
    fn schema_mismatch_is_recoverable() {
        let err = pipeline()
            .predict(&frame(&[("Make", "DELL")], 16))
            .expect_err("wrong column name");
        assert!(matches!(err, PipelineError::SchemaMismatch { .. }));
    }

    #[test]
    fn check_rejects_coefficient_count_mismatch() {
        let mut broken = pipeline();
        broken.estimator = Estimator::Linear(LinearModel {
            coef: vec![0.1, 0.2],
            intercept: 0.0,
        });
        let err = broken.check().expect_err("width mismatch");
        assert!(matches!(err, ArtifactError::InvalidArtifact { key: "model", .. }));
    }

    #[test]
    fn check_rejects_unknown_step_column() {
        let mut broken = pipeline();
        broken.preprocessor.push(ColumnStep::Passthrough(PassthroughColumns {
            columns: vec!["Weight".to_string()],
        }));
        assert!(broken.check().is_err());
    }
}
