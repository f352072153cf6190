//! Column steps that turn the feature table into the estimator input.
//!
//! Each step consumes a fixed list of columns and appends a block of values to
//! every encoded row. Blocks appear in step order.

use polars::prelude::{AnyValue, Column, DataFrame};
use serde::{Deserialize, Serialize};

use lps_common::{cell_to_category, cell_to_f64};
use lps_model::PipelineError;

use crate::bundle::MODEL_KEY;
use crate::error::{ArtifactError, Result};

/// What a one-hot encoder does with a level it was not fitted on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleUnknown {
    /// Fail the prediction.
    #[default]
    Error,
    /// Encode as all zeros.
    Ignore,
}

/// One-hot encoding of categorical columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneHotEncoder {
    pub columns: Vec<String>,
    /// Known levels per column, in the same order as `columns`.
    pub categories: Vec<Vec<String>>,
    #[serde(default)]
    pub handle_unknown: HandleUnknown,
}

/// Standardization of numeric columns: `(x - mean) / scale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardColumns {
    pub columns: Vec<String>,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// Numeric columns copied unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassthroughColumns {
    pub columns: Vec<String>,
}

/// A fitted column step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnStep {
    OneHot(OneHotEncoder),
    Standard(StandardColumns),
    Passthrough(PassthroughColumns),
}

impl ColumnStep {
    /// Columns this step reads.
    pub fn columns(&self) -> &[String] {
        match self {
            ColumnStep::OneHot(step) => &step.columns,
            ColumnStep::Standard(step) => &step.columns,
            ColumnStep::Passthrough(step) => &step.columns,
        }
    }

    /// Number of values this step appends to each row.
    pub fn width(&self) -> usize {
        match self {
            ColumnStep::OneHot(step) => step.categories.iter().map(Vec::len).sum(),
            ColumnStep::Standard(step) => step.columns.len(),
            ColumnStep::Passthrough(step) => step.columns.len(),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            ColumnStep::OneHot(_) => "one_hot",
            ColumnStep::Standard(_) => "standard",
            ColumnStep::Passthrough(_) => "passthrough",
        }
    }

    pub(crate) fn encode_into(
        &self,
        frame: &DataFrame,
        rows: &mut [Vec<f64>],
    ) -> std::result::Result<(), PipelineError> {
        match self {
            ColumnStep::OneHot(step) => step.encode_into(frame, rows),
            ColumnStep::Standard(step) => {
                for ((column, mean), scale) in step.columns.iter().zip(&step.mean).zip(&step.scale) {
                    let values = lookup(frame, column)?;
                    for (idx, row) in rows.iter_mut().enumerate() {
                        let number = numeric_cell(values, column, idx)?;
                        row.push((number - mean) / scale);
                    }
                }
                Ok(())
            }
            ColumnStep::Passthrough(step) => {
                for column in &step.columns {
                    let values = lookup(frame, column)?;
                    for (idx, row) in rows.iter_mut().enumerate() {
                        row.push(numeric_cell(values, column, idx)?);
                    }
                }
                Ok(())
            }
        }
    }

    pub(crate) fn check(&self) -> Result<()> {
        if self.columns().is_empty() {
            return Err(ArtifactError::invalid(
                MODEL_KEY,
                format!("{} step has no columns", self.kind_name()),
            ));
        }
        match self {
            ColumnStep::OneHot(step) => step.check(),
            ColumnStep::Standard(step) => {
                if step.mean.len() != step.columns.len() || step.scale.len() != step.columns.len() {
                    return Err(ArtifactError::invalid(
                        MODEL_KEY,
                        format!(
                            "standard step has {} columns but {} means and {} scales",
                            step.columns.len(),
                            step.mean.len(),
                            step.scale.len()
                        ),
                    ));
                }
                for ((column, mean), scale) in step.columns.iter().zip(&step.mean).zip(&step.scale) {
                    if !mean.is_finite() || !scale.is_finite() || *scale == 0.0 {
                        return Err(ArtifactError::invalid(
                            MODEL_KEY,
                            format!("column {column} has mean {mean} and scale {scale}"),
                        ));
                    }
                }
                Ok(())
            }
            ColumnStep::Passthrough(_) => Ok(()),
        }
    }
}

impl OneHotEncoder {
    fn encode_into(
        &self,
        frame: &DataFrame,
        rows: &mut [Vec<f64>],
    ) -> std::result::Result<(), PipelineError> {
        for (column, levels) in self.columns.iter().zip(&self.categories) {
            let values = lookup(frame, column)?;
            for (idx, row) in rows.iter_mut().enumerate() {
                let level = cell_to_category(values.get(idx)?).ok_or_else(|| {
                    PipelineError::MissingValue {
                        column: column.clone(),
                    }
                })?;
                match (levels.iter().position(|known| *known == level), self.handle_unknown) {
                    (Some(hit), _) => {
                        row.extend((0..levels.len()).map(|i| if i == hit { 1.0 } else { 0.0 }));
                    }
                    (None, HandleUnknown::Ignore) => {
                        tracing::debug!(column = %column, level = %level, "Encoding unknown level as zeros");
                        row.extend(std::iter::repeat_n(0.0, levels.len()));
                    }
                    (None, HandleUnknown::Error) => {
                        return Err(PipelineError::UnknownCategory {
                            column: column.clone(),
                            value: level,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    fn check(&self) -> Result<()> {
        if self.categories.len() != self.columns.len() {
            return Err(ArtifactError::invalid(
                MODEL_KEY,
                format!(
                    "one_hot step has {} columns but {} category lists",
                    self.columns.len(),
                    self.categories.len()
                ),
            ));
        }
        for (column, levels) in self.columns.iter().zip(&self.categories) {
            if levels.is_empty() {
                return Err(ArtifactError::invalid(
                    MODEL_KEY,
                    format!("column {column} has no categories"),
                ));
            }
            let mut sorted: Vec<&String> = levels.iter().collect();
            sorted.sort_unstable();
            sorted.dedup();
            if sorted.len() != levels.len() {
                return Err(ArtifactError::invalid(
                    MODEL_KEY,
                    format!("column {column} lists a category twice"),
                ));
            }
        }
        Ok(())
    }
}

fn lookup<'a>(
    frame: &'a DataFrame,
    column: &str,
) -> std::result::Result<&'a Column, PipelineError> {
    frame
        .column(column)
        .map_err(|_| PipelineError::ColumnNotFound(column.to_string()))
}

fn numeric_cell(
    values: &Column,
    column: &str,
    idx: usize,
) -> std::result::Result<f64, PipelineError> {
    let cell: AnyValue<'_> = values.get(idx)?;
    if matches!(cell, AnyValue::Null) {
        return Err(PipelineError::MissingValue {
            column: column.to_string(),
        });
    }
    cell_to_f64(cell.clone()).ok_or_else(|| PipelineError::NotNumeric {
        column: column.to_string(),
        value: cell_to_category(cell).unwrap_or_default(),
    })
}
