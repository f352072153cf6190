//! Reading feature records from JSON and CSV files.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use csv::{ReaderBuilder, Trim};

use lps_model::{FEATURE_COLUMNS, FeatureRecord};

/// Reads one record from a JSON object keyed by column name.
pub fn read_record_json(path: &Path) -> Result<FeatureRecord> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse record {}", path.display()))
}

/// One data row of a batch file.
#[derive(Debug)]
pub struct BatchRecord {
    /// 1-based, header excluded.
    pub row: usize,
    /// The record, or why the row could not be read.
    pub record: std::result::Result<FeatureRecord, String>,
}

/// Reads every row of a CSV file whose header names the feature columns.
///
/// A row that does not deserialize is kept as an error so the remaining rows
/// can still be scored. A header missing any feature column fails the whole
/// file.
pub fn read_records_csv(path: &Path) -> Result<Vec<BatchRecord>> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .from_path(path)
        .with_context(|| format!("open {}", path.display()))?;
    let headers = reader
        .headers()
        .with_context(|| format!("read header of {}", path.display()))?
        .clone();
    let missing: Vec<&str> = FEATURE_COLUMNS
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|header| header == *column))
        .collect();
    if !missing.is_empty() {
        bail!(
            "{} is missing columns: {}",
            path.display(),
            missing.join(", ")
        );
    }

    Ok(reader
        .deserialize::<FeatureRecord>()
        .enumerate()
        .map(|(idx, row)| BatchRecord {
            row: idx + 1,
            record: row.map_err(|e| e.to_string()),
        })
        .collect())
}
