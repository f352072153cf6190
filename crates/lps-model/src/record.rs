//! The feature record submitted for one price estimate.

use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, PolarsResult, Series};
use serde::{Deserialize, Serialize};

use crate::catalog::{DomainKind, field_domains};
use crate::error::{DomainViolation, ValidationError};
use crate::schema;

/// One laptop configuration.
///
/// Categorical fields hold plain strings so that a level outside the catalog
/// can still be represented; whether the fitted pipeline accepts it is decided
/// at prediction time. Serde field names are the feature column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    #[serde(rename = "Brand")]
    pub brand: String,
    #[serde(rename = "Processor")]
    pub processor: String,
    #[serde(rename = "Gen_processor")]
    pub generation: i64,
    #[serde(rename = "Seri_processor")]
    pub series: String,
    #[serde(rename = "RAM(GB)")]
    pub ram_gb: i64,
    #[serde(rename = "SSD(GB)")]
    pub storage_gb: i64,
    #[serde(rename = "Ukuran Layar")]
    pub screen_size: f64,
    #[serde(rename = "Sistem Operasi")]
    pub os: String,
    #[serde(rename = "GPU_brand")]
    pub gpu_brand: String,
    #[serde(rename = "GPU_model")]
    pub gpu_model: String,
    #[serde(rename = "GPU_vram")]
    pub gpu_memory_gb: i64,
}

impl FeatureRecord {
    /// Builds the single-row feature table, columns in [`schema::FEATURE_COLUMNS`] order.
    pub fn to_frame(&self) -> PolarsResult<DataFrame> {
        let columns: Vec<Column> = vec![
            text_column(schema::BRAND, &self.brand),
            text_column(schema::PROCESSOR, &self.processor),
            Series::new(schema::STORAGE_GB.into(), [self.storage_gb]).into_column(),
            Series::new(schema::SCREEN_SIZE.into(), [self.screen_size]).into_column(),
            Series::new(schema::RAM_GB.into(), [self.ram_gb]).into_column(),
            text_column(schema::OS, &self.os),
            text_column(schema::GPU_BRAND, &self.gpu_brand),
            text_column(schema::GPU_MODEL, &self.gpu_model),
            Series::new(schema::GPU_MEMORY_GB.into(), [self.gpu_memory_gb]).into_column(),
            Series::new(schema::GENERATION.into(), [self.generation]).into_column(),
            text_column(schema::SERIES, &self.series),
        ];
        DataFrame::new(columns)
    }

    /// Checks every field against the catalog.
    ///
    /// All violations are collected, not just the first.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut violations = Vec::new();
        for domain in field_domains() {
            let (accepted, shown) = match domain.column {
                schema::BRAND => (domain.kind.contains_level(&self.brand), self.brand.clone()),
                schema::PROCESSOR => (
                    domain.kind.contains_level(&self.processor),
                    self.processor.clone(),
                ),
                schema::STORAGE_GB => (
                    domain.kind.contains_integer(self.storage_gb),
                    self.storage_gb.to_string(),
                ),
                schema::SCREEN_SIZE => (
                    domain.kind.contains_size(self.screen_size),
                    self.screen_size.to_string(),
                ),
                schema::RAM_GB => (
                    domain.kind.contains_integer(self.ram_gb),
                    self.ram_gb.to_string(),
                ),
                schema::OS => (domain.kind.contains_level(&self.os), self.os.clone()),
                schema::GPU_BRAND => (
                    domain.kind.contains_level(&self.gpu_brand),
                    self.gpu_brand.clone(),
                ),
                schema::GPU_MODEL => (
                    domain.kind.contains_level(&self.gpu_model),
                    self.gpu_model.clone(),
                ),
                schema::GPU_MEMORY_GB => (
                    domain.kind.contains_integer(self.gpu_memory_gb),
                    self.gpu_memory_gb.to_string(),
                ),
                schema::GENERATION => (
                    domain.kind.contains_integer(self.generation),
                    self.generation.to_string(),
                ),
                schema::SERIES => (domain.kind.contains_level(&self.series), self.series.clone()),
                _ => continue,
            };
            if !accepted {
                violations.push(DomainViolation {
                    column: domain.column,
                    value: shown,
                    expected: expected_text(&domain.kind),
                });
            }
        }
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { violations })
        }
    }
}

fn text_column(name: &str, value: &str) -> Column {
    Series::new(name.into(), [value]).into_column()
}

fn expected_text(kind: &DomainKind) -> String {
    match kind {
        DomainKind::Stepped { .. } => kind.describe(),
        _ => format!("one of: {}", kind.describe()),
    }
}
