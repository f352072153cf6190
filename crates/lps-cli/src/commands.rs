use std::sync::Arc;

use anyhow::{Context, Result};
use comfy_table::{CellAlignment, Table};
use tracing::{info, info_span, warn};

use lps_artifact::{ArtifactBundle, BundleCache, ColumnStep, LoadOptions};
use lps_common::format_rupiah;
use lps_model::{FeatureRecord, PredictionResult, field_domains};
use lps_predict::PredictionService;

use crate::cli::{BatchArgs, BundleArgs, InspectArgs, PredictArgs, RecordArgs};
use crate::input::{read_record_json, read_records_csv};
use crate::summary::{align_column, apply_table_style, header_cell};
use crate::types::{BatchReport, BatchRow, PredictOutcome};

pub fn run_options() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Column"),
        header_cell("Allowed values"),
    ]);
    apply_table_style(&mut table);
    for domain in field_domains() {
        table.add_row(vec![
            domain.label.to_string(),
            domain.column.to_string(),
            domain.kind.describe(),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_inspect(args: &InspectArgs) -> Result<()> {
    let bundle = load(&args.bundle)?;
    let pipeline = bundle.pipeline();

    let mut overview = Table::new();
    overview.set_header(vec![header_cell("Property"), header_cell("Value")]);
    apply_table_style(&mut overview);
    let source = bundle
        .source()
        .map(|path| path.display().to_string())
        .unwrap_or_default();
    overview.add_row(vec!["Path".to_string(), source]);
    overview.add_row(vec![
        "SHA-256".to_string(),
        bundle.sha256().unwrap_or("-").to_string(),
    ]);
    overview.add_row(vec![
        "Estimator".to_string(),
        pipeline.estimator.kind_name().to_string(),
    ]);
    overview.add_row(vec![
        "Encoded width".to_string(),
        pipeline.encoded_width().to_string(),
    ]);
    overview.add_row(vec![
        "Scaler".to_string(),
        bundle.scaler().kind_name().to_string(),
    ]);
    if let Some((low, high)) = bundle.scaler().price_range() {
        overview.add_row(vec![
            "Fitted price range".to_string(),
            format!("{} .. {}", format_rupiah(low), format_rupiah(high)),
        ]);
    }
    println!("{overview}");

    let mut columns = Table::new();
    columns.set_header(vec![
        header_cell("#"),
        header_cell("Column"),
        header_cell("Step"),
        header_cell("Width"),
    ]);
    apply_table_style(&mut columns);
    align_column(&mut columns, 0, CellAlignment::Right);
    align_column(&mut columns, 3, CellAlignment::Right);
    for (idx, name) in pipeline.feature_names_in.iter().enumerate() {
        let (step, width) = step_for(&pipeline.preprocessor, name)
            .map(|(step, width)| (step.to_string(), width.to_string()))
            .unwrap_or_else(|| ("dropped".to_string(), "0".to_string()));
        columns.add_row(vec![(idx + 1).to_string(), name.clone(), step, width]);
    }
    println!("{columns}");
    Ok(())
}

pub fn run_predict(args: &PredictArgs) -> Result<PredictOutcome> {
    let bundle = load(&args.bundle)?;
    let record = record_from_args(&args.record)?;
    if let Err(rejection) = record.validate() {
        warn!(violations = rejection.violations.len(), "Record rejected");
        return Ok(PredictOutcome::Rejected(rejection));
    }
    let service = PredictionService::from_bundle(&bundle);
    match service.predict(&record) {
        Ok(result) => {
            info!(
                scaled = result.scaled,
                price = %format_rupiah(result.price),
                "Estimated price"
            );
            Ok(PredictOutcome::Estimated { record, result })
        }
        Err(error) => {
            warn!(stage = %error.stage(), error = %error, "Estimate failed");
            Ok(PredictOutcome::Failed(error))
        }
    }
}

pub fn run_batch(args: &BatchArgs) -> Result<BatchReport> {
    let bundle = load(&args.bundle)?;
    let service = PredictionService::from_bundle(&bundle);
    let batch_span = info_span!("batch", input = %args.input.display());
    let _batch_guard = batch_span.enter();

    let records = read_records_csv(&args.input)?;
    let rows: Vec<BatchRow> = records
        .into_iter()
        .map(|entry| {
            let brand = entry.record.as_ref().ok().map(|r| r.brand.clone());
            let outcome = entry
                .record
                .and_then(|record| score(&service, &record));
            if let Err(reason) = &outcome {
                warn!(row = entry.row, reason = %reason, "Row not estimated");
            }
            BatchRow {
                row: entry.row,
                brand,
                outcome,
            }
        })
        .collect();
    let report = BatchReport {
        input: args.input.clone(),
        rows,
    };
    info!(
        rows = report.rows.len(),
        failed = report.failed(),
        "Batch complete"
    );
    Ok(report)
}

fn score(
    service: &PredictionService,
    record: &FeatureRecord,
) -> std::result::Result<PredictionResult, String> {
    record.validate().map_err(|e| e.to_string())?;
    service.predict(record).map_err(|e| e.user_message())
}

fn load(args: &BundleArgs) -> Result<Arc<ArtifactBundle>> {
    let mut options = LoadOptions::default();
    if let Some(digest) = &args.expect_sha256 {
        options = options.with_expected_sha256(digest.clone());
    }
    let cache = BundleCache::new(&args.bundle, options);
    Ok(cache.get_or_load()?)
}

fn record_from_args(args: &RecordArgs) -> Result<FeatureRecord> {
    if let Some(path) = &args.record {
        return read_record_json(path);
    }
    Ok(FeatureRecord {
        brand: required(args.brand.clone(), "--brand")?,
        processor: required(args.processor.clone(), "--processor")?,
        generation: required(args.generation, "--generation")?,
        series: required(args.series.clone(), "--series")?,
        ram_gb: required(args.ram_gb, "--ram-gb")?,
        storage_gb: required(args.storage_gb, "--storage-gb")?,
        screen_size: required(args.screen_size, "--screen-size")?,
        os: required(args.os.clone(), "--os")?,
        gpu_brand: required(args.gpu_brand.clone(), "--gpu-brand")?,
        gpu_model: required(args.gpu_model.clone(), "--gpu-model")?,
        gpu_memory_gb: required(args.gpu_memory_gb, "--gpu-memory-gb")?,
    })
}

fn required<T>(value: Option<T>, flag: &str) -> Result<T> {
    value.with_context(|| format!("{flag} is required unless --record is given"))
}

/// Step kind and encoded width contributed by one input column.
fn step_for<'a>(steps: &'a [ColumnStep], column: &str) -> Option<(&'a str, usize)> {
    steps.iter().find_map(|step| {
        let position = step.columns().iter().position(|c| c == column)?;
        let width = match step {
            ColumnStep::OneHot(encoder) => encoder.categories.get(position).map_or(0, Vec::len),
            ColumnStep::Standard(_) | ColumnStep::Passthrough(_) => 1,
        };
        Some((step.kind_name(), width))
    })
}

