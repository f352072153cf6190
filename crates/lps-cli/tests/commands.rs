//! Predict and batch commands against the demo bundle.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use lps_artifact::ArtifactError;
use lps_cli::cli::{BatchArgs, Cli, Command, PredictArgs};
use lps_cli::commands::{run_batch, run_predict};
use lps_cli::summary::record_fields;
use lps_cli::types::{EXIT_FAILURE, EXIT_NOT_ESTIMATED, EXIT_OK, PredictOutcome};
use lps_model::PipelineError;
use lps_predict::PredictionStage;
use serde_json::Value;
use tempfile::TempDir;

const HEADER: &str = "Brand,Processor,Gen_processor,Seri_processor,RAM(GB),SSD(GB),Ukuran Layar,Sistem Operasi,GPU_brand,GPU_model,GPU_vram";
const ASUS_ROW: &str = "ASUS,Intel i7,12,H,16,512,15.6,Windows 11,NVIDIA,RTX 3060,6";

fn demo_bundle() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../artifacts/laptop_price_bundle.json")
}

fn predict_args(bundle: &Path, brand: &str) -> PredictArgs {
    let mut flags: Vec<OsString> = vec!["lps".into(), "predict".into(), "--bundle".into()];
    flags.push(bundle.as_os_str().to_owned());
    for (flag, value) in [
        ("--brand", brand),
        ("--processor", "Intel i7"),
        ("--generation", "12"),
        ("--series", "H"),
        ("--ram-gb", "16"),
        ("--storage-gb", "512"),
        ("--screen-size", "15.6"),
        ("--os", "Windows 11"),
        ("--gpu-brand", "NVIDIA"),
        ("--gpu-model", "RTX 3060"),
        ("--gpu-memory-gb", "6"),
    ] {
        flags.push(flag.into());
        flags.push(value.into());
    }
    match Cli::try_parse_from(flags).expect("parse").command {
        Command::Predict(args) => args,
        _ => panic!("expected predict"),
    }
}

fn batch_args(bundle: &Path, input: &Path) -> BatchArgs {
    let flags: Vec<OsString> = vec![
        "lps".into(),
        "batch".into(),
        "--bundle".into(),
        bundle.as_os_str().to_owned(),
        input.as_os_str().to_owned(),
    ];
    match Cli::try_parse_from(flags).expect("parse").command {
        Command::Batch(args) => args,
        _ => panic!("expected batch"),
    }
}

fn write_csv(dir: &TempDir, rows: &[&str]) -> PathBuf {
    let path = dir.path().join("batch.csv");
    let mut text = format!("{HEADER}\n");
    for row in rows {
        text.push_str(row);
        text.push('\n');
    }
    fs::write(&path, text).expect("write csv");
    path
}

/// Demo bundle whose brand encoder no longer knows RAZER.
fn bundle_without_razer(dir: &TempDir) -> PathBuf {
    let text = fs::read_to_string(demo_bundle()).expect("read demo bundle");
    let mut bundle: Value = serde_json::from_str(&text).expect("parse demo bundle");
    let brands = bundle["model"]["preprocessor"][0]["categories"][0]
        .as_array_mut()
        .expect("brand categories");
    let position = brands
        .iter()
        .position(|brand| brand == "RAZER")
        .expect("RAZER category");
    brands.remove(position);
    bundle["model"]["estimator"]["coef"]
        .as_array_mut()
        .expect("coefficients")
        .remove(position);
    let path = dir.path().join("no_razer.json");
    fs::write(&path, serde_json::to_string(&bundle).expect("encode")).expect("write bundle");
    path
}

#[test]
fn predict_estimates_the_demo_record() {
    let outcome = run_predict(&predict_args(&demo_bundle(), "ASUS")).expect("run predict");
    assert_eq!(outcome.exit_code(), EXIT_OK);
    match outcome {
        PredictOutcome::Estimated { record, result } => {
            assert_eq!(record.brand, "ASUS");
            assert!((result.scaled - 0.431_879_50).abs() < 1e-6);
            assert!((result.price - 30_911_770.07).abs() < 0.01);
        }
        other => panic!("expected an estimate, got {other:?}"),
    }
}

#[test]
fn predict_rejects_a_brand_outside_the_catalog() {
    let outcome = run_predict(&predict_args(&demo_bundle(), "UNKNOWNBRAND")).expect("run predict");
    assert_eq!(outcome.exit_code(), EXIT_NOT_ESTIMATED);
    match outcome {
        PredictOutcome::Rejected(rejection) => {
            assert_eq!(rejection.violations.len(), 1);
            assert_eq!(rejection.violations[0].column, "Brand");
        }
        other => panic!("expected a rejection, got {other:?}"),
    }
}

#[test]
fn predict_reports_a_level_the_model_never_saw() {
    let dir = TempDir::new().expect("tempdir");
    let bundle = bundle_without_razer(&dir);
    let outcome = run_predict(&predict_args(&bundle, "RAZER")).expect("run predict");
    assert_eq!(outcome.exit_code(), EXIT_NOT_ESTIMATED);
    match outcome {
        PredictOutcome::Failed(error) => {
            assert_eq!(error.stage(), PredictionStage::Predict);
            assert!(matches!(
                error.cause(),
                PipelineError::UnknownCategory { column, value }
                    if column == "Brand" && value == "RAZER"
            ));
        }
        other => panic!("expected a failed estimate, got {other:?}"),
    }
}

#[test]
fn predict_with_missing_bundle_is_fatal() {
    let dir = TempDir::new().expect("tempdir");
    let missing = dir.path().join("absent.json");
    let err = run_predict(&predict_args(&missing, "ASUS")).expect_err("no bundle");
    assert!(matches!(
        err.downcast_ref::<ArtifactError>(),
        Some(ArtifactError::Io { .. })
    ));
}

#[test]
fn batch_keeps_scoring_past_bad_rows() {
    let dir = TempDir::new().expect("tempdir");
    let input = write_csv(
        &dir,
        &[
            ASUS_ROW,
            "HP,Intel i5,11,U,sixteen,256,14.0,Windows 10,NVIDIA,RTX 3050,4",
            "Apple,Apple M2,14,P,8,256,13.3,macOS,Apple,Apple Integrated,0",
        ],
    );
    let report = run_batch(&batch_args(&demo_bundle(), &input)).expect("run batch");
    assert_eq!(report.rows.len(), 3);
    assert_eq!(report.failed(), 2);
    assert_eq!(report.exit_code(), EXIT_FAILURE);

    let first = report.rows[0].outcome.as_ref().expect("first row scored");
    assert!((first.price - 30_911_770.07).abs() < 0.01);
    assert_eq!(report.rows[1].brand, None);
    assert_eq!(report.rows[2].brand.as_deref(), Some("Apple"));
    assert!(
        report.rows[2]
            .outcome
            .as_ref()
            .expect_err("outside catalog")
            .contains("Brand")
    );
}

#[test]
fn batch_of_valid_rows_succeeds() {
    let dir = TempDir::new().expect("tempdir");
    let input = write_csv(
        &dir,
        &[
            ASUS_ROW,
            "LENOVO,AMD Ryzen 9,14,HX,64,4096,18.0,Linux,AMD,Radeon RX 6600M,24",
        ],
    );
    let report = run_batch(&batch_args(&demo_bundle(), &input)).expect("run batch");
    assert_eq!(report.failed(), 0);
    assert_eq!(report.exit_code(), EXIT_OK);
}

#[test]
fn estimate_table_shows_every_column_by_kind() {
    let outcome = run_predict(&predict_args(&demo_bundle(), "ASUS")).expect("run predict");
    let PredictOutcome::Estimated { record, .. } = outcome else {
        panic!("expected an estimate");
    };
    let fields = record_fields(&record).expect("fields");
    let columns: Vec<&str> = fields.iter().map(|(column, _)| *column).collect();
    assert_eq!(columns, lps_model::FEATURE_COLUMNS.to_vec());
    let value = |column: &str| {
        fields
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, value)| value.clone())
            .expect("column present")
    };
    assert_eq!(value("Brand"), "ASUS");
    assert_eq!(value("GPU_model"), "RTX 3060");
    assert_eq!(value("SSD(GB)"), "512");
    assert_eq!(value("Ukuran Layar"), "15.6");
}
