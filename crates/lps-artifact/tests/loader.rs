//! Bundle loading tests against the demo artifact and corrupted copies of it.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::tempdir;

use lps_artifact::{
    ArtifactError, Estimator, FittedScaler, LoadOptions, load_bundle, parse_bundle_bytes,
    sha256_hex,
};

fn demo_bundle_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../artifacts/laptop_price_bundle.json")
}

fn demo_json() -> Value {
    let text = fs::read_to_string(demo_bundle_path()).expect("read demo bundle");
    serde_json::from_str(&text).expect("demo bundle is JSON")
}

fn write_json(dir: &Path, name: &str, value: &Value) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, serde_json::to_vec(value).expect("serialize")).expect("write bundle");
    path
}

#[test]
fn loads_demo_bundle() {
    let bundle = load_bundle(demo_bundle_path(), &LoadOptions::default()).expect("load demo");
    assert_eq!(bundle.pipeline().feature_names_in.len(), 11);
    assert_eq!(bundle.pipeline().encoded_width(), 52);
    assert!(matches!(bundle.pipeline().estimator, Estimator::Linear(_)));
    assert!(matches!(bundle.scaler(), FittedScaler::MinMax { .. }));
    assert_eq!(bundle.sha256().map(str::len), Some(64));
    assert!(bundle.source().is_some());
}

#[test]
fn bundle_with_only_model_is_fatal() {
    let dir = tempdir().unwrap();
    let mut json = demo_json();
    json.as_object_mut().unwrap().remove("scaler");
    let path = write_json(dir.path(), "model_only.json", &json);

    let err = load_bundle(&path, &LoadOptions::default()).expect_err("scaler missing");
    match err {
        ArtifactError::MissingKeys { keys, .. } => assert_eq!(keys, vec!["scaler"]),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn bundle_with_only_scaler_is_fatal() {
    let dir = tempdir().unwrap();
    let mut json = demo_json();
    json.as_object_mut().unwrap().remove("model");
    let path = write_json(dir.path(), "scaler_only.json", &json);

    let err = load_bundle(&path, &LoadOptions::default()).expect_err("model missing");
    assert!(matches!(err, ArtifactError::MissingKeys { ref keys, .. } if keys == &vec!["model"]));
}

#[test]
fn empty_object_reports_both_keys() {
    let err = parse_bundle_bytes(b"{}", Path::new("empty.json")).expect_err("no entries");
    assert!(
        matches!(err, ArtifactError::MissingKeys { ref keys, .. } if keys == &vec!["model", "scaler"])
    );
}

#[test]
fn non_object_and_garbage_are_malformed() {
    let err = parse_bundle_bytes(b"[1, 2]", Path::new("list.json")).expect_err("array");
    assert!(matches!(err, ArtifactError::Malformed { .. }));

    let err = parse_bundle_bytes(b"\x80\x04\x95pickle", Path::new("blob.pkl")).expect_err("binary");
    assert!(matches!(err, ArtifactError::Malformed { .. }));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let err = load_bundle(dir.path().join("absent.json"), &LoadOptions::default())
        .expect_err("file absent");
    assert!(matches!(err, ArtifactError::Io { .. }));
}

#[test]
fn undecodable_entry_names_its_key() {
    let mut json = demo_json();
    json["scaler"] = serde_json::json!({ "kind": "log1p" });
    let bytes = serde_json::to_vec(&json).unwrap();

    let err = parse_bundle_bytes(&bytes, Path::new("bad_scaler.json")).expect_err("unknown kind");
    assert!(matches!(err, ArtifactError::Decode { key: "scaler", .. }));
}

#[test]
fn inconsistent_model_is_rejected() {
    let mut json = demo_json();
    json["model"]["estimator"]["coef"]
        .as_array_mut()
        .unwrap()
        .pop();
    let bytes = serde_json::to_vec(&json).unwrap();

    let err = parse_bundle_bytes(&bytes, Path::new("short_coef.json")).expect_err("width");
    assert!(matches!(err, ArtifactError::InvalidArtifact { key: "model", .. }));
}

#[test]
fn extra_entries_are_ignored() {
    let mut json = demo_json();
    json["exported_by"] = Value::String("notebook".to_string());
    let bytes = serde_json::to_vec(&json).unwrap();

    assert!(parse_bundle_bytes(&bytes, Path::new("extra.json")).is_ok());
}

#[test]
fn checksum_is_enforced_when_requested() {
    let path = demo_bundle_path();
    let digest = sha256_hex(&fs::read(&path).unwrap());

    let options = LoadOptions::default().with_expected_sha256(digest.to_uppercase());
    let bundle = load_bundle(&path, &options).expect("matching digest");
    assert_eq!(bundle.sha256(), Some(digest.as_str()));

    let options = LoadOptions::default().with_expected_sha256("00".repeat(32));
    let err = load_bundle(&path, &options).expect_err("wrong digest");
    assert!(matches!(err, ArtifactError::Sha256Mismatch { .. }));
}
