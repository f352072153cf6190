//! Property tests over the whole catalog.

use std::path::Path;
use std::sync::OnceLock;

use proptest::prelude::*;

use lps_artifact::{ArtifactBundle, LoadOptions, load_bundle};
use lps_model::FeatureRecord;
use lps_model::catalog::{
    BRANDS, GENERATIONS, GPU_BRANDS, GPU_MEMORY_OPTIONS_GB, GPU_MODELS, OPERATING_SYSTEMS,
    PROCESSORS, RAM_OPTIONS_GB, SCREEN_SIZES, SERIES, STORAGE_MAX_GB, STORAGE_STEP_GB,
};
use lps_predict::PredictionService;

fn bundle() -> &'static ArtifactBundle {
    static BUNDLE: OnceLock<ArtifactBundle> = OnceLock::new();
    BUNDLE.get_or_init(|| {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../artifacts/laptop_price_bundle.json");
        load_bundle(path, &LoadOptions::default()).expect("load demo bundle")
    })
}

fn levels(values: &'static [&'static str]) -> impl Strategy<Value = String> {
    prop::sample::select(values).prop_map(str::to_string)
}

fn valid_record() -> impl Strategy<Value = FeatureRecord> {
    (
        (levels(BRANDS), levels(PROCESSORS), GENERATIONS, levels(SERIES)),
        (
            prop::sample::select(RAM_OPTIONS_GB),
            (1..=STORAGE_MAX_GB / STORAGE_STEP_GB).prop_map(|k| k * STORAGE_STEP_GB),
            prop::sample::select(SCREEN_SIZES),
        ),
        (
            levels(OPERATING_SYSTEMS),
            levels(GPU_BRANDS),
            levels(GPU_MODELS),
            prop::sample::select(GPU_MEMORY_OPTIONS_GB),
        ),
    )
        .prop_map(
            |(
                (brand, processor, generation, series),
                (ram_gb, storage_gb, screen_size),
                (os, gpu_brand, gpu_model, gpu_memory_gb),
            )| FeatureRecord {
                brand,
                processor,
                generation,
                series,
                ram_gb,
                storage_gb,
                screen_size,
                os,
                gpu_brand,
                gpu_model,
                gpu_memory_gb,
            },
        )
}

proptest! {
    /// Property: every catalog record validates and yields a finite positive price
    #[test]
    fn prop_valid_records_predict(record in valid_record()) {
        prop_assert!(record.validate().is_ok());
        let service = PredictionService::from_bundle(bundle());
        let result = service.predict(&record);
        prop_assert!(result.is_ok(), "prediction failed: {:?}", result.err());
        let result = result.unwrap();
        prop_assert!(result.price.is_finite());
        prop_assert!(result.price > 0.0);
    }

    /// Property: repeated predictions are bit-identical
    #[test]
    fn prop_predictions_are_deterministic(record in valid_record()) {
        let service = PredictionService::from_bundle(bundle());
        let first = service.predict(&record).unwrap();
        let second = service.predict(&record).unwrap();
        prop_assert_eq!(first.scaled.to_bits(), second.scaled.to_bits());
        prop_assert_eq!(first.price.to_bits(), second.price.to_bits());
    }

    /// Property: inverse scaling is strictly increasing and deterministic
    #[test]
    fn prop_inverse_is_monotonic(a in -2.0f64..3.0, b in -2.0f64..3.0) {
        let scaler = bundle().scaler();
        prop_assert_eq!(scaler.inverse(a).to_bits(), scaler.inverse(a).to_bits());
        if a + 1e-6 < b {
            prop_assert!(scaler.inverse(a) < scaler.inverse(b));
        }
    }
}
