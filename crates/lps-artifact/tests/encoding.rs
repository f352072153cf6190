//! Encoding and scaling properties of fitted objects.

use std::path::Path;

use proptest::prelude::*;

use lps_artifact::{ArtifactBundle, ColumnStep, FittedScaler, LoadOptions, load_bundle};
use lps_model::FeatureRecord;
use lps_model::catalog::{
    BRANDS, GPU_BRANDS, GPU_MODELS, OPERATING_SYSTEMS, PROCESSORS, SCREEN_SIZES, SERIES,
};

fn demo_bundle() -> ArtifactBundle {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../artifacts/laptop_price_bundle.json");
    load_bundle(path, &LoadOptions::default()).expect("load demo bundle")
}

fn level(values: &'static [&'static str]) -> impl Strategy<Value = String> {
    prop::sample::select(values).prop_map(str::to_string)
}

fn categorical_record() -> impl Strategy<Value = FeatureRecord> {
    (
        level(BRANDS),
        level(PROCESSORS),
        level(SERIES),
        level(OPERATING_SYSTEMS),
        level(GPU_BRANDS),
        level(GPU_MODELS),
        prop::sample::select(SCREEN_SIZES),
    )
        .prop_map(
            |(brand, processor, series, os, gpu_brand, gpu_model, screen_size)| FeatureRecord {
                brand,
                processor,
                generation: 12,
                series,
                ram_gb: 16,
                storage_gb: 512,
                screen_size,
                os,
                gpu_brand,
                gpu_model,
                gpu_memory_gb: 4,
            },
        )
}

proptest! {
    /// Property: each categorical column sets exactly one indicator
    #[test]
    fn prop_one_hot_block_is_an_indicator_per_column(record in categorical_record()) {
        let bundle = demo_bundle();
        let pipeline = bundle.pipeline();
        let ColumnStep::OneHot(encoder) = &pipeline.preprocessor[0] else {
            panic!("demo bundle starts with a one_hot step");
        };
        let frame = record.to_frame().expect("frame");
        let rows = pipeline.encode(&frame).expect("encode");

        prop_assert_eq!(rows.len(), 1);
        prop_assert_eq!(rows[0].len(), pipeline.encoded_width());
        let block = &rows[0][..pipeline.preprocessor[0].width()];
        prop_assert!(block.iter().all(|v| *v == 0.0 || *v == 1.0));
        prop_assert_eq!(block.iter().sum::<f64>(), encoder.columns.len() as f64);
    }

    /// Property: a standard price scaling inverts in increasing order
    #[test]
    fn prop_standard_inverse_is_increasing(
        mean in -1.0e6f64..1.0e6,
        scale in 1.0e-3f64..1.0e6,
        a in -10.0f64..10.0,
        b in -10.0f64..10.0,
    ) {
        prop_assume!(b - a > 1e-3);
        let scaler = FittedScaler::Standard { mean, scale };
        prop_assert!(scaler.inverse(a) < scaler.inverse(b));
    }
}
