//! Fitted artifact bundles for laptop price estimation.
//!
//! A bundle is a JSON object with two entries: `model`, the fitted pipeline,
//! and `scaler`, the fitted target scaling. Loading is fatal on any defect;
//! evaluation errors are per prediction.
//!
//! # Example
//!
//! ```ignore
//! use lps_artifact::{BundleCache, LoadOptions};
//!
//! let cache = BundleCache::new("artifacts/laptop_price_bundle.json", LoadOptions::default());
//! let bundle = cache.get_or_load()?;
//! println!("loaded {} ({})", bundle.source().display(), bundle.sha256());
//! ```
//!
//! # Architecture
//!
//! - `bundle.rs` - file format, loading and structural checks
//! - `cache.rs` - load-once cell shared by every prediction
//! - `pipeline/` - column encoders and estimators
//! - `scaler.rs` - inverse target scaling
//! - `error.rs` - fatal load errors

mod bundle;
mod cache;
mod error;
mod hash;
mod pipeline;
mod scaler;

pub use bundle::{
    ArtifactBundle, LoadOptions, MODEL_KEY, SCALER_KEY, load_bundle, parse_bundle_bytes,
};
pub use cache::BundleCache;
pub use error::{ArtifactError, Result};
pub use hash::sha256_hex;
pub use pipeline::{
    ColumnStep, Estimator, FittedPipeline, ForestModel, HandleUnknown, LinearModel,
    OneHotEncoder, PassthroughColumns, RegressionTree, StandardColumns, TREE_LEAF,
};
pub use scaler::FittedScaler;
