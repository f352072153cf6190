//! Price estimation for a single laptop configuration.
//!
//! The service holds two injected capabilities and applies them in sequence:
//!
//! 1. build the single-row feature table from a [`FeatureRecord`]
//! 2. run the pipeline to get the scaled prediction
//! 3. invert the target scaling to get the price
//!
//! Any failure along the way is a [`PredictionError`] for that one request.
//!
//! # Example
//!
//! ```ignore
//! use lps_artifact::{BundleCache, LoadOptions};
//! use lps_predict::PredictionService;
//!
//! let cache = BundleCache::new("artifacts/laptop_price_bundle.json", LoadOptions::default());
//! let service = PredictionService::from_bundle(&cache.get_or_load()?);
//! let result = service.predict(&record)?;
//! println!("{:.2}", result.price);
//! ```
//!
//! [`FeatureRecord`]: lps_model::FeatureRecord

mod error;
mod service;

pub use error::{PredictionError, PredictionStage};
pub use service::PredictionService;
