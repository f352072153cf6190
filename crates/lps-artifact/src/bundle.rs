//! Bundle file format and loading.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use lps_model::{InverseScaler, PricePipeline};

use crate::error::{ArtifactError, Result};
use crate::hash::sha256_hex;
use crate::pipeline::FittedPipeline;
use crate::scaler::FittedScaler;

/// Entry holding the fitted pipeline.
pub const MODEL_KEY: &str = "model";
/// Entry holding the fitted target scaling.
pub const SCALER_KEY: &str = "scaler";

/// Options applied while loading a bundle.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Lowercase or uppercase hex SHA-256 the file must match.
    pub expected_sha256: Option<String>,
}

impl LoadOptions {
    #[must_use]
    pub fn with_expected_sha256(mut self, digest: impl Into<String>) -> Self {
        self.expected_sha256 = Some(digest.into());
        self
    }
}

/// A loaded, checked pair of fitted pipeline and target scaling.
///
/// Nothing in a bundle changes after construction, so clones and handles can
/// be shared across threads freely.
#[derive(Debug, Clone)]
pub struct ArtifactBundle {
    pipeline: Arc<FittedPipeline>,
    scaler: Arc<FittedScaler>,
    source: Option<PathBuf>,
    sha256: Option<String>,
}

impl ArtifactBundle {
    /// Builds a bundle from fitted parts, applying the same checks as loading.
    pub fn from_parts(pipeline: FittedPipeline, scaler: FittedScaler) -> Result<Self> {
        pipeline.check()?;
        scaler.check()?;
        Ok(Self {
            pipeline: Arc::new(pipeline),
            scaler: Arc::new(scaler),
            source: None,
            sha256: None,
        })
    }

    pub fn pipeline(&self) -> &FittedPipeline {
        &self.pipeline
    }

    pub fn scaler(&self) -> &FittedScaler {
        &self.scaler
    }

    /// Shared handle to the pipeline capability.
    pub fn pipeline_handle(&self) -> Arc<dyn PricePipeline> {
        self.pipeline.clone()
    }

    /// Shared handle to the inverse scaling capability.
    pub fn scaler_handle(&self) -> Arc<dyn InverseScaler> {
        self.scaler.clone()
    }

    /// File the bundle was read from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Hex SHA-256 of the file the bundle was read from, if any.
    pub fn sha256(&self) -> Option<&str> {
        self.sha256.as_deref()
    }
}

/// Reads, verifies and decodes a bundle file.
pub fn load_bundle(path: impl AsRef<Path>, options: &LoadOptions) -> Result<ArtifactBundle> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| ArtifactError::io(path, e))?;
    let digest = sha256_hex(&bytes);
    if let Some(expected) = &options.expected_sha256
        && !expected.trim().eq_ignore_ascii_case(&digest)
    {
        return Err(ArtifactError::Sha256Mismatch {
            path: path.to_path_buf(),
            expected: expected.trim().to_lowercase(),
            actual: digest,
        });
    }
    let bundle = decode(&bytes, path, digest)?;
    info!(
        path = %path.display(),
        sha256 = bundle.sha256().unwrap_or_default(),
        estimator = bundle.pipeline().estimator.kind_name(),
        scaler = bundle.scaler().kind_name(),
        "Loaded model bundle"
    );
    Ok(bundle)
}

/// Decodes bundle bytes; `path` is used for error messages and provenance.
pub fn parse_bundle_bytes(bytes: &[u8], path: &Path) -> Result<ArtifactBundle> {
    decode(bytes, path, sha256_hex(bytes))
}

fn decode(bytes: &[u8], path: &Path, digest: String) -> Result<ArtifactBundle> {
    let value: Value = serde_json::from_slice(bytes).map_err(|e| ArtifactError::Malformed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let Value::Object(mut entries) = value else {
        return Err(ArtifactError::Malformed {
            path: path.to_path_buf(),
            reason: "top-level value is not an object".to_string(),
        });
    };

    let (model, scaler) = match (entries.remove(MODEL_KEY), entries.remove(SCALER_KEY)) {
        (Some(model), Some(scaler)) => (model, scaler),
        (model, scaler) => {
            let mut keys = Vec::new();
            if model.is_none() {
                keys.push(MODEL_KEY);
            }
            if scaler.is_none() {
                keys.push(SCALER_KEY);
            }
            return Err(ArtifactError::MissingKeys {
                path: path.to_path_buf(),
                keys,
            });
        }
    };
    for key in entries.keys() {
        warn!(key = %key, path = %path.display(), "Ignoring unexpected bundle entry");
    }

    let pipeline: FittedPipeline =
        serde_json::from_value(model).map_err(|source| ArtifactError::Decode {
            path: path.to_path_buf(),
            key: MODEL_KEY,
            source,
        })?;
    let scaler: FittedScaler =
        serde_json::from_value(scaler).map_err(|source| ArtifactError::Decode {
            path: path.to_path_buf(),
            key: SCALER_KEY,
            source,
        })?;

    let mut bundle = ArtifactBundle::from_parts(pipeline, scaler)?;
    bundle.source = Some(path.to_path_buf());
    bundle.sha256 = Some(digest);
    Ok(bundle)
}
