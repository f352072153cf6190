//! Artifact loading errors.
//!
//! Every variant is fatal: a process that cannot load its bundle must not
//! start serving estimates.

use std::path::PathBuf;
use thiserror::Error;

/// Bundle load failure.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// File I/O error.
    #[error("failed to read bundle file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not JSON, or its top level is not an object.
    #[error("bundle file {path} is malformed: {reason}")]
    Malformed { path: PathBuf, reason: String },

    /// One or both required entries are absent.
    #[error("bundle file {path} is missing required entries: {}", .keys.join(", "))]
    MissingKeys {
        path: PathBuf,
        keys: Vec<&'static str>,
    },

    /// An entry is present but does not deserialize into its fitted type.
    #[error("failed to decode '{key}' entry of {path}: {source}")]
    Decode {
        path: PathBuf,
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// An entry decoded but its fitted parameters are inconsistent.
    #[error("invalid '{key}' entry: {message}")]
    InvalidArtifact { key: &'static str, message: String },

    /// The file digest differs from the expected one.
    #[error("sha256 mismatch for {path} (expected {expected}, got {actual})")]
    Sha256Mismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },
}

impl ArtifactError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid(key: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidArtifact {
            key,
            message: message.into(),
        }
    }

    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io { path, .. } => {
                format!("Could not read the model bundle at {}.", path.display())
            }
            Self::Malformed { path, .. } | Self::Decode { path, .. } => format!(
                "The model bundle at {} is corrupted or was written by an incompatible exporter.",
                path.display()
            ),
            Self::MissingKeys { path, keys } => format!(
                "The model bundle at {} is incomplete (missing {}).",
                path.display(),
                keys.join(" and ")
            ),
            Self::InvalidArtifact { key, .. } => {
                format!("The fitted '{key}' in the model bundle is inconsistent.")
            }
            Self::Sha256Mismatch { path, .. } => format!(
                "The model bundle at {} does not match the expected checksum.",
                path.display()
            ),
        }
    }
}

/// Result type alias for artifact operations.
pub type Result<T> = std::result::Result<T, ArtifactError>;
