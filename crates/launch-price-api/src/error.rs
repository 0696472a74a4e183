//! Error taxonomy for the inference path and startup loading.
//!
//! Request-side errors (`SchemaError`, `PipelineError`) are recoverable by the
//! caller fixing the request. `ArtifactError` is fatal at startup. Nothing in
//! this crate retries: every operation is a pure function of immutable state.

use std::path::PathBuf;

use thiserror::Error;

use crate::codec::CategoricalField;

/// A single offending request field.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Structural request failure: missing fields, wrong types, out-of-range values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("request failed schema validation ({} field(s))", .violations.len())]
pub struct SchemaError {
    pub violations: Vec<FieldViolation>,
}

/// Failure inside the scorer for an otherwise well-formed feature vector.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PredictorError {
    #[error("feature vector has {got} values, predictor expects {expected}")]
    FeatureCount { expected: usize, got: usize },
    #[error("predictor produced a non-finite value ({0})")]
    NonFinite(f64),
}

/// Errors raised while running a validated record through the pipeline.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PipelineError {
    #[error("unknown {field} '{value}': label was not seen during training")]
    UnknownCategory {
        field: CategoricalField,
        value: String,
    },
    #[error(transparent)]
    Predictor(#[from] PredictorError),
}

/// Fatal startup failure while reading the artifact bundle.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("artifact {} is missing", .path.display())]
    MissingFile { path: PathBuf },
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },
    #[error("invalid artifact {}: {message}", .path.display())]
    Invalid { path: PathBuf, message: String },
    #[error("manifest {} does not match this build: {message}", .path.display())]
    ManifestMismatch { path: PathBuf, message: String },
}

impl ArtifactError {
    pub(crate) fn invalid(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Invalid {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Path of the artifact that failed to load.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::MissingFile { path }
            | Self::Io { path, .. }
            | Self::Parse { path, .. }
            | Self::Invalid { path, .. }
            | Self::ManifestMismatch { path, .. } => path,
        }
    }
}
