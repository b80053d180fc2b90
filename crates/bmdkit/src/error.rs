//! Error types for the bmdkit library.

use std::path::PathBuf;
use thiserror::Error;

use crate::validation::ValidationErrors;

/// Main error type for bmdkit operations.
#[derive(Debug, Error)]
pub enum BmdsError {
    /// Payload failed schema or range checks. Carries every violation found.
    #[error("{0}")]
    Validation(ValidationErrors),

    /// Dataset type tag outside the recognized set for the operation.
    #[error("Unknown dataset type: {0}")]
    UnknownDatasetType(String),

    /// Prior class tag outside the closed three-value set.
    #[error("Unknown prior class: {0}")]
    UnknownPriorClass(String),

    /// Adverse direction wire value outside {-1, 0, 1}.
    #[error("Unknown adverse direction: {0}")]
    UnknownAdverseDirection(i64),

    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl BmdsError {
    /// Field violations, when this is a validation failure.
    pub fn violations(&self) -> Option<&ValidationErrors> {
        match self {
            BmdsError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for BmdsError {
    fn from(errors: ValidationErrors) -> Self {
        BmdsError::Validation(errors)
    }
}

/// Result type alias for bmdkit operations.
pub type Result<T> = std::result::Result<T, BmdsError>;
