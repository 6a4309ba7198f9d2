// Error types for ecoview.
// Covers catalogue fetching, parsing, cache access and the effects layer.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EcoError {
    #[error("HTTP {status} fetching {url}")]
    Fetch { url: String, status: u16 },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Malformed catalogue JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unsupported catalogue shape: {0}")]
    Shape(String),

    #[error("Cache error at {}: {reason}", path.display())]
    Cache { path: PathBuf, reason: String },

    #[error("Catalogue contains no projects")]
    EmptyData,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Effects error: {0}")]
    Effect(String),

    #[error("{0}")]
    Other(String),
}

impl EcoError {
    /// Build a cache error for the given file.
    pub fn cache(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        EcoError::Cache {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether this error means the catalogue could not be obtained at all.
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            EcoError::Fetch { .. }
                | EcoError::Network(_)
                | EcoError::Parse(_)
                | EcoError::Shape(_)
                | EcoError::Io(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, EcoError>;
