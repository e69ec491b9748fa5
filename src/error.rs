use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FiaError {
    #[error("I/O error: {source} (path: {path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The dataset does not have the village -> year -> field -> number shape.
    #[error("malformed dataset at {path}: {reason}")]
    Malformed { path: String, reason: String },

    #[error("invalid selection: {0}")]
    InvalidSelection(String),
}

pub type Result<T> = std::result::Result<T, FiaError>;

impl FiaError {
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        FiaError::Io {
            source,
            path: path.into(),
        }
    }

    pub(crate) fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        FiaError::Malformed {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
