//! Error types for dataset loading

use std::path::PathBuf;

use thiserror::Error;

use crate::dataset::DatasetError;

/// Errors that can occur when loading a dataset
#[derive(Error, Debug)]
pub enum LoadError {
    /// Source could not be opened or read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed delimited data
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Malformed JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Top level of a JSON source is not an array of objects
    #[error("Expected a JSON array of objects")]
    NotRecordArray,

    /// A JSON record is not an object or has nested values
    #[error("Record {row} is not a flat object: {reason}")]
    InvalidRecord { row: usize, reason: String },

    /// Loaded columns do not form a valid dataset
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),
}

impl LoadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LoadError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for loading operations
pub type LoadResult<T> = Result<T, LoadError>;
