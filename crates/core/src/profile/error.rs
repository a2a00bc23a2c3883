//! Error types for profiling

use thiserror::Error;

use crate::dataset::DatasetError;

/// Errors that can occur when selecting columns to profile
///
/// Profiling a column is itself total; only column lookup can fail.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProfileError {
    /// Requested column does not exist
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),
}

/// Result type for profiling operations
pub type ProfileResult<T> = Result<T, ProfileError>;
