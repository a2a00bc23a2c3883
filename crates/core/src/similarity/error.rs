//! Error types for value comparison

use thiserror::Error;

/// Errors raised while scoring one value pair
///
/// These never leave the matcher: a failed comparison scores 0.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimilarityError {
    /// Value could not be read as a number
    #[error("Value is not numeric: {0}")]
    NotNumeric(String),

    /// Value could not be read as a date/time
    #[error("Value is not a date/time: {0}")]
    NotDatetime(String),
}

/// Result type for similarity scoring
pub type SimilarityResult<T> = Result<T, SimilarityError>;
