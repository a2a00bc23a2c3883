//! Error types for blocking

use thiserror::Error;

/// Errors raised while building a blocking index
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlockingError {
    /// No blocking key applies and the full cross product is too large
    #[error(
        "No blocking key applies and {left} x {right} rows exceeds the limit of {limit} comparisons"
    )]
    CrossProductTooLarge {
        left: usize,
        right: usize,
        limit: usize,
    },
}

/// Result type for blocking operations
pub type BlockingResult<T> = Result<T, BlockingError>;
