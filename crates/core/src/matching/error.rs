//! Error types for pairwise matching

use thiserror::Error;

use crate::blocking::BlockingError;

/// Errors that stop a match attempt before any row is compared
///
/// Data quality never causes these; failed value comparisons score 0.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatchError {
    /// No feature pairs to compare on
    #[error("Matching needs at least one feature pair")]
    NoFeaturePairs,

    /// A feature pair was built from a different dataset than the one given
    #[error("Feature '{feature}' does not belong to the {side} dataset")]
    DatasetMismatch { feature: String, side: &'static str },

    /// Blocking refused the inputs
    #[error("Blocking error: {0}")]
    Blocking(#[from] BlockingError),
}

/// Result type for matching operations
pub type MatchingResult<T> = Result<T, MatchError>;
