//! Error types for join evaluation
//!
//! A `JoinError` ends one join spec evaluation; the orchestrator records
//! it in the report and carries on with the remaining specs.

use thiserror::Error;

use crate::dataset::DatasetError;
use crate::feature::ClassifyError;
use crate::matching::MatchError;
use crate::profile::ProfileError;

/// Errors that can occur while evaluating one join spec
#[derive(Error, Debug, Clone, PartialEq)]
pub enum JoinError {
    /// Column selection for profiling failed
    #[error("Profiling failed: {0}")]
    Profile(#[from] ProfileError),

    /// Features could not be built
    #[error("Classification failed: {0}")]
    Classify(#[from] ClassifyError),

    /// Matching refused the inputs
    #[error("Matching failed: {0}")]
    Match(#[from] MatchError),

    /// The merged table could not be built
    #[error("Assembly failed: {0}")]
    Dataset(#[from] DatasetError),

    /// Evaluation was not started because of cancellation or timeout
    #[error("Join spec evaluation cancelled")]
    Cancelled,
}

/// Result type for join spec evaluation
pub type EvaluationResult<T> = Result<T, JoinError>;

impl JoinError {
    /// Whether the spec was skipped rather than evaluated
    pub fn is_cancelled(&self) -> bool {
        matches!(self, JoinError::Cancelled)
    }

    /// Get a user-friendly error message for CLI output
    pub fn user_message(&self) -> String {
        match self {
            JoinError::Classify(ClassifyError::NoDatetimeValues(column)) => {
                format!(
                    "Column '{column}' has no date/time values.\n\nHint: Remove the date/time hint or pick another join column."
                )
            }
            JoinError::Classify(ClassifyError::SameDataset(_)) => {
                "Both sides of the join are the same dataset.\n\nHint: Load the right-hand table separately.".to_string()
            }
            JoinError::Classify(ClassifyError::UnknownColumn(column)) => {
                format!(
                    "Unknown column '{column}'.\n\nHint: Check the column names in the join spec."
                )
            }
            JoinError::Match(MatchError::Blocking(err)) => {
                format!(
                    "{err}\n\nHint: Join on a text column so rows can be blocked, or raise maxUnblockedComparisons."
                )
            }
            JoinError::Cancelled => {
                "Join cancelled before this spec started.\n\nHint: Increase the timeout.".to_string()
            }
            _ => self.to_string(),
        }
    }
}
