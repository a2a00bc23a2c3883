//! Error types for feature classification and join spec construction

use thiserror::Error;

use crate::dataset::DatasetError;

/// Errors raised while building features, feature pairs or join specs
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassifyError {
    /// A feature needs at least one column
    #[error("A feature needs at least one column")]
    EmptyColumnGroup,

    /// Referenced column is missing from the dataset
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    /// No profile was supplied for a referenced column
    #[error("No profile for column index {0}")]
    MissingProfile(usize),

    /// A date/time feature whose sampled values contain no date/time
    #[error("Column '{0}' is declared as date/time but has no parseable date/time values")]
    NoDatetimeValues(String),

    /// Both sides of a feature pair come from the same dataset
    #[error("Both sides of a feature pair belong to dataset {0}")]
    SameDataset(String),

    /// A join spec without any column pairing
    #[error("A join spec needs at least one feature pair")]
    EmptyJoinSpec,

    /// Left and right column group lists differ in length
    #[error("Mismatched join spec: {left} left column groups vs {right} right column groups")]
    MismatchedGroups { left: usize, right: usize },

    /// Feature pairs of one join spec reference different datasets
    #[error("Feature pairs of a join spec must all reference the same two datasets")]
    MixedDatasets,

    /// Column name not found while building a spec by name
    #[error("Unknown column '{0}'")]
    UnknownColumn(String),
}

/// Result type for classification operations
pub type ClassifyResult<T> = Result<T, ClassifyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ClassifyError::MismatchedGroups { left: 2, right: 1 };
        assert!(err.to_string().contains("2 left"));

        let err: ClassifyError = DatasetError::DuplicateColumn("a".to_string()).into();
        assert!(matches!(err, ClassifyError::Dataset(_)));
    }
}
