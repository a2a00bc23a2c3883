//! Error types for dataset construction

use thiserror::Error;

/// Errors raised when a dataset violates the column/row model
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DatasetError {
    /// Columns of different length
    #[error("Column '{column}' has {actual} rows, expected {expected}")]
    RaggedColumns {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// Two columns share a name
    #[error("Duplicate column name: {0}")]
    DuplicateColumn(String),

    /// Column index out of range
    #[error("Column index {index} out of range (dataset has {count} columns)")]
    ColumnOutOfRange { index: usize, count: usize },

    /// Row has a different width than the header
    #[error("Row {row} has {actual} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

/// Result type for dataset operations
pub type DatasetResult<T> = Result<T, DatasetError>;
