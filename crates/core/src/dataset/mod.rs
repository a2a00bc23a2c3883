//! Tabular data model
//!
//! A [`Dataset`] is an ordered list of equally long [`Column`]s. Rows are
//! addressed by a 0-based index that stays stable for the dataset's
//! lifetime; nothing in this crate mutates a dataset in place; joins
//! produce new datasets.

mod error;
mod value;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use error::{DatasetError, DatasetResult};
pub use value::{DATETIME_DISPLAY_FORMAT, Value};

/// Identity of a dataset, used to check that both sides of a feature pair
/// come from different datasets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetId(Uuid);

impl DatasetId {
    /// Allocate a fresh id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DatasetId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DatasetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Physical storage type of a column, derived from its values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    /// Every present value is a number
    Numeric,
    /// Every present value is text
    Text,
    /// Every present value is a date/time
    DateTime,
    /// Present values of more than one kind
    Mixed,
    /// No present values at all
    Empty,
}

impl StorageType {
    /// Derive the storage type from a slice of values
    pub fn infer(values: &[Value]) -> Self {
        let mut seen: Option<StorageType> = None;
        for value in values {
            let kind = match value {
                Value::Number(n) if !n.is_nan() => StorageType::Numeric,
                Value::Text(_) => StorageType::Text,
                Value::DateTime(_) => StorageType::DateTime,
                _ => continue,
            };
            match seen {
                None => seen = Some(kind),
                Some(existing) if existing != kind => return StorageType::Mixed,
                _ => {}
            }
        }
        seen.unwrap_or(StorageType::Empty)
    }

    /// Whether values are stored as numbers
    pub fn is_numeric(&self) -> bool {
        matches!(self, StorageType::Numeric)
    }
}

impl std::fmt::Display for StorageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageType::Numeric => write!(f, "numeric"),
            StorageType::Text => write!(f, "text"),
            StorageType::DateTime => write!(f, "datetime"),
            StorageType::Mixed => write!(f, "mixed"),
            StorageType::Empty => write!(f, "empty"),
        }
    }
}

/// Semantic type declared by dataset metadata (e.g. from a discovery index)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticType {
    /// Quantities, measurements, counts
    Number,
    /// Dates, times, timestamps
    Datetime,
    /// Free or categorical text
    Text,
    /// Anything else (identifiers, geometry, ...)
    Other,
}

/// A named column of scalar values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    name: String,
    values: Vec<Value>,
    storage: StorageType,
    #[serde(skip_serializing_if = "Option::is_none")]
    semantic_hint: Option<SemanticType>,
}

impl Column {
    /// Create a column, deriving its storage type from the values
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        let storage = StorageType::infer(&values);
        Self {
            name: name.into(),
            values,
            storage,
            semantic_hint: None,
        }
    }

    /// Attach a semantic type hint
    pub fn with_semantic_hint(mut self, hint: SemanticType) -> Self {
        self.semantic_hint = Some(hint);
        self
    }

    /// Column name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All values in row order
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Value at a row, if in range
    pub fn get(&self, row: usize) -> Option<&Value> {
        self.values.get(row)
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the column has no rows
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Storage type derived at construction
    pub fn storage(&self) -> StorageType {
        self.storage
    }

    /// Declared semantic type, if any
    pub fn semantic_hint(&self) -> Option<SemanticType> {
        self.semantic_hint
    }

    /// First and last present values, the sample used by type sniffing
    ///
    /// Whitespace-only text counts as missing here, as it does in profiling.
    pub fn boundary_sample(&self) -> Vec<&Value> {
        let present = |v: &&Value| match v {
            Value::Text(s) => !s.trim().is_empty(),
            other => !other.is_missing(),
        };
        let first = self.values.iter().find(present);
        let last = self.values.iter().rev().find(present);
        match (first, last) {
            (Some(a), Some(b)) if std::ptr::eq(a, b) => vec![a],
            (Some(a), Some(b)) => vec![a, b],
            _ => Vec::new(),
        }
    }
}

/// An ordered collection of equally long columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    id: DatasetId,
    name: String,
    columns: Vec<Column>,
    row_count: usize,
}

impl Dataset {
    /// Create a dataset, checking that all columns have the same length and
    /// distinct names
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> DatasetResult<Self> {
        let row_count = columns.first().map(Column::len).unwrap_or(0);
        let mut names = HashSet::new();
        for column in &columns {
            if column.len() != row_count {
                return Err(DatasetError::RaggedColumns {
                    column: column.name().to_string(),
                    expected: row_count,
                    actual: column.len(),
                });
            }
            if !names.insert(column.name()) {
                return Err(DatasetError::DuplicateColumn(column.name().to_string()));
            }
        }

        Ok(Self {
            id: DatasetId::new(),
            name: name.into(),
            columns,
            row_count,
        })
    }

    /// Build a dataset from row-major data
    pub fn from_rows(
        name: impl Into<String>,
        headers: &[&str],
        rows: Vec<Vec<Value>>,
    ) -> DatasetResult<Self> {
        let mut columns: Vec<Vec<Value>> = vec![Vec::with_capacity(rows.len()); headers.len()];
        for (row_idx, row) in rows.into_iter().enumerate() {
            if row.len() != headers.len() {
                return Err(DatasetError::RaggedRow {
                    row: row_idx,
                    expected: headers.len(),
                    actual: row.len(),
                });
            }
            for (col_idx, value) in row.into_iter().enumerate() {
                columns[col_idx].push(value);
            }
        }

        let columns = headers
            .iter()
            .zip(columns)
            .map(|(name, values)| Column::new(*name, values))
            .collect();
        Self::new(name, columns)
    }

    /// Dataset identity
    pub fn id(&self) -> DatasetId {
        self.id
    }

    /// Dataset name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All columns in order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column at an index
    pub fn column(&self, index: usize) -> DatasetResult<&Column> {
        self.columns
            .get(index)
            .ok_or(DatasetError::ColumnOutOfRange {
                index,
                count: self.columns.len(),
            })
    }

    /// Index of the column with the given name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name() == name)
    }

    /// Whether a column with this name exists
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Cell at (row, column)
    pub fn value(&self, row: usize, column: usize) -> Option<&Value> {
        self.columns.get(column).and_then(|c| c.get(row))
    }

    /// Replace the semantic hint of a column, returning a new dataset with the
    /// same identity
    pub fn with_semantic_hint(mut self, column: usize, hint: SemanticType) -> DatasetResult<Self> {
        let count = self.columns.len();
        let col = self
            .columns
            .get_mut(column)
            .ok_or(DatasetError::ColumnOutOfRange {
                index: column,
                count,
            })?;
        col.semantic_hint = Some(hint);
        Ok(self)
    }
}
