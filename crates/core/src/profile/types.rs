//! Column profile digest types

use serde::{Deserialize, Serialize};

use crate::dataset::StorageType;

/// Statistical digest of one column
///
/// Computed once per column taking part in a join attempt and never
/// modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnProfile {
    /// Name of the profiled column
    pub column_name: String,
    /// Storage type of the column
    pub storage: StorageType,
    /// Total rows, missing included
    pub row_count: usize,
    /// Null/NaN cells plus text cells that are empty after trimming
    pub missing_count: usize,
    /// Distinct present values (trimmed, stringified)
    pub distinct_count: usize,
    /// `distinct_count / present values` (0 when nothing is present)
    pub distinct_ratio: f64,
    /// Present values that parse as a number
    pub numeric_count: usize,
    /// `numeric_count / present values` (0 when nothing is present)
    pub ratio_of_numeric_values: f64,
    /// Leading/trailing whitespace statistics
    pub whitespace: WhitespaceStats,
    /// Digits divided by non-whitespace characters over present values
    pub numeric_char_density: f64,
    /// Mean character length of present values after trimming
    pub avg_char_length: f64,
    /// Numeric section, absent without numeric values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric: Option<NumericStats>,
    /// Whitespace tokens, absent without present values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens: Option<TokenStats>,
    /// Tokens split on whitespace and punctuation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub punctuation_tokens: Option<TokenStats>,
    /// Punctuation mark usage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub punctuation: Option<PunctuationStats>,
    /// Dominant language tag of sampled values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl ColumnProfile {
    /// Profile of a column with no rows at all
    pub fn empty(column_name: impl Into<String>, storage: StorageType) -> Self {
        Self {
            column_name: column_name.into(),
            storage,
            row_count: 0,
            missing_count: 0,
            distinct_count: 0,
            distinct_ratio: 0.0,
            numeric_count: 0,
            ratio_of_numeric_values: 0.0,
            whitespace: WhitespaceStats::default(),
            numeric_char_density: 0.0,
            avg_char_length: 0.0,
            numeric: None,
            tokens: None,
            punctuation_tokens: None,
            punctuation: None,
            language: None,
        }
    }

    /// Number of present (non-missing) values
    pub fn present_count(&self) -> usize {
        self.row_count - self.missing_count
    }

    /// Rows per distinct value, `None` when nothing is present
    pub fn repetition_ratio(&self) -> Option<f64> {
        if self.distinct_count == 0 {
            None
        } else {
            Some(self.row_count as f64 / self.distinct_count as f64)
        }
    }

    /// Fraction of missing rows
    pub fn missing_ratio(&self) -> f64 {
        if self.row_count == 0 {
            0.0
        } else {
            self.missing_count as f64 / self.row_count as f64
        }
    }
}

/// Whitespace statistics over text cells
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhitespaceStats {
    /// Cells with leading whitespace
    pub leading: usize,
    /// Cells with trailing whitespace
    pub trailing: usize,
    /// Cells that became empty after trimming and were counted as missing
    pub emptied: usize,
}

/// Numeric summary over present numeric values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumericStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
    /// Values further than `outlier_sigma` standard deviations from the mean
    pub outlier_count: usize,
}

impl NumericStats {
    /// `max - min`
    pub fn range(&self) -> f64 {
        self.max - self.min
    }
}

/// A token and how often it occurred
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCount {
    pub token: String,
    pub count: usize,
}

/// Token frequency summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenStats {
    /// Token occurrences
    pub token_count: usize,
    /// Distinct tokens
    pub distinct_count: usize,
    /// `distinct_count / token_count`
    pub distinct_ratio: f64,
    /// Mean tokens per present value
    pub avg_tokens_per_value: f64,
    /// Token occurrences containing at least one digit
    pub with_digit_count: usize,
    /// Top-k tokens by count, ties broken alphabetically
    pub most_common: Vec<TokenCount>,
}

impl TokenStats {
    /// How many of the most common tokens occur at least `min_count` times
    pub fn repeated_top_tokens(&self, min_count: usize) -> usize {
        self.most_common
            .iter()
            .filter(|t| t.count >= min_count)
            .count()
    }
}

/// Punctuation usage summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PunctuationStats {
    /// Present values containing at least one punctuation mark
    pub values_with_punctuation: usize,
    /// Total punctuation marks
    pub mark_count: usize,
    /// Marks per present value
    pub marks_per_value: f64,
    /// Top-k marks by count
    pub most_common: Vec<TokenCount>,
}
