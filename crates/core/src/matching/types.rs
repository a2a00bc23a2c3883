//! Match result types

use serde::{Deserialize, Serialize};

use crate::blocking::BlockingStrategy;

/// Row correspondences found for one join spec
///
/// Every left row and every right row appears in at most one pair. Pairs
/// are ordered by left row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    /// `(left_row, right_row)` pairs
    pub pairs: Vec<(usize, usize)>,
    /// Number of rows in the left dataset
    pub left_rows: usize,
    /// `matched left rows / left rows`; `None` when no match was attempted
    pub coverage: Option<f64>,
    /// Candidate comparisons performed
    pub comparisons: usize,
    /// Blocking used, `None` when no match was attempted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<BlockingStrategy>,
}

impl MatchResult {
    /// Result of a completed match attempt
    pub fn new(
        pairs: Vec<(usize, usize)>,
        left_rows: usize,
        comparisons: usize,
        strategy: BlockingStrategy,
    ) -> Self {
        let coverage = if left_rows == 0 {
            0.0
        } else {
            pairs.len() as f64 / left_rows as f64
        };
        Self {
            pairs,
            left_rows,
            coverage: Some(coverage),
            comparisons,
            strategy: Some(strategy),
        }
    }

    /// No match attempted; coverage is undefined
    pub fn empty(left_rows: usize) -> Self {
        Self {
            pairs: Vec::new(),
            left_rows,
            coverage: None,
            comparisons: 0,
            strategy: None,
        }
    }

    /// Whether no pair was found
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Number of matched left rows
    pub fn matched(&self) -> usize {
        self.pairs.len()
    }

    /// Right row matched to each left row, indexed by left row
    pub fn right_rows_by_left(&self) -> Vec<Option<usize>> {
        let mut by_left = vec![None; self.left_rows];
        for &(left, right) in &self.pairs {
            if let Some(slot) = by_left.get_mut(left) {
                *slot = Some(right);
            }
        }
        by_left
    }
}
