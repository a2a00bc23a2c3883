//! Join specs: candidate column pairings between two datasets

use serde::{Deserialize, Serialize};

use super::error::{ClassifyError, ClassifyResult};
use crate::dataset::Dataset;

/// One left column group paired with one right column group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnPairing {
    pub left: Vec<usize>,
    pub right: Vec<usize>,
}

/// A candidate way of joining two datasets
///
/// Holds an ordered, non-empty list of column pairings. Each pairing is
/// classified into a [`FeaturePair`](super::FeaturePair) when the spec is
/// evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinSpec {
    pairings: Vec<ColumnPairing>,
}

impl JoinSpec {
    /// Build a spec from parallel lists of left and right column groups
    pub fn new(left: Vec<Vec<usize>>, right: Vec<Vec<usize>>) -> ClassifyResult<Self> {
        if left.len() != right.len() {
            return Err(ClassifyError::MismatchedGroups {
                left: left.len(),
                right: right.len(),
            });
        }
        if left.is_empty() {
            return Err(ClassifyError::EmptyJoinSpec);
        }
        if left.iter().chain(&right).any(Vec::is_empty) {
            return Err(ClassifyError::EmptyColumnGroup);
        }

        let pairings = left
            .into_iter()
            .zip(right)
            .map(|(left, right)| ColumnPairing { left, right })
            .collect();
        Ok(Self { pairings })
    }

    /// Build a spec of single-column features
    pub fn from_columns(left: &[usize], right: &[usize]) -> ClassifyResult<Self> {
        Self::new(
            left.iter().map(|&c| vec![c]).collect(),
            right.iter().map(|&c| vec![c]).collect(),
        )
    }

    /// Build a spec of single-column features from column names
    pub fn by_name(
        left: &Dataset,
        right: &Dataset,
        pairs: &[(&str, &str)],
    ) -> ClassifyResult<Self> {
        let lookup = |dataset: &Dataset, name: &str| {
            dataset
                .column_index(name)
                .ok_or_else(|| ClassifyError::UnknownColumn(name.to_string()))
        };

        let mut left_columns = Vec::with_capacity(pairs.len());
        let mut right_columns = Vec::with_capacity(pairs.len());
        for (l, r) in pairs {
            left_columns.push(lookup(left, l)?);
            right_columns.push(lookup(right, r)?);
        }
        Self::from_columns(&left_columns, &right_columns)
    }

    pub fn pairings(&self) -> &[ColumnPairing] {
        &self.pairings
    }

    /// Number of column pairings
    pub fn len(&self) -> usize {
        self.pairings.len()
    }

    /// Always false for a constructed spec
    pub fn is_empty(&self) -> bool {
        self.pairings.is_empty()
    }

    /// Every left column index referenced, in first-seen order
    pub fn left_columns(&self) -> Vec<usize> {
        unique(self.pairings.iter().flat_map(|p| p.left.iter().copied()))
    }

    /// Every right column index referenced, in first-seen order
    pub fn right_columns(&self) -> Vec<usize> {
        unique(self.pairings.iter().flat_map(|p| p.right.iter().copied()))
    }
}

fn unique(columns: impl Iterator<Item = usize>) -> Vec<usize> {
    let mut seen = Vec::new();
    for column in columns {
        if !seen.contains(&column) {
            seen.push(column);
        }
    }
    seen
}
