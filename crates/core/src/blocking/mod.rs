//! Blocking index
//!
//! Partitions the rows of both datasets into buckets keyed by a cheap,
//! feature-derived key so that the matcher only compares rows sharing a
//! key. Blocks are rebuilt for every join spec, since the key depends on
//! which feature pairs the spec uses.
//!
//! Strategy selection, first applicable wins:
//!
//! 1. **Categorical hash** - some pair is categorical/string on both sides;
//!    the key is the lower-cased merged values of all such pairs.
//! 2. **First character** - some pair is non-categorical/string on both
//!    sides and `|left| × |right|` exceeds `first_char_min_product`; the key
//!    is the lower-cased first character of each such pair's merged value.
//! 3. **None** - every left row is compared with every right row, refused
//!    when `|left| × |right|` exceeds `max_unblocked_comparisons`.

mod error;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dataset::Dataset;
use crate::feature::{FeaturePair, FeatureSpec};

pub use error::{BlockingError, BlockingResult};

/// Key separator between the values of several pairs
const KEY_SEPARATOR: char = '\u{1f}';

/// Block key → ascending row indices of one dataset
pub type Block = BTreeMap<String, Vec<usize>>;

/// How rows were partitioned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockingStrategy {
    CategoricalHash,
    FirstCharacter,
    None,
}

impl std::fmt::Display for BlockingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CategoricalHash => write!(f, "categorical-hash"),
            Self::FirstCharacter => write!(f, "first-character"),
            Self::None => write!(f, "none"),
        }
    }
}

/// Size limits for blocking decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlockingConfig {
    /// Row-count product above which first-character blocking is used
    pub first_char_min_product: usize,
    /// Row-count product above which unblocked matching is refused
    pub max_unblocked_comparisons: usize,
}

impl Default for BlockingConfig {
    fn default() -> Self {
        Self {
            first_char_min_product: 10_000,
            max_unblocked_comparisons: 25_000_000,
        }
    }
}

/// Blocks of both sides plus each left row's key
#[derive(Debug, Clone, PartialEq)]
pub struct BlockingIndex {
    strategy: BlockingStrategy,
    left: Block,
    right: Block,
    left_keys: Vec<Option<String>>,
}

impl BlockingIndex {
    /// Choose a strategy and build blocks for one join spec
    pub fn build(
        left: &Dataset,
        right: &Dataset,
        pairs: &[FeaturePair],
        config: &BlockingConfig,
    ) -> BlockingResult<Self> {
        let strategy = select_strategy(left.row_count(), right.row_count(), pairs, config);

        let index = match strategy {
            BlockingStrategy::None => {
                let product = left.row_count().saturating_mul(right.row_count());
                if product > config.max_unblocked_comparisons {
                    return Err(BlockingError::CrossProductTooLarge {
                        left: left.row_count(),
                        right: right.row_count(),
                        limit: config.max_unblocked_comparisons,
                    });
                }
                Self {
                    strategy,
                    left: Block::new(),
                    right: Block::new(),
                    left_keys: Vec::new(),
                }
            }
            BlockingStrategy::CategoricalHash | BlockingStrategy::FirstCharacter => {
                let active: Vec<&FeaturePair> = pairs
                    .iter()
                    .filter(|pair| match strategy {
                        BlockingStrategy::CategoricalHash => pair.is_categorical_string(),
                        _ => pair.is_free_string(),
                    })
                    .collect();
                let first_char = strategy == BlockingStrategy::FirstCharacter;

                let left_features: Vec<&FeatureSpec> = active.iter().map(|p| p.left()).collect();
                let right_features: Vec<&FeatureSpec> = active.iter().map(|p| p.right()).collect();
                let left_keys = row_keys(left, &left_features, first_char);
                let right_keys = row_keys(right, &right_features, first_char);

                Self {
                    strategy,
                    left: group(&left_keys),
                    right: group(&right_keys),
                    left_keys,
                }
            }
        };

        debug!(
            strategy = %index.strategy,
            left_blocks = index.left.len(),
            right_blocks = index.right.len(),
            "Built blocking index"
        );
        Ok(index)
    }

    pub fn strategy(&self) -> BlockingStrategy {
        self.strategy
    }

    /// Whether rows are partitioned at all
    pub fn is_blocked(&self) -> bool {
        self.strategy != BlockingStrategy::None
    }

    pub fn left_blocks(&self) -> &Block {
        &self.left
    }

    pub fn right_blocks(&self) -> &Block {
        &self.right
    }

    /// Block key of a left row; `None` when blocked and the row has no key
    pub fn left_key(&self, row: usize) -> Option<&str> {
        self.left_keys.get(row).and_then(|key| key.as_deref())
    }

    /// Right rows sharing the left row's block, in ascending order
    ///
    /// Unblocked indexes return `None`, meaning every right row.
    pub fn candidates(&self, left_row: usize) -> Option<&[usize]> {
        if !self.is_blocked() {
            return None;
        }
        Some(
            self.left_key(left_row)
                .and_then(|key| self.right.get(key))
                .map_or(&[][..], Vec::as_slice),
        )
    }

    /// Consume the index, returning the block pair (absent when unblocked)
    pub fn into_blocks(self) -> Option<(Block, Block)> {
        if self.is_blocked() {
            Some((self.left, self.right))
        } else {
            None
        }
    }
}

/// Pick the blocking strategy for a set of feature pairs
pub fn select_strategy(
    left_rows: usize,
    right_rows: usize,
    pairs: &[FeaturePair],
    config: &BlockingConfig,
) -> BlockingStrategy {
    if pairs.iter().any(FeaturePair::is_categorical_string) {
        return BlockingStrategy::CategoricalHash;
    }
    let product = left_rows.saturating_mul(right_rows);
    if pairs.iter().any(FeaturePair::is_free_string) && product > config.first_char_min_product {
        return BlockingStrategy::FirstCharacter;
    }
    BlockingStrategy::None
}

/// Build the block pair for a set of feature pairs, `None` when no
/// blocking applies
pub fn build_blocks(
    left: &Dataset,
    right: &Dataset,
    pairs: &[FeaturePair],
    config: &BlockingConfig,
) -> BlockingResult<Option<(Block, Block)>> {
    BlockingIndex::build(left, right, pairs, config).map(BlockingIndex::into_blocks)
}

fn row_keys(dataset: &Dataset, features: &[&FeatureSpec], first_char: bool) -> Vec<Option<String>> {
    (0..dataset.row_count())
        .map(|row| {
            let mut key = String::new();
            for (i, feature) in features.iter().enumerate() {
                let value = feature.merged_value(dataset, row)?.to_lowercase();
                if i > 0 {
                    key.push(KEY_SEPARATOR);
                }
                if first_char {
                    key.extend(value.chars().next());
                } else {
                    key.push_str(&value);
                }
            }
            Some(key)
        })
        .collect()
}

fn group(keys: &[Option<String>]) -> Block {
    let mut block = Block::new();
    for (row, key) in keys.iter().enumerate() {
        if let Some(key) = key {
            block.entry(key.clone()).or_default().push(row);
        }
    }
    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Value;
    use crate::feature::{DistributionClass, ValueClass};

    fn single(dataset: &Dataset, distribution: DistributionClass) -> FeatureSpec {
        FeatureSpec::new(dataset, vec![0], distribution, ValueClass::String).unwrap()
    }

    fn datasets() -> (Dataset, Dataset) {
        let left = Dataset::from_rows(
            "l",
            &["city"],
            vec![
                vec![Value::from("New York")],
                vec![Value::from("Boston")],
                vec![Value::Null],
                vec![Value::from("new york")],
            ],
        )
        .unwrap();
        let right = Dataset::from_rows(
            "r",
            &["city"],
            vec![
                vec![Value::from("boston")],
                vec![Value::from("NEW YORK")],
                vec![Value::from("Chicago")],
            ],
        )
        .unwrap();
        (left, right)
    }

    #[test]
    fn test_categorical_hash_blocks() {
        let (left, right) = datasets();
        let pair = FeaturePair::new(
            single(&left, DistributionClass::Categorical),
            single(&right, DistributionClass::Categorical),
        )
        .unwrap();

        let index =
            BlockingIndex::build(&left, &right, &[pair], &BlockingConfig::default()).unwrap();
        assert_eq!(index.strategy(), BlockingStrategy::CategoricalHash);
        assert_eq!(index.left_blocks()["new york"], vec![0, 3]);
        assert_eq!(index.right_blocks()["new york"], vec![1]);
        assert_eq!(index.candidates(0), Some(&[1][..]));
        assert_eq!(index.candidates(2), Some(&[][..]));
        assert_eq!(index.left_key(2), None);
    }

    #[test]
    fn test_first_character_blocks_need_large_product() {
        let (left, right) = datasets();
        let pair = FeaturePair::new(
            single(&left, DistributionClass::NonCategorical),
            single(&right, DistributionClass::NonCategorical),
        )
        .unwrap();

        let small = BlockingConfig::default();
        assert_eq!(
            select_strategy(4, 3, std::slice::from_ref(&pair), &small),
            BlockingStrategy::None
        );
        assert_eq!(
            select_strategy(200, 100, std::slice::from_ref(&pair), &small),
            BlockingStrategy::FirstCharacter
        );

        let config = BlockingConfig {
            first_char_min_product: 1,
            ..BlockingConfig::default()
        };
        let (l, r) = build_blocks(&left, &right, &[pair], &config).unwrap().unwrap();
        assert_eq!(l["n"], vec![0, 3]);
        assert_eq!(l["b"], vec![1]);
        assert_eq!(r["c"], vec![2]);
    }

    #[test]
    fn test_unblocked_size_guard() {
        let (left, right) = datasets();
        let pair = FeaturePair::new(
            FeatureSpec::new(&left, vec![0], DistributionClass::NonCategorical, ValueClass::Number)
                .unwrap(),
            FeatureSpec::new(&right, vec![0], DistributionClass::NonCategorical, ValueClass::Number)
                .unwrap(),
        )
        .unwrap();

        let config = BlockingConfig {
            max_unblocked_comparisons: 5,
            ..BlockingConfig::default()
        };
        let err = BlockingIndex::build(&left, &right, std::slice::from_ref(&pair), &config)
            .unwrap_err();
        assert!(matches!(err, BlockingError::CrossProductTooLarge { left: 4, right: 3, .. }));

        let blocks = build_blocks(&left, &right, &[pair], &BlockingConfig::default()).unwrap();
        assert!(blocks.is_none());
    }
}
