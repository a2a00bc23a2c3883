//! Configuration for pairwise matching

use serde::{Deserialize, Serialize};

use crate::blocking::BlockingConfig;
use crate::feature::SimilarityParams;
use crate::profile::DatetimeGranularity;
use crate::similarity::DEFAULT_NGRAM_SIZE;

/// Configuration for pairwise matching
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchConfig {
    /// Acceptance threshold for fuzzy similarity functions (0.0-1.0)
    pub fuzzy_threshold: f64,
    /// Exponent of the numeric decay function
    pub decay_sigma: f64,
    /// Default resolution for date/time equality
    pub datetime_resolution: DatetimeGranularity,
    /// Token pairing threshold of hybrid Jaccard (0.0-1.0)
    pub hybrid_inner_threshold: f64,
    /// Character n-gram size
    pub ngram_size: usize,
    /// Row-count product above which first-character blocking kicks in
    pub first_char_min_product: usize,
    /// Row-count product above which unblocked matching is refused
    pub max_unblocked_comparisons: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        let blocking = BlockingConfig::default();
        Self {
            fuzzy_threshold: 0.5,
            decay_sigma: 0.5,
            datetime_resolution: DatetimeGranularity::Hour,
            hybrid_inner_threshold: 0.5,
            ngram_size: DEFAULT_NGRAM_SIZE,
            first_char_min_product: blocking.first_char_min_product,
            max_unblocked_comparisons: blocking.max_unblocked_comparisons,
        }
    }
}

impl MatchConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fuzzy acceptance threshold
    pub fn with_fuzzy_threshold(mut self, threshold: f64) -> Self {
        self.fuzzy_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Set the numeric decay exponent
    pub fn with_decay_sigma(mut self, sigma: f64) -> Self {
        self.decay_sigma = sigma.max(0.0);
        self
    }

    /// Set the default date/time resolution
    pub fn with_datetime_resolution(mut self, resolution: DatetimeGranularity) -> Self {
        self.datetime_resolution = resolution;
        self
    }

    /// Set the hybrid Jaccard token threshold
    pub fn with_hybrid_inner_threshold(mut self, threshold: f64) -> Self {
        self.hybrid_inner_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Set the n-gram size (at least 1)
    pub fn with_ngram_size(mut self, n: usize) -> Self {
        self.ngram_size = n.max(1);
        self
    }

    /// Set the product above which first-character blocking is used
    pub fn with_first_char_min_product(mut self, product: usize) -> Self {
        self.first_char_min_product = product;
        self
    }

    /// Set the unblocked comparison limit
    pub fn with_max_unblocked_comparisons(mut self, limit: usize) -> Self {
        self.max_unblocked_comparisons = limit;
        self
    }

    /// Parameters for ranking similarity functions
    pub fn similarity_params(&self) -> SimilarityParams {
        SimilarityParams {
            decay_sigma: self.decay_sigma,
            hybrid_inner_threshold: self.hybrid_inner_threshold,
            datetime_resolution: self.datetime_resolution,
            ngram_size: self.ngram_size,
        }
    }

    /// Limits for blocking decisions
    pub fn blocking_config(&self) -> BlockingConfig {
        BlockingConfig {
            first_char_min_product: self.first_char_min_product,
            max_unblocked_comparisons: self.max_unblocked_comparisons,
        }
    }
}
