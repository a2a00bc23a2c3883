//! Configuration for feature classification

use serde::{Deserialize, Serialize};

use crate::profile::DatetimeGranularity;
use crate::similarity::DEFAULT_NGRAM_SIZE;

/// Thresholds used to assign distribution, value and length classes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClassifierConfig {
    /// `row_count / distinct_count` at or above which a column is categorical
    pub categorical_ratio: f64,
    /// Share of numeric values at or above which text is treated as numbers
    pub numeric_ratio: f64,
    /// Share of the most common tokens that must repeat for a column to be
    /// token-categorical
    pub token_repeat_fraction: f64,
    /// Average tokens per value up to which strings are short
    pub short_max_tokens: f64,
    /// Average tokens per value up to which strings are phrases
    pub phrase_max_tokens: f64,
    /// Average tokens per value up to which strings are sentences
    pub sentence_max_tokens: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            categorical_ratio: 1.5,
            numeric_ratio: 0.99,
            token_repeat_fraction: 0.5,
            short_max_tokens: 1.5,
            phrase_max_tokens: 5.0,
            sentence_max_tokens: 25.0,
        }
    }
}

impl ClassifierConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the categorical repetition ratio (at least 1)
    pub fn with_categorical_ratio(mut self, ratio: f64) -> Self {
        self.categorical_ratio = ratio.max(1.0);
        self
    }

    /// Set the numeric share threshold
    pub fn with_numeric_ratio(mut self, ratio: f64) -> Self {
        self.numeric_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    /// Set the repeated token share threshold
    pub fn with_token_repeat_fraction(mut self, fraction: f64) -> Self {
        self.token_repeat_fraction = fraction.clamp(0.0, 1.0);
        self
    }

    /// Set the string length tier boundaries (average tokens per value)
    pub fn with_length_tiers(mut self, short: f64, phrase: f64, sentence: f64) -> Self {
        self.short_max_tokens = short.max(0.0);
        self.phrase_max_tokens = phrase.max(self.short_max_tokens);
        self.sentence_max_tokens = sentence.max(self.phrase_max_tokens);
        self
    }
}

/// Parameters baked into the similarity functions a feature ranks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimilarityParams {
    /// Exponent of the numeric decay function
    pub decay_sigma: f64,
    /// Token pairing threshold of hybrid Jaccard
    pub hybrid_inner_threshold: f64,
    /// Resolution for date/time equality
    pub datetime_resolution: DatetimeGranularity,
    /// Character n-gram size
    pub ngram_size: usize,
}

impl Default for SimilarityParams {
    fn default() -> Self {
        Self {
            decay_sigma: 0.5,
            hybrid_inner_threshold: 0.5,
            datetime_resolution: DatetimeGranularity::Hour,
            ngram_size: DEFAULT_NGRAM_SIZE,
        }
    }
}
