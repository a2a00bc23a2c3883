//! Similarity functions for comparing merged feature values
//!
//! Every function maps a pair of values to a score in `[0, 1]`. Exact
//! functions only ever return 0 or 1 and must reach 1 to accept; fuzzy
//! functions accept at a configurable threshold.

mod error;
mod string;
mod tfidf;
mod token;

use serde::{Deserialize, Serialize};

use crate::profile::{DatetimeGranularity, parse_datetime};

pub use error::{SimilarityError, SimilarityResult};
pub use string::{
    char_ngrams, jaro_similarity, jaro_winkler_similarity, levenshtein_distance,
    levenshtein_similarity, ngram_similarity,
};
pub use tfidf::TfIdfCorpus;
pub use token::{cosine_similarity, hybrid_jaccard_similarity, jaccard_similarity, tokenize};

/// Character n-gram size used by [`SimilarityFunction::NGram`]
pub const DEFAULT_NGRAM_SIZE: usize = 3;

/// A comparison between two merged feature values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SimilarityFunction {
    /// Case-insensitive equality of the trimmed values
    ExactMatch,
    /// Jaccard over lower-cased word token sets
    Jaccard,
    /// Cosine over lower-cased word token sets
    Cosine,
    /// `(1 - |a - b| / range)^sigma`; a zero range means numeric equality
    NumericDecay { range: f64, sigma: f64 },
    /// Normalised Levenshtein similarity
    Levenshtein,
    /// Jaro-Winkler similarity
    JaroWinkler,
    /// Dice coefficient over character n-grams
    NGram { n: usize },
    /// Token Jaccard with Jaro-Winkler token pairing
    HybridJaccard { inner_threshold: f64 },
    /// Weighted Jaccard over TF-IDF token weights
    TfIdf,
    /// Cosine over TF-IDF token weights
    TfIdfCosine,
    /// Date/time equality after truncation to a resolution
    DatetimeExact { resolution: DatetimeGranularity },
}

impl SimilarityFunction {
    /// Short name for logs and reports
    pub fn name(&self) -> &'static str {
        match self {
            Self::ExactMatch => "exact",
            Self::Jaccard => "jaccard",
            Self::Cosine => "cosine",
            Self::NumericDecay { .. } => "numeric_decay",
            Self::Levenshtein => "levenshtein",
            Self::JaroWinkler => "jaro_winkler",
            Self::NGram { .. } => "ngram",
            Self::HybridJaccard { .. } => "hybrid_jaccard",
            Self::TfIdf => "tfidf",
            Self::TfIdfCosine => "tfidf_cosine",
            Self::DatetimeExact { .. } => "datetime_exact",
        }
    }

    /// Whether the function only accepts a perfect score
    pub fn is_exact(&self) -> bool {
        matches!(self, Self::ExactMatch | Self::DatetimeExact { .. })
    }

    /// Whether scoring needs a [`TfIdfCorpus`]
    pub fn needs_corpus(&self) -> bool {
        matches!(self, Self::TfIdf | Self::TfIdfCosine)
    }

    /// Minimum score for acceptance: 1.0 for exact functions, otherwise
    /// `fuzzy_threshold`
    pub fn threshold(&self, fuzzy_threshold: f64) -> f64 {
        if self.is_exact() { 1.0 } else { fuzzy_threshold }
    }

    /// Score two present values
    ///
    /// TF-IDF functions use `corpus` when given; without one they fall back
    /// to a corpus of just the two values.
    pub fn score(&self, a: &str, b: &str, corpus: Option<&TfIdfCorpus>) -> SimilarityResult<f64> {
        let a = a.trim();
        let b = b.trim();

        let score = match self {
            Self::ExactMatch => exact(a, b),
            Self::NumericDecay { range, sigma } => {
                numeric_decay(parse_number(a)?, parse_number(b)?, *range, *sigma)
            }
            Self::DatetimeExact { resolution } => {
                let (x, _) = parse_datetime(a).ok_or_else(|| not_datetime(a))?;
                let (y, _) = parse_datetime(b).ok_or_else(|| not_datetime(b))?;
                if resolution.truncate(&x) == resolution.truncate(&y) {
                    1.0
                } else {
                    0.0
                }
            }
            Self::Jaccard => jaccard_similarity(a, b),
            Self::Cosine => cosine_similarity(a, b),
            Self::Levenshtein => levenshtein_similarity(&a.to_lowercase(), &b.to_lowercase()),
            Self::JaroWinkler => jaro_winkler_similarity(&a.to_lowercase(), &b.to_lowercase()),
            Self::NGram { n } => ngram_similarity(&a.to_lowercase(), &b.to_lowercase(), *n),
            Self::HybridJaccard { inner_threshold } => {
                hybrid_jaccard_similarity(a, b, *inner_threshold)
            }
            Self::TfIdf | Self::TfIdfCosine => {
                let local;
                let corpus = match corpus {
                    Some(corpus) => corpus,
                    None => {
                        local = TfIdfCorpus::from_documents([a, b]);
                        &local
                    }
                };
                if matches!(self, Self::TfIdf) {
                    corpus.weighted_jaccard(a, b)
                } else {
                    corpus.cosine(a, b)
                }
            }
        };

        Ok(score.clamp(0.0, 1.0))
    }
}

impl std::fmt::Display for SimilarityFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

fn exact(a: &str, b: &str) -> f64 {
    if a.to_lowercase() == b.to_lowercase() {
        1.0
    } else {
        0.0
    }
}

fn parse_number(s: &str) -> SimilarityResult<f64> {
    s.parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| SimilarityError::NotNumeric(s.to_string()))
}

fn not_datetime(s: &str) -> SimilarityError {
    SimilarityError::NotDatetime(s.to_string())
}

fn numeric_decay(a: f64, b: f64, range: f64, sigma: f64) -> f64 {
    if range.is_nan() || range <= 0.0 {
        return if a == b { 1.0 } else { 0.0 };
    }
    let distance = ((a - b).abs() / range).min(1.0);
    (1.0 - distance).powf(sigma)
}
