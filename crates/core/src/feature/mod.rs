//! Feature classification
//!
//! A feature is one or more columns of one dataset treated as a single
//! comparable join key. The classifier assigns each feature a
//! [`DistributionClass`] and a [`ValueClass`], and the pair of classes
//! selects a merge strategy and a ranked list of similarity functions
//! from a fixed dispatch table.
//!
//! | Distribution | Value | Ranked functions |
//! |---|---|---|
//! | Categorical | Number, String | exact |
//! | TokenCategorical | String | Jaccard, Cosine |
//! | NonCategorical | Number | numeric decay |
//! | NonCategorical | String (short) | Levenshtein, Jaro-Winkler, n-gram |
//! | NonCategorical | String (phrase) | hybrid Jaccard, n-gram |
//! | NonCategorical | String (sentence) | hybrid Jaccard, TF-IDF cosine |
//! | NonCategorical | String (paragraph) | TF-IDF, hybrid Jaccard, TF-IDF cosine |
//! | any | Datetime | date/time exact |
//!
//! Anything else falls back to non-categorical strings compared exactly.

mod classifier;
mod config;
mod error;
mod spec;
mod types;

pub use classifier::{FeatureClassifier, SemanticHints};
pub use config::{ClassifierConfig, SimilarityParams};
pub use error::{ClassifyError, ClassifyResult};
pub use spec::{ColumnPairing, JoinSpec};
pub use types::{
    DistributionClass, FeaturePair, FeatureSpec, MergeStrategy, StringLengthClass, ValueClass,
    ranked_similarity,
};
