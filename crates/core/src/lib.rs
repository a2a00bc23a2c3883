//! Table Fusion Core - schema-aware entity resolution joins
//!
//! Provides:
//! - Column profiling (missing/distinct counts, numeric and token statistics)
//! - Feature classification of join columns and similarity selection
//! - Blocking and greedy one-to-one row matching
//! - Join orchestration over candidate join specs and candidate datasets
//! - Dataset loaders and a TTL-bounded materialization cache

pub mod blocking;
pub mod cache;
pub mod dataset;
pub mod discovery;
pub mod feature;
pub mod join;
pub mod loader;
pub mod matching;
pub mod profile;
pub mod similarity;

// Re-export the data model
pub use dataset::{
    Column, Dataset, DatasetError, DatasetId, DatasetResult, SemanticType, StorageType, Value,
};

// Re-export pipeline stages
pub use blocking::{BlockingConfig, BlockingIndex, BlockingStrategy};
pub use feature::{
    ClassifierConfig, DistributionClass, FeatureClassifier, FeaturePair, FeatureSpec, JoinSpec,
    SemanticHints, ValueClass,
};
pub use matching::{MatchConfig, MatchResult, PairwiseMatcher};
pub use profile::{ColumnProfile, ColumnProfiler, ProfilerConfig};
pub use similarity::SimilarityFunction;

// Re-export orchestration
pub use discovery::{Candidate, CandidateMetadata};
pub use join::{
    AugmentConfig, AugmentReport, CancellationToken, JoinError, JoinOrchestrator, JoinResult,
    SpecOutcome,
};

// Re-export collaborators
pub use cache::{
    CacheConfig, CachedMaterializer, FileMaterializer, Materializer, SharedDatasetCache,
};
pub use loader::{CsvLoader, DatasetLoader, JsonRecordsLoader, LoadError};
