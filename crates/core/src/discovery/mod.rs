//! Discovery candidates
//!
//! A search/discovery collaborator proposes right-hand datasets together
//! with descriptive metadata and one or more candidate join specs. The
//! orchestrator treats each candidate's specs as opaque inputs; see
//! [`JoinOrchestrator::augment_candidates`](crate::join::JoinOrchestrator::augment_candidates).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::feature::JoinSpec;

/// Descriptive metadata attached to a discovered dataset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CandidateMetadata {
    /// Human-readable title
    pub title: Option<String>,
    /// Where the dataset came from (URL, file path, index id)
    pub source: Option<String>,
    /// Relevance score assigned by the discovery collaborator
    pub score: Option<f64>,
    /// Any further key/value pairs
    pub extra: BTreeMap<String, String>,
}

impl CandidateMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// A right-hand dataset proposed for augmentation
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub dataset: Dataset,
    pub metadata: CandidateMetadata,
    pub specs: Vec<JoinSpec>,
}

impl Candidate {
    pub fn new(dataset: Dataset, specs: Vec<JoinSpec>) -> Self {
        Self {
            dataset,
            metadata: CandidateMetadata::default(),
            specs,
        }
    }

    pub fn with_metadata(mut self, metadata: CandidateMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Label for logs: title, then source, then dataset name
    pub fn label(&self) -> &str {
        self.metadata
            .title
            .as_deref()
            .or(self.metadata.source.as_deref())
            .unwrap_or_else(|| self.dataset.name())
    }
}
