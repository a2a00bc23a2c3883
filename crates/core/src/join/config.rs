//! Configuration for augmentation runs

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::feature::ClassifierConfig;
use crate::matching::MatchConfig;
use crate::profile::ProfilerConfig;

/// Configuration for [`JoinOrchestrator`](super::JoinOrchestrator)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AugmentConfig {
    /// Column profiling
    pub profiler: ProfilerConfig,
    /// Feature classification
    pub classifier: ClassifierConfig,
    /// Blocking and matching
    pub matching: MatchConfig,
    /// Time budget for a whole run in milliseconds; specs not started
    /// within it are skipped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    /// Evaluate join specs on the rayon thread pool
    pub parallel: bool,
}

impl Default for AugmentConfig {
    fn default() -> Self {
        Self {
            profiler: ProfilerConfig::default(),
            classifier: ClassifierConfig::default(),
            matching: MatchConfig::default(),
            timeout_ms: None,
            parallel: true,
        }
    }
}

impl AugmentConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the profiler configuration
    pub fn with_profiler(mut self, profiler: ProfilerConfig) -> Self {
        self.profiler = profiler;
        self
    }

    /// Set the classifier configuration
    pub fn with_classifier(mut self, classifier: ClassifierConfig) -> Self {
        self.classifier = classifier;
        self
    }

    /// Set the matching configuration
    pub fn with_matching(mut self, matching: MatchConfig) -> Self {
        self.matching = matching;
        self
    }

    /// Set the run time budget
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(timeout.as_millis().min(u128::from(u64::MAX)) as u64);
        self
    }

    /// Enable/disable parallel spec evaluation
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Run time budget
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}
