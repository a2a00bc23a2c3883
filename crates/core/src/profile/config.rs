//! Configuration for column profiling

use serde::{Deserialize, Serialize};

/// Configuration for column profiling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfilerConfig {
    /// Number of most common tokens reported per token section
    pub top_k: usize,

    /// Distance from the mean, in standard deviations, beyond which a
    /// numeric value counts as an outlier
    pub outlier_sigma: f64,

    /// Maximum number of present values fed to the language detector
    /// (0 = disable language tagging)
    pub language_sample: usize,

    /// Compute token and punctuation sections
    pub collect_tokens: bool,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            top_k: 10,
            outlier_sigma: 3.0,
            language_sample: 100,
            collect_tokens: true,
        }
    }
}

impl ProfilerConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for custom configuration
    pub fn builder() -> ProfilerConfigBuilder {
        ProfilerConfigBuilder::default()
    }
}

/// Builder for ProfilerConfig
#[derive(Debug, Default)]
pub struct ProfilerConfigBuilder {
    config: ProfilerConfig,
}

impl ProfilerConfigBuilder {
    /// Set the number of most common tokens to keep
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Set the outlier threshold in standard deviations
    pub fn outlier_sigma(mut self, sigma: f64) -> Self {
        self.config.outlier_sigma = sigma.max(0.0);
        self
    }

    /// Set the language detection sample size
    pub fn language_sample(mut self, size: usize) -> Self {
        self.config.language_sample = size;
        self
    }

    /// Enable or disable token sections
    pub fn collect_tokens(mut self, collect: bool) -> Self {
        self.config.collect_tokens = collect;
        self
    }

    /// Build the configuration
    pub fn build(self) -> ProfilerConfig {
        self.config
    }
}
