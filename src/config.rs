//! TOML configuration file
//!
//! Every section is optional; absent sections and keys take their
//! defaults. Keys are camelCase, matching the JSON form of the core
//! configuration types.
//!
//! ```toml
//! [augment]
//! timeoutMs = 30000
//! parallel = true
//!
//! [augment.matching]
//! fuzzyThreshold = 0.6
//! datetimeResolution = "day"
//!
//! [augment.classifier]
//! categoricalRatio = 2.0
//!
//! [cache]
//! ttlSecs = 600
//! capacity = 16
//!
//! [logging]
//! fusionLevel = "debug"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use table_fusion_core::cache::CacheConfig;
use table_fusion_core::join::AugmentConfig;
use thiserror::Error;

use crate::logging::LoggingConfig;

/// Errors that can occur when reading or writing configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Cannot serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Complete configuration of a fusion run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FusionConfig {
    /// Profiling, classification, matching and run limits
    pub augment: AugmentConfig,
    /// Materialization cache limits
    pub cache: CacheConfig,
    pub logging: LoggingConfig,
}

impl FusionConfig {
    /// Load from a TOML file
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Parse TOML text
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load from `path` when given, otherwise defaults
    pub fn load_or_default(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Render as TOML
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
