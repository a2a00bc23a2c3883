//! Logging setup
//!
//! Initializes a `tracing-subscriber` registry with an `EnvFilter` and a
//! plain or JSON formatter. `RUST_LOG` takes precedence over the
//! configured filter.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when installing the subscriber
#[derive(Error, Debug)]
pub enum LoggingError {
    /// Filter directive could not be parsed
    #[error("Invalid log filter '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },

    /// A global subscriber is already installed
    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingConfig {
    /// Level for everything outside this crate
    pub level: String,
    /// Level for `table_fusion` and `table_fusion_core`
    pub fusion_level: String,
    /// Emit one JSON object per event
    pub json_format: bool,
    /// Full filter directive, overriding both levels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env_filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            fusion_level: "info".to_string(),
            json_format: false,
            env_filter: None,
        }
    }
}

impl LoggingConfig {
    /// Configuration for production use
    pub fn production() -> Self {
        Self {
            level: "warn".to_string(),
            fusion_level: "info".to_string(),
            json_format: true,
            env_filter: None,
        }
    }

    /// Configuration for development use
    pub fn development() -> Self {
        Self {
            level: "info".to_string(),
            fusion_level: "debug".to_string(),
            json_format: false,
            env_filter: None,
        }
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    pub fn with_fusion_level(mut self, level: impl Into<String>) -> Self {
        self.fusion_level = level.into();
        self
    }

    pub fn with_json_format(mut self, enabled: bool) -> Self {
        self.json_format = enabled;
        self
    }

    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Filter directive string
    pub fn env_filter(&self) -> String {
        match &self.env_filter {
            Some(filter) => filter.clone(),
            None => format!(
                "{level},table_fusion={fusion},table_fusion_core={fusion}",
                level = self.level.to_lowercase(),
                fusion = self.fusion_level.to_lowercase()
            ),
        }
    }
}

/// Install the global subscriber
pub fn init_logging(config: &LoggingConfig) -> Result<(), LoggingError> {
    use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            let directive = config.env_filter();
            EnvFilter::try_new(&directive).map_err(|e| LoggingError::InvalidFilter {
                filter: directive,
                reason: e.to_string(),
            })?
        }
    };

    let fmt_layer = if config.json_format {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_filter_from_levels() {
        let config = LoggingConfig::development();
        assert_eq!(
            config.env_filter(),
            "info,table_fusion=debug,table_fusion_core=debug"
        );
        assert!(!config.json_format);
        assert!(LoggingConfig::production().json_format);
    }

    #[test]
    fn test_env_filter_override() {
        let config = LoggingConfig::default().with_env_filter("table_fusion_core::join=trace");
        assert_eq!(config.env_filter(), "table_fusion_core::join=trace");
    }

    #[test]
    fn test_builder_setters() {
        let config = LoggingConfig::default()
            .with_level("ERROR")
            .with_fusion_level("Trace")
            .with_json_format(true);
        assert_eq!(config.env_filter(), "error,table_fusion=trace,table_fusion_core=trace");
        assert!(config.json_format);
    }
}
