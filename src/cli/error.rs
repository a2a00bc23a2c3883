//! CLI error types

use std::path::PathBuf;

use table_fusion_core::feature::ClassifyError;
use table_fusion_core::loader::LoadError;
use thiserror::Error;

use crate::config::ConfigError;
use crate::logging::LoggingError;

/// Errors surfaced by CLI commands
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Logging(#[from] LoggingError),

    #[error("Failed to load {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: LoadError,
    },

    #[error("Column '{column}' not found in {dataset}")]
    UnknownColumn { dataset: String, column: String },

    #[error("Invalid join spec '{spec}': {reason}")]
    InvalidSpec { spec: String, reason: String },

    #[error("Invalid join spec: {0}")]
    Classify(#[from] ClassifyError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to write {path}: {reason}")]
    Write { path: PathBuf, reason: String },

    #[error("No join spec produced a match")]
    NotAugmented,
}

impl CliError {
    /// Message with a hint for the most common causes
    pub fn user_message(&self) -> String {
        match self {
            CliError::UnknownColumn { .. } => format!(
                "{self}\n\nHint: Column names are case-sensitive; run 'table-fusion profile' to list them."
            ),
            CliError::InvalidSpec { .. } => format!(
                "{self}\n\nHint: Use --on left=right, joining several pairings with ',' and composite columns with '+', e.g. --on first+last=name,zip=postcode"
            ),
            CliError::NotAugmented => format!(
                "{self}\n\nHint: Run with --verbose to see why each join spec failed, or lower matching.fuzzyThreshold."
            ),
            _ => self.to_string(),
        }
    }
}
