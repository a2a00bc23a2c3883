//! Table Fusion - schema-aware table augmentation
//!
//! Wraps [`table_fusion_core`] with:
//! - TOML configuration for every tunable of a fusion run
//! - Logging initialization (plain or JSON)
//! - The `table-fusion` command line (feature `cli`)

pub mod cli;
pub mod config;
pub mod logging;

pub use config::{ConfigError, ConfigResult, FusionConfig};
pub use logging::{LoggingConfig, LoggingError, init_logging};

pub use table_fusion_core::{Candidate, Dataset, JoinOrchestrator, JoinResult, JoinSpec, Value};
