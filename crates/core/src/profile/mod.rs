//! Column profiling
//!
//! Computes statistical digests of single columns. The digests drive type
//! inference in the feature classifier and are computed only for columns
//! that take part in a join attempt.
//!
//! ## Features
//!
//! - **Missing values** - Null/NaN cells and whitespace-only text
//! - **Distinct counts** - Over trimmed, stringified values
//! - **Numeric stats** - Min, max, mean, population std-dev, outliers
//! - **Token stats** - Whitespace and punctuation tokens with top-k counts
//! - **Language tag** - Best-effort dominant script of the values
//!
//! ## Example
//!
//! ```rust,ignore
//! use table_fusion_core::dataset::{Column, Value};
//! use table_fusion_core::profile::ColumnProfiler;
//!
//! let column = Column::new("city", vec![Value::from("Paris"), Value::from("Lyon")]);
//! let profile = ColumnProfiler::new().profile(&column);
//! assert_eq!(profile.distinct_count, 2);
//! ```

mod config;
mod error;
mod formats;
mod language;
mod profiler;
mod types;

pub use config::{ProfilerConfig, ProfilerConfigBuilder};
pub use error::{ProfileError, ProfileResult};
pub use formats::{DatetimeGranularity, is_datetime, parse_datetime, value_as_datetime};
pub use language::{LanguageDetector, ScriptDetector};
pub use profiler::{ColumnProfiler, profile_dataset};
pub use types::{
    ColumnProfile, NumericStats, PunctuationStats, TokenCount, TokenStats, WhitespaceStats,
};
