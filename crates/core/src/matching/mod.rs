//! Pairwise matching
//!
//! Finds row correspondences between two datasets for one list of feature
//! pairs. Within each block, left rows are resolved in order against the
//! first unused right row that passes every pair's similarity check.
//!
//! ## Example
//!
//! ```rust,ignore
//! use table_fusion_core::matching::match_rows;
//!
//! let result = match_rows(&left, &right, &pairs)?;
//! println!("coverage: {:?}", result.coverage);
//! ```

mod config;
mod error;
mod matcher;
mod types;

pub use config::MatchConfig;
pub use error::{MatchError, MatchingResult};
pub use matcher::{PairwiseMatcher, match_rows, resolve_functions};
pub use types::MatchResult;
