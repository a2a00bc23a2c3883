//! Join orchestration
//!
//! Evaluates a list of candidate join specs between a left and a right
//! dataset and assembles the joined table from the best one.
//!
//! ## Flow
//!
//! For every join spec, independently and possibly in parallel:
//!
//! 1. Profile the columns the spec references on both sides
//! 2. Classify each column pairing into a [`FeaturePair`](crate::feature::FeaturePair)
//! 3. Block and match rows with the [`PairwiseMatcher`](crate::matching::PairwiseMatcher)
//!
//! A spec that errors is logged and skipped. The spec with the highest
//! coverage (matched left rows / left rows) wins, the earlier spec on
//! ties. Only the winner's right columns are appended.
//!
//! ## Example
//!
//! ```rust,ignore
//! use table_fusion_core::feature::JoinSpec;
//! use table_fusion_core::join::JoinOrchestrator;
//!
//! let orchestrator = JoinOrchestrator::new();
//! let specs = vec![JoinSpec::by_name(&left, &right, &[("city", "name")])?];
//! let result = orchestrator.augment(&left, &right, &specs);
//!
//! if let Some(coverage) = result.coverage() {
//!     println!("joined {:.1}% of rows", coverage * 100.0);
//! }
//! ```

mod assemble;
mod cancel;
mod config;
mod error;
mod orchestrator;
mod types;

pub use assemble::assemble;
pub use cancel::CancellationToken;
pub use config::AugmentConfig;
pub use error::{EvaluationResult, JoinError};
pub use orchestrator::{JoinOrchestrator, SpecEvaluation};
pub use types::{AugmentReport, JoinResult, SpecOutcome, SpecReport};
