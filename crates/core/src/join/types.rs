//! Join result and run report types

use serde::{Deserialize, Serialize};

use crate::blocking::BlockingStrategy;
use crate::dataset::Dataset;
use crate::matching::MatchResult;

/// Outcome of an augmentation run
///
/// Always returned, even when nothing could be joined: then `dataset` is
/// the left dataset unchanged, `matches` is empty and `coverage()` is
/// `None`. Callers that need a successful join must check for that.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinResult {
    /// Left columns followed by right columns not already present
    pub dataset: Dataset,
    /// Matches of the winning spec
    pub matches: MatchResult,
    /// Index of the winning spec within its spec list
    pub winning_spec: Option<usize>,
    /// Index of the winning candidate, for candidate runs
    pub winning_candidate: Option<usize>,
    /// Per-spec outcomes
    pub report: AugmentReport,
}

impl JoinResult {
    /// Coverage of the winning spec, `None` when nothing was joined
    pub fn coverage(&self) -> Option<f64> {
        self.matches.coverage
    }

    /// Whether a spec was selected and its columns appended
    pub fn is_augmented(&self) -> bool {
        self.winning_spec.is_some()
    }
}

/// Report of one augmentation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AugmentReport {
    /// Run ID
    pub run_id: String,
    /// Total duration in milliseconds
    pub duration_ms: u64,
    /// One entry per join spec, in input order
    pub specs: Vec<SpecReport>,
}

impl AugmentReport {
    /// Number of specs that were evaluated
    pub fn evaluated(&self) -> usize {
        self.count(|o| matches!(o, SpecOutcome::Evaluated { .. }))
    }

    /// Number of specs that failed
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, SpecOutcome::Failed { .. }))
    }

    /// Number of specs skipped by cancellation or timeout
    pub fn cancelled(&self) -> usize {
        self.count(|o| matches!(o, SpecOutcome::Cancelled))
    }

    fn count(&self, predicate: impl Fn(&SpecOutcome) -> bool) -> usize {
        self.specs.iter().filter(|s| predicate(&s.outcome)).count()
    }

    /// Get formatted duration
    pub fn duration_formatted(&self) -> String {
        if self.duration_ms < 1000 {
            return format!("{}ms", self.duration_ms);
        }
        let secs = self.duration_ms / 1000;
        let mins = secs / 60;
        let remaining_secs = secs % 60;

        if mins > 0 {
            format!("{}m {}s", mins, remaining_secs)
        } else {
            format!("{}s", secs)
        }
    }
}

/// Report of one join spec
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecReport {
    /// Candidate the spec belongs to, for candidate runs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate: Option<usize>,
    /// Position within its spec list
    pub index: usize,
    /// Feature pairs, `left ~ right`; empty when classification failed
    pub features: Vec<String>,
    pub outcome: SpecOutcome,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

/// What happened to one join spec
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum SpecOutcome {
    /// Matched to completion
    #[serde(rename_all = "camelCase")]
    Evaluated {
        coverage: f64,
        matched: usize,
        comparisons: usize,
        strategy: BlockingStrategy,
    },
    /// Skipped after an error
    Failed { reason: String },
    /// Not started because of cancellation or timeout
    Cancelled,
}

impl SpecOutcome {
    /// Outcome of a completed match
    pub fn from_matches(matches: &MatchResult) -> Self {
        SpecOutcome::Evaluated {
            coverage: matches.coverage.unwrap_or(0.0),
            matched: matches.matched(),
            comparisons: matches.comparisons,
            strategy: matches.strategy.unwrap_or(BlockingStrategy::None),
        }
    }

    /// Coverage when evaluated
    pub fn coverage(&self) -> Option<f64> {
        match self {
            SpecOutcome::Evaluated { coverage, .. } => Some(*coverage),
            _ => None,
        }
    }
}

impl std::fmt::Display for SpecOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpecOutcome::Evaluated {
                coverage,
                matched,
                strategy,
                ..
            } => write!(
                f,
                "coverage {:.1}% ({} rows, {} blocking)",
                coverage * 100.0,
                matched,
                strategy
            ),
            SpecOutcome::Failed { reason } => write!(f, "failed: {reason}"),
            SpecOutcome::Cancelled => write!(f, "cancelled"),
        }
    }
}
