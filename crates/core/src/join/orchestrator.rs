//! Join orchestrator

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{Span, debug, info, info_span, warn};
use uuid::Uuid;

use super::assemble::assemble;
use super::cancel::CancellationToken;
use super::config::AugmentConfig;
use super::error::{EvaluationResult, JoinError};
use super::types::{AugmentReport, JoinResult, SpecOutcome, SpecReport};
use crate::dataset::Dataset;
use crate::discovery::Candidate;
use crate::feature::{FeatureClassifier, FeaturePair, JoinSpec, SemanticHints};
use crate::matching::{MatchResult, PairwiseMatcher};
use crate::profile::{ColumnProfiler, LanguageDetector, profile_dataset};

/// Features and matches of one evaluated join spec
#[derive(Debug, Clone, PartialEq)]
pub struct SpecEvaluation {
    pub pairs: Vec<FeaturePair>,
    pub matches: MatchResult,
}

/// Evaluates candidate join specs and assembles the best join
///
/// Each spec is profiled, classified, blocked and matched independently;
/// specs may run in parallel. The spec with the highest coverage wins, ties
/// going to the earlier spec.
#[derive(Debug, Clone)]
pub struct JoinOrchestrator {
    config: AugmentConfig,
    profiler: ColumnProfiler,
    classifier: FeatureClassifier,
    matcher: PairwiseMatcher,
    hints: SemanticHints,
    cancellation: CancellationToken,
}

impl Default for JoinOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

/// One spec to evaluate against one right dataset
struct Job<'a> {
    candidate: Option<usize>,
    index: usize,
    right: &'a Dataset,
    spec: &'a JoinSpec,
}

/// Report plus matches of one job
struct Attempt {
    report: SpecReport,
    matches: Option<MatchResult>,
}

impl JoinOrchestrator {
    /// Create an orchestrator with default configuration
    pub fn new() -> Self {
        Self::with_config(AugmentConfig::default())
    }

    /// Create an orchestrator with custom configuration
    pub fn with_config(config: AugmentConfig) -> Self {
        let profiler = ColumnProfiler::with_config(config.profiler.clone());
        let classifier = FeatureClassifier::with_config(config.classifier.clone())
            .with_params(config.matching.similarity_params());
        let matcher = PairwiseMatcher::with_config(config.matching.clone());
        Self {
            config,
            profiler,
            classifier,
            matcher,
            hints: SemanticHints::default(),
            cancellation: CancellationToken::new(),
        }
    }

    /// Replace the language detector used by profiling
    pub fn with_language_detector(mut self, detector: Arc<dyn LanguageDetector>) -> Self {
        self.profiler = self.profiler.with_language_detector(detector);
        self
    }

    /// Semantic type hints applied to both datasets
    pub fn with_hints(mut self, hints: SemanticHints) -> Self {
        self.hints = hints;
        self
    }

    /// Use a caller-owned cancellation token
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn config(&self) -> &AugmentConfig {
        &self.config
    }

    /// Token that cancels specs not yet started
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Join `right` onto `left` using the best of `specs`
    ///
    /// Never fails: when no spec is given or none succeeds, the left
    /// dataset comes back unchanged with an empty match result.
    pub fn augment(&self, left: &Dataset, right: &Dataset, specs: &[JoinSpec]) -> JoinResult {
        self.augment_with_timeout(left, right, specs, self.config.timeout())
    }

    /// [`augment`](Self::augment) with an explicit time budget
    pub fn augment_with_timeout(
        &self,
        left: &Dataset,
        right: &Dataset,
        specs: &[JoinSpec],
        timeout: Option<Duration>,
    ) -> JoinResult {
        let jobs = specs
            .iter()
            .enumerate()
            .map(|(index, spec)| Job {
                candidate: None,
                index,
                right,
                spec,
            })
            .collect();
        self.run(left, jobs, timeout)
    }

    /// Join the best spec over all candidates onto `left`
    ///
    /// Candidates are ranked by the same rule as specs; ties go to the
    /// earlier candidate, then the earlier spec.
    pub fn augment_candidates(&self, left: &Dataset, candidates: &[Candidate]) -> JoinResult {
        let jobs = candidates
            .iter()
            .enumerate()
            .flat_map(|(c, candidate)| {
                debug!(
                    candidate = c,
                    label = candidate.label(),
                    specs = candidate.specs.len(),
                    "Queued candidate"
                );
                candidate.specs.iter().enumerate().map(move |(index, spec)| Job {
                    candidate: Some(c),
                    index,
                    right: &candidate.dataset,
                    spec,
                })
            })
            .collect();
        self.run(left, jobs, self.config.timeout())
    }

    /// Profile, classify, block and match one spec
    pub fn evaluate_spec(
        &self,
        left: &Dataset,
        right: &Dataset,
        spec: &JoinSpec,
    ) -> EvaluationResult<SpecEvaluation> {
        let left_profiles = profile_dataset(&self.profiler, left, &spec.left_columns())?;
        let right_profiles = profile_dataset(&self.profiler, right, &spec.right_columns())?;

        let pairs = self.classifier.classify_join_spec(
            left,
            right,
            spec,
            &left_profiles,
            &right_profiles,
            &self.hints,
        )?;

        let matches = self.matcher.match_rows(left, right, &pairs)?;
        Ok(SpecEvaluation { pairs, matches })
    }

    fn run(&self, left: &Dataset, jobs: Vec<Job<'_>>, timeout: Option<Duration>) -> JoinResult {
        let run_id = Uuid::new_v4().to_string();
        let span = info_span!("augment", run_id = %run_id);
        let _guard = span.enter();

        let start = Instant::now();
        let deadline = timeout.map(|t| start + t);
        info!(
            left = left.name(),
            left_rows = left.row_count(),
            specs = jobs.len(),
            "Starting augmentation"
        );

        let mut attempts = self.evaluate_jobs(left, &jobs, deadline, &span);

        let mut best: Option<(usize, f64)> = None;
        for (i, attempt) in attempts.iter().enumerate() {
            if let Some(coverage) = attempt.matches.as_ref().and_then(|m| m.coverage) {
                if best.is_none_or(|(_, top)| coverage > top) {
                    best = Some((i, coverage));
                }
            }
        }

        let winner = best.and_then(|(i, _)| {
            let matches = attempts[i].matches.take()?;
            match assemble(left, jobs[i].right, &matches) {
                Ok(dataset) => Some((i, dataset, matches)),
                Err(err) => {
                    let err = JoinError::from(err);
                    warn!(index = jobs[i].index, error = %err, "Failed to assemble joined table");
                    attempts[i].report.outcome = SpecOutcome::Failed {
                        reason: err.to_string(),
                    };
                    None
                }
            }
        });

        let duration_ms = start.elapsed().as_millis() as u64;
        let report = AugmentReport {
            run_id,
            duration_ms,
            specs: attempts.into_iter().map(|a| a.report).collect(),
        };

        match winner {
            Some((i, dataset, matches)) => {
                info!(
                    index = jobs[i].index,
                    candidate = ?jobs[i].candidate,
                    coverage = ?matches.coverage,
                    columns = dataset.column_count(),
                    duration_ms,
                    "Augmentation completed"
                );
                JoinResult {
                    dataset,
                    matches,
                    winning_spec: Some(jobs[i].index),
                    winning_candidate: jobs[i].candidate,
                    report,
                }
            }
            None => {
                warn!(
                    specs = report.specs.len(),
                    failed = report.failed(),
                    cancelled = report.cancelled(),
                    "No join spec succeeded, returning left dataset unchanged"
                );
                JoinResult {
                    dataset: left.clone(),
                    matches: MatchResult::empty(left.row_count()),
                    winning_spec: None,
                    winning_candidate: None,
                    report,
                }
            }
        }
    }

    fn evaluate_jobs(
        &self,
        left: &Dataset,
        jobs: &[Job<'_>],
        deadline: Option<Instant>,
        parent: &Span,
    ) -> Vec<Attempt> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            if self.config.parallel && jobs.len() > 1 {
                return jobs
                    .par_iter()
                    .map(|job| self.attempt(left, job, deadline, parent))
                    .collect();
            }
        }

        jobs.iter()
            .map(|job| self.attempt(left, job, deadline, parent))
            .collect()
    }

    fn attempt(
        &self,
        left: &Dataset,
        job: &Job<'_>,
        deadline: Option<Instant>,
        parent: &Span,
    ) -> Attempt {
        let span = info_span!(
            parent: parent,
            "join_spec",
            index = job.index,
            candidate = ?job.candidate
        );
        let _guard = span.enter();
        let start = Instant::now();

        let result = self
            .checkpoint(deadline)
            .and_then(|()| self.evaluate_spec(left, job.right, job.spec));

        let (outcome, features, matches) = match result {
            Ok(evaluation) => {
                info!(
                    coverage = ?evaluation.matches.coverage,
                    matched = evaluation.matches.matched(),
                    comparisons = evaluation.matches.comparisons,
                    "Join spec evaluated"
                );
                (
                    SpecOutcome::from_matches(&evaluation.matches),
                    evaluation.pairs.iter().map(FeaturePair::describe).collect(),
                    Some(evaluation.matches),
                )
            }
            Err(JoinError::Cancelled) => {
                info!("Join spec skipped: cancelled");
                (SpecOutcome::Cancelled, Vec::new(), None)
            }
            Err(err) => {
                warn!(error = %err, "Join spec failed");
                (
                    SpecOutcome::Failed {
                        reason: err.to_string(),
                    },
                    Vec::new(),
                    None,
                )
            }
        };

        Attempt {
            report: SpecReport {
                candidate: job.candidate,
                index: job.index,
                features,
                outcome,
                duration_ms: start.elapsed().as_millis() as u64,
            },
            matches,
        }
    }

    fn checkpoint(&self, deadline: Option<Instant>) -> EvaluationResult<()> {
        if self.cancellation.is_cancelled() || deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(JoinError::Cancelled);
        }
        Ok(())
    }
}
