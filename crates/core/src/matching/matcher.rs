//! Greedy first-fit pairwise matcher

use tracing::{debug, trace};

use super::config::MatchConfig;
use super::error::{MatchError, MatchingResult};
use super::types::MatchResult;
use crate::blocking::BlockingIndex;
use crate::dataset::Dataset;
use crate::feature::{DistributionClass, FeaturePair, ValueClass};
use crate::similarity::{SimilarityFunction, TfIdfCorpus};

/// Resolves row correspondences between two datasets
///
/// Left rows are visited in dataset order. Each one takes the first right
/// row of its block, in dataset order, that is not yet taken and passes
/// every feature pair. The assignment is greedy and not globally optimal,
/// but deterministic for a given row order.
#[derive(Debug, Clone, Default)]
pub struct PairwiseMatcher {
    config: MatchConfig,
}

impl PairwiseMatcher {
    /// Create a matcher with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a matcher with custom configuration
    pub fn with_config(config: MatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Build blocks for the pairs and match
    pub fn match_rows(
        &self,
        left: &Dataset,
        right: &Dataset,
        pairs: &[FeaturePair],
    ) -> MatchingResult<MatchResult> {
        check_pairs(left, right, pairs)?;
        let index = BlockingIndex::build(left, right, pairs, &self.config.blocking_config())?;
        self.match_with_index(left, right, pairs, &index)
    }

    /// Match using an already built blocking index
    pub fn match_with_index(
        &self,
        left: &Dataset,
        right: &Dataset,
        pairs: &[FeaturePair],
        index: &BlockingIndex,
    ) -> MatchingResult<MatchResult> {
        check_pairs(left, right, pairs)?;

        let comparators: Vec<PairComparator> = pairs
            .iter()
            .map(|pair| PairComparator::new(pair, left, right, &self.config))
            .collect();

        let all_right: Vec<usize> = if index.is_blocked() {
            Vec::new()
        } else {
            (0..right.row_count()).collect()
        };

        let mut consumed = vec![false; right.row_count()];
        let mut matched = Vec::new();
        let mut comparisons = 0usize;

        for left_row in 0..left.row_count() {
            if comparators.iter().any(|c| c.left[left_row].is_none()) {
                continue;
            }
            let candidates = index.candidates(left_row).unwrap_or(&all_right[..]);

            for &right_row in candidates {
                if consumed[right_row] {
                    continue;
                }
                comparisons += 1;
                if comparators.iter().all(|c| c.accepts(left_row, right_row)) {
                    trace!(left_row, right_row, "Accepted candidate");
                    consumed[right_row] = true;
                    matched.push((left_row, right_row));
                    break;
                }
            }
        }

        let result = MatchResult::new(matched, left.row_count(), comparisons, index.strategy());
        debug!(
            matched = result.matched(),
            left_rows = result.left_rows,
            comparisons,
            strategy = %index.strategy(),
            "Matched rows"
        );
        Ok(result)
    }
}

/// Match with default configuration
pub fn match_rows(
    left: &Dataset,
    right: &Dataset,
    pairs: &[FeaturePair],
) -> MatchingResult<MatchResult> {
    PairwiseMatcher::new().match_rows(left, right, pairs)
}

fn check_pairs(left: &Dataset, right: &Dataset, pairs: &[FeaturePair]) -> MatchingResult<()> {
    if pairs.is_empty() {
        return Err(MatchError::NoFeaturePairs);
    }
    for pair in pairs {
        if pair.left().dataset_id() != left.id() {
            return Err(MatchError::DatasetMismatch {
                feature: pair.left().name().to_string(),
                side: "left",
            });
        }
        if pair.right().dataset_id() != right.id() {
            return Err(MatchError::DatasetMismatch {
                feature: pair.right().name().to_string(),
                side: "right",
            });
        }
    }
    Ok(())
}

/// The functions a feature pair compares with
///
/// Two date/time sides compare at the coarsest of both observed
/// granularities and the configured resolution, whatever their distribution.
/// Otherwise categorical sides or differing value classes compare exactly,
/// two numeric sides decay over their joint range, and anything else uses
/// the left feature's ranked list.
pub fn resolve_functions(pair: &FeaturePair, config: &MatchConfig) -> Vec<SimilarityFunction> {
    let (l, r) = (pair.left(), pair.right());

    if l.value_class() == ValueClass::Datetime && r.value_class() == ValueClass::Datetime {
        let mut resolution = config.datetime_resolution;
        for granularity in [l.datetime_granularity(), r.datetime_granularity()]
            .into_iter()
            .flatten()
        {
            resolution = resolution.coarsest(granularity);
        }
        return vec![SimilarityFunction::DatetimeExact { resolution }];
    }

    if l.distribution() == DistributionClass::Categorical
        || r.distribution() == DistributionClass::Categorical
        || l.value_class() != r.value_class()
    {
        return vec![SimilarityFunction::ExactMatch];
    }

    match l.value_class() {
        ValueClass::Number => {
            let range = match (l.numeric_range(), r.numeric_range()) {
                (Some((lmin, lmax)), Some((rmin, rmax))) => lmax.max(rmax) - lmin.min(rmin),
                (Some((min, max)), None) | (None, Some((min, max))) => max - min,
                (None, None) => 0.0,
            };
            vec![SimilarityFunction::NumericDecay {
                range,
                sigma: config.decay_sigma,
            }]
        }
        _ => l.similarity().to_vec(),
    }
}

/// Per-pair scoring state: resolved functions plus merged values of both
/// sides
struct PairComparator {
    functions: Vec<(SimilarityFunction, f64)>,
    corpus: Option<TfIdfCorpus>,
    left: Vec<Option<String>>,
    right: Vec<Option<String>>,
}

impl PairComparator {
    fn new(pair: &FeaturePair, left: &Dataset, right: &Dataset, config: &MatchConfig) -> Self {
        let functions: Vec<(SimilarityFunction, f64)> = resolve_functions(pair, config)
            .into_iter()
            .map(|f| (f, f.threshold(config.fuzzy_threshold)))
            .collect();
        let left_values = pair.left().merged_values(left);
        let right_values = pair.right().merged_values(right);

        let corpus = functions.iter().any(|(f, _)| f.needs_corpus()).then(|| {
            TfIdfCorpus::from_documents(left_values.iter().chain(&right_values).flatten())
        });

        Self {
            functions,
            corpus,
            left: left_values,
            right: right_values,
        }
    }

    /// Whether any ranked function reaches its threshold; missing values
    /// and failed comparisons never do
    fn accepts(&self, left_row: usize, right_row: usize) -> bool {
        let (Some(a), Some(b)) = (&self.left[left_row], &self.right[right_row]) else {
            return false;
        };
        self.functions.iter().any(|(function, threshold)| {
            match function.score(a, b, self.corpus.as_ref()) {
                Ok(score) => score >= *threshold,
                Err(err) => {
                    trace!(function = %function, error = %err, "Comparison failed");
                    false
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocking::BlockingStrategy;
    use crate::dataset::Value;
    use crate::feature::FeatureSpec;
    use crate::profile::DatetimeGranularity;

    fn one_column(name: &str, values: Vec<Value>) -> Dataset {
        Dataset::from_rows(name, &["c"], values.into_iter().map(|v| vec![v]).collect()).unwrap()
    }

    fn pair(
        left: &Dataset,
        right: &Dataset,
        distribution: DistributionClass,
        value_class: ValueClass,
    ) -> FeaturePair {
        FeaturePair::new(
            FeatureSpec::new(left, vec![0], distribution, value_class).unwrap(),
            FeatureSpec::new(right, vec![0], distribution, value_class).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_categorical_case_insensitive_match() {
        let left = one_column("l", vec!["New York".into(), "Unknown City".into()]);
        let right = one_column("r", vec!["new york".into(), "boston".into()]);
        let pairs = [pair(&left, &right, DistributionClass::Categorical, ValueClass::String)];

        let result = match_rows(&left, &right, &pairs).unwrap();
        assert_eq!(result.pairs, vec![(0, 0)]);
        assert_eq!(result.coverage, Some(0.5));
        assert_eq!(result.strategy, Some(BlockingStrategy::CategoricalHash));
    }

    #[test]
    fn test_right_rows_used_once() {
        let left = one_column("l", vec!["a".into(), "a".into(), "a".into()]);
        let right = one_column("r", vec!["A".into(), "a".into()]);
        let pairs = [pair(&left, &right, DistributionClass::Categorical, ValueClass::String)];

        let result = match_rows(&left, &right, &pairs).unwrap();
        assert_eq!(result.pairs, vec![(0, 0), (1, 1)]);
    }

    #[test]
    fn test_numeric_decay_accepts_close_values() {
        let left = one_column("l", vec![Value::from(10.0), Value::from(97.0)]);
        let right = one_column("r", vec![Value::from(0.0), Value::from(12.0), Value::from(100.0)]);
        let l = FeatureSpec::new(
            &left,
            vec![0],
            DistributionClass::NonCategorical,
            ValueClass::Number,
        )
        .unwrap()
        .with_numeric_range(10.0, 97.0, &Default::default());
        let r = FeatureSpec::new(
            &right,
            vec![0],
            DistributionClass::NonCategorical,
            ValueClass::Number,
        )
        .unwrap()
        .with_numeric_range(0.0, 100.0, &Default::default());
        let pairs = [FeaturePair::new(l, r).unwrap()];

        let functions = resolve_functions(&pairs[0], &MatchConfig::default());
        assert_eq!(
            functions,
            vec![SimilarityFunction::NumericDecay {
                range: 100.0,
                sigma: 0.5
            }]
        );

        let strict = PairwiseMatcher::with_config(MatchConfig::new().with_fuzzy_threshold(0.95));
        let result = strict.match_rows(&left, &right, &pairs).unwrap();
        assert_eq!(result.pairs, vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn test_missing_values_never_match() {
        let left = one_column("l", vec![Value::Null, "x".into()]);
        let right = one_column("r", vec![Value::Null, "x".into()]);
        let pairs = [pair(&left, &right, DistributionClass::NonCategorical, ValueClass::String)];

        let result = match_rows(&left, &right, &pairs).unwrap();
        assert_eq!(result.pairs, vec![(1, 1)]);
    }

    #[test]
    fn test_comparison_errors_score_zero() {
        let left = one_column("l", vec!["abc".into(), "5".into()]);
        let right = one_column("r", vec!["5".into()]);
        let pairs = [pair(&left, &right, DistributionClass::NonCategorical, ValueClass::Number)];

        let result = match_rows(&left, &right, &pairs).unwrap();
        assert_eq!(result.pairs, vec![(1, 0)]);
    }

    #[test]
    fn test_mixed_classes_compare_exactly() {
        let left = one_column("l", vec!["10".into()]);
        let right = one_column("r", vec!["10".into()]);
        let pair = FeaturePair::new(
            FeatureSpec::new(&left, vec![0], DistributionClass::NonCategorical, ValueClass::Number)
                .unwrap(),
            FeatureSpec::new(&right, vec![0], DistributionClass::NonCategorical, ValueClass::String)
                .unwrap(),
        )
        .unwrap();
        assert_eq!(
            resolve_functions(&pair, &MatchConfig::default()),
            vec![SimilarityFunction::ExactMatch]
        );
    }

    #[test]
    fn test_datetime_resolution_reconciliation() {
        let left = one_column("l", vec!["2024-03-05 10:00".into()]);
        let right = one_column("r", vec!["2024-03".into()]);
        let params = Default::default();
        let pair = FeaturePair::new(
            FeatureSpec::new(
                &left,
                vec![0],
                DistributionClass::NonCategorical,
                ValueClass::Datetime,
            )
            .unwrap()
            .with_datetime_granularity(DatetimeGranularity::Minute, &params),
            FeatureSpec::new(
                &right,
                vec![0],
                DistributionClass::NonCategorical,
                ValueClass::Datetime,
            )
            .unwrap()
            .with_datetime_granularity(DatetimeGranularity::Month, &params),
        )
        .unwrap();

        assert_eq!(
            resolve_functions(&pair, &MatchConfig::default()),
            vec![SimilarityFunction::DatetimeExact {
                resolution: DatetimeGranularity::Month
            }]
        );
        let result = match_rows(&left, &right, &[pair]).unwrap();
        assert_eq!(result.pairs, vec![(0, 0)]);
    }

    #[test]
    fn test_categorical_datetime_compares_at_resolution() {
        let left = one_column(
            "l",
            vec![
                "2024-01-15 10:05".into(),
                "2024-01-15 10:05".into(),
                "2024-01-16 09:10".into(),
                "2024-01-16 09:10".into(),
            ],
        );
        let right = one_column(
            "r",
            vec![
                "2024-01-15 10:40".into(),
                "2024-01-15 10:40".into(),
                "2024-01-16 09:50".into(),
                "2024-01-16T09:50:00".into(),
            ],
        );
        let params = Default::default();
        let pair = FeaturePair::new(
            FeatureSpec::new(&left, vec![0], DistributionClass::Categorical, ValueClass::Datetime)
                .unwrap()
                .with_datetime_granularity(DatetimeGranularity::Minute, &params),
            FeatureSpec::new(&right, vec![0], DistributionClass::Categorical, ValueClass::Datetime)
                .unwrap()
                .with_datetime_granularity(DatetimeGranularity::Minute, &params),
        )
        .unwrap();

        assert_eq!(
            resolve_functions(&pair, &MatchConfig::default()),
            vec![SimilarityFunction::DatetimeExact {
                resolution: DatetimeGranularity::Hour
            }]
        );
        let result = match_rows(&left, &right, &[pair]).unwrap();
        assert_eq!(result.pairs, vec![(0, 0), (1, 1), (2, 2), (3, 3)]);
        assert_eq!(result.coverage, Some(1.0));
    }

    #[test]
    fn test_fuzzy_string_match() {
        let left = one_column("l", vec!["Jonathan".into(), "Bob".into()]);
        let right = one_column("r", vec!["Qwerty".into(), "Jonathon".into()]);
        let pairs = [pair(&left, &right, DistributionClass::NonCategorical, ValueClass::String)];

        let result = match_rows(&left, &right, &pairs).unwrap();
        assert_eq!(result.pairs, vec![(0, 1)]);
    }

    #[test]
    fn test_rejects_foreign_features() {
        let left = one_column("l", vec!["a".into()]);
        let right = one_column("r", vec!["a".into()]);
        let other = one_column("o", vec!["a".into()]);
        let pairs = [pair(&left, &right, DistributionClass::Categorical, ValueClass::String)];

        let err = match_rows(&other, &right, &pairs).unwrap_err();
        assert!(matches!(err, MatchError::DatasetMismatch { side: "left", .. }));
        assert_eq!(match_rows(&left, &right, &[]).unwrap_err(), MatchError::NoFeaturePairs);
    }

    #[test]
    fn test_deterministic() {
        let left = one_column("l", vec!["ann".into(), "anne".into(), "bob".into()]);
        let right = one_column("r", vec!["anna".into(), "bobby".into(), "ann".into()]);
        let pairs = [pair(&left, &right, DistributionClass::NonCategorical, ValueClass::String)];

        let first = match_rows(&left, &right, &pairs).unwrap();
        let second = match_rows(&left, &right, &pairs).unwrap();
        assert_eq!(first, second);
    }
}
