//! Feature classifier
//!
//! Turns profiled column groups into typed [`FeatureSpec`]s.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use super::config::{ClassifierConfig, SimilarityParams};
use super::error::{ClassifyError, ClassifyResult};
use super::spec::{ColumnPairing, JoinSpec};
use super::types::{DistributionClass, FeaturePair, FeatureSpec, StringLengthClass, ValueClass};
use crate::dataset::{Column, Dataset, SemanticType};
use crate::profile::{ColumnProfile, DatetimeGranularity, value_as_datetime};

/// Caller-supplied semantic types, keyed by column name
///
/// A hint here overrides a hint carried by the column itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SemanticHints {
    by_column: HashMap<String, SemanticType>,
}

impl SemanticHints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the semantic type of a column
    pub fn with_hint(mut self, column: impl Into<String>, hint: SemanticType) -> Self {
        self.by_column.insert(column.into(), hint);
        self
    }

    /// Hint for a column, falling back to the column's own hint
    pub fn get(&self, column: &Column) -> Option<SemanticType> {
        self.by_column
            .get(column.name())
            .copied()
            .or_else(|| column.semantic_hint())
    }
}

/// Assigns distribution, value and length classes to column groups
#[derive(Debug, Clone, Default)]
pub struct FeatureClassifier {
    config: ClassifierConfig,
    params: SimilarityParams,
}

impl FeatureClassifier {
    /// Create a classifier with default thresholds
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a classifier with custom thresholds
    pub fn with_config(config: ClassifierConfig) -> Self {
        Self {
            config,
            params: SimilarityParams::default(),
        }
    }

    /// Set the parameters baked into ranked similarity functions
    pub fn with_params(mut self, params: SimilarityParams) -> Self {
        self.params = params;
        self
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn params(&self) -> &SimilarityParams {
        &self.params
    }

    /// Classify a group of columns of one dataset
    ///
    /// `profiles` must hold a profile for every column in `columns`.
    pub fn classify(
        &self,
        dataset: &Dataset,
        columns: &[usize],
        profiles: &BTreeMap<usize, ColumnProfile>,
        hints: &SemanticHints,
    ) -> ClassifyResult<FeatureSpec> {
        let spec = match columns {
            [] => return Err(ClassifyError::EmptyColumnGroup),
            [index] => self.classify_single(dataset, *index, profiles, hints)?,
            _ => self.classify_composite(dataset, columns)?,
        };

        debug!(
            feature = spec.name(),
            distribution = %spec.distribution(),
            value_class = %spec.value_class(),
            functions = spec.similarity().len(),
            "Classified feature"
        );
        Ok(spec)
    }

    /// Classify both sides of every pairing in a join spec
    pub fn classify_join_spec(
        &self,
        left: &Dataset,
        right: &Dataset,
        spec: &JoinSpec,
        left_profiles: &BTreeMap<usize, ColumnProfile>,
        right_profiles: &BTreeMap<usize, ColumnProfile>,
        hints: &SemanticHints,
    ) -> ClassifyResult<Vec<FeaturePair>> {
        spec.pairings()
            .iter()
            .map(|ColumnPairing { left: l, right: r }| {
                let left_feature = self.classify(left, l, left_profiles, hints)?;
                let right_feature = self.classify(right, r, right_profiles, hints)?;
                FeaturePair::new(left_feature, right_feature)
            })
            .collect()
    }

    fn classify_single(
        &self,
        dataset: &Dataset,
        index: usize,
        profiles: &BTreeMap<usize, ColumnProfile>,
        hints: &SemanticHints,
    ) -> ClassifyResult<FeatureSpec> {
        let column = dataset.column(index)?;
        let profile = profiles
            .get(&index)
            .ok_or(ClassifyError::MissingProfile(index))?;

        let value_class = self.value_class(column, profile, hints);
        let distribution = self.distribution_class(profile);

        let mut spec = FeatureSpec::new(dataset, vec![index], distribution, value_class)?
            .with_params(&self.params);

        match spec.value_class() {
            ValueClass::Number => {
                if let Some(numeric) = &profile.numeric {
                    spec = spec.with_numeric_range(numeric.min, numeric.max, &self.params);
                }
            }
            ValueClass::Datetime => {
                let granularity = finest_granularity(column)
                    .ok_or_else(|| ClassifyError::NoDatetimeValues(column.name().to_string()))?;
                spec = spec.with_datetime_granularity(granularity, &self.params);
            }
            ValueClass::String if spec.distribution() == DistributionClass::NonCategorical => {
                spec = spec.with_length_class(self.length_class(profile), &self.params);
            }
            _ => {}
        }

        Ok(spec)
    }

    fn classify_composite(
        &self,
        dataset: &Dataset,
        columns: &[usize],
    ) -> ClassifyResult<FeatureSpec> {
        let mut granularity: Option<DatetimeGranularity> = None;
        let mut all_datetime = true;
        for &index in columns {
            match finest_granularity(dataset.column(index)?) {
                Some(g) if all_datetime => {
                    granularity = Some(granularity.map_or(g, |current| current.max(g)));
                }
                _ => all_datetime = false,
            }
        }

        let value_class = if all_datetime {
            ValueClass::Datetime
        } else {
            ValueClass::String
        };
        let spec = FeatureSpec::new(
            dataset,
            columns.to_vec(),
            DistributionClass::TokenCategorical,
            value_class,
        )?
        .with_params(&self.params);

        Ok(match granularity {
            Some(g) if all_datetime => spec.with_datetime_granularity(g, &self.params),
            _ => spec,
        })
    }

    fn value_class(
        &self,
        column: &Column,
        profile: &ColumnProfile,
        hints: &SemanticHints,
    ) -> ValueClass {
        if column.storage().is_numeric() {
            return ValueClass::Number;
        }
        match hints.get(column) {
            Some(SemanticType::Number) => return ValueClass::Number,
            Some(SemanticType::Datetime) => return ValueClass::Datetime,
            Some(SemanticType::Other) => return ValueClass::Other,
            Some(SemanticType::Text) | None => {}
        }
        if profile.present_count() > 0
            && profile.ratio_of_numeric_values >= self.config.numeric_ratio
        {
            return ValueClass::Number;
        }
        if finest_granularity(column).is_some() {
            return ValueClass::Datetime;
        }
        ValueClass::String
    }

    fn distribution_class(&self, profile: &ColumnProfile) -> DistributionClass {
        match profile.repetition_ratio() {
            None => DistributionClass::NonCategorical,
            Some(ratio) if ratio >= self.config.categorical_ratio => DistributionClass::Categorical,
            Some(_) => {
                let repeated = profile
                    .tokens
                    .as_ref()
                    .filter(|tokens| !tokens.most_common.is_empty())
                    .map(|tokens| {
                        tokens.repeated_top_tokens(2) as f64
                            >= self.config.token_repeat_fraction * tokens.most_common.len() as f64
                    })
                    .unwrap_or(false);
                if repeated {
                    DistributionClass::TokenCategorical
                } else {
                    DistributionClass::NonCategorical
                }
            }
        }
    }

    fn length_class(&self, profile: &ColumnProfile) -> StringLengthClass {
        let avg = profile
            .tokens
            .as_ref()
            .map_or(0.0, |tokens| tokens.avg_tokens_per_value);
        if avg <= self.config.short_max_tokens {
            StringLengthClass::Short
        } else if avg <= self.config.phrase_max_tokens {
            StringLengthClass::Phrase
        } else if avg <= self.config.sentence_max_tokens {
            StringLengthClass::Sentence
        } else {
            StringLengthClass::Paragraph
        }
    }
}

/// Finest granularity over the column's boundary sample, `None` unless every
/// sampled value is a date/time
fn finest_granularity(column: &Column) -> Option<DatetimeGranularity> {
    let sample = column.boundary_sample();
    if sample.is_empty() {
        return None;
    }
    let mut finest: Option<DatetimeGranularity> = None;
    for value in sample {
        let (_, granularity) = value_as_datetime(value)?;
        finest = Some(finest.map_or(granularity, |g| g.max(granularity)));
    }
    finest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Value;
    use crate::profile::{ColumnProfiler, profile_dataset};
    use crate::similarity::SimilarityFunction;

    fn classify(
        dataset: &Dataset,
        columns: &[usize],
        hints: &SemanticHints,
    ) -> ClassifyResult<FeatureSpec> {
        let profiles = profile_dataset(&ColumnProfiler::new(), dataset, columns).unwrap();
        FeatureClassifier::new().classify(dataset, columns, &profiles, hints)
    }

    fn text_dataset(values: &[&str]) -> Dataset {
        Dataset::from_rows(
            "d",
            &["c"],
            values.iter().map(|v| vec![Value::from(*v)]).collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_categorical_string() {
        let ds = text_dataset(&["a", "b", "a", "b", "a", "c"]);
        let spec = classify(&ds, &[0], &SemanticHints::new()).unwrap();
        assert_eq!(spec.distribution(), DistributionClass::Categorical);
        assert_eq!(spec.value_class(), ValueClass::String);
        assert_eq!(spec.similarity(), &[SimilarityFunction::ExactMatch]);
    }

    #[test]
    fn test_numeric_column_uses_decay() {
        let ds = Dataset::from_rows(
            "d",
            &["n"],
            vec![
                vec![Value::from(0.0)],
                vec![Value::from(40.0)],
                vec![Value::from(100.0)],
            ],
        )
        .unwrap();
        let spec = classify(&ds, &[0], &SemanticHints::new()).unwrap();
        assert_eq!(spec.value_class(), ValueClass::Number);
        assert_eq!(spec.distribution(), DistributionClass::NonCategorical);
        assert_eq!(spec.numeric_range(), Some((0.0, 100.0)));
        assert!(matches!(
            spec.similarity()[0],
            SimilarityFunction::NumericDecay { range, .. } if range == 100.0
        ));
    }

    #[test]
    fn test_numeric_text_is_number() {
        let ds = text_dataset(&["1", "2", "3"]);
        let spec = classify(&ds, &[0], &SemanticHints::new()).unwrap();
        assert_eq!(spec.value_class(), ValueClass::Number);
    }

    #[test]
    fn test_datetime_text() {
        let ds = text_dataset(&["2024-01-01", "2024-01-02", "2024-01-03"]);
        let spec = classify(&ds, &[0], &SemanticHints::new()).unwrap();
        assert_eq!(spec.value_class(), ValueClass::Datetime);
        assert_eq!(spec.datetime_granularity(), Some(DatetimeGranularity::Day));
        assert_eq!(
            spec.similarity(),
            &[SimilarityFunction::DatetimeExact {
                resolution: DatetimeGranularity::Day
            }]
        );
    }

    #[test]
    fn test_datetime_text_with_trailing_blank() {
        let ds = text_dataset(&[
            "2024-01-01 10:00",
            "2024-02-03 11:00",
            "2024-03-05 12:00",
            "  ",
        ]);
        let spec = classify(&ds, &[0], &SemanticHints::new()).unwrap();
        assert_eq!(spec.value_class(), ValueClass::Datetime);
        assert!(spec.datetime_granularity().is_some());
    }

    #[test]
    fn test_hint_overrides_inference() {
        let ds = text_dataset(&["x1", "x2", "x3"]);
        let hints = SemanticHints::new().with_hint("c", SemanticType::Number);
        let spec = classify(&ds, &[0], &hints).unwrap();
        assert_eq!(spec.value_class(), ValueClass::Number);
    }

    #[test]
    fn test_datetime_hint_without_dates_fails() {
        let ds = text_dataset(&["x1", "x2", "x3"]);
        let hints = SemanticHints::new().with_hint("c", SemanticType::Datetime);
        let err = classify(&ds, &[0], &hints).unwrap_err();
        assert_eq!(err, ClassifyError::NoDatetimeValues("c".to_string()));
    }

    #[test]
    fn test_token_categorical() {
        let ds = text_dataset(&[
            "north road",
            "south road",
            "east road",
            "north lane",
            "west lane",
        ]);
        let spec = classify(&ds, &[0], &SemanticHints::new()).unwrap();
        assert_eq!(spec.distribution(), DistributionClass::TokenCategorical);
        assert_eq!(
            spec.similarity(),
            &[SimilarityFunction::Jaccard, SimilarityFunction::Cosine]
        );
    }

    #[test]
    fn test_short_unique_strings() {
        let ds = text_dataset(&["alpha", "bravo", "charlie", "delta"]);
        let spec = classify(&ds, &[0], &SemanticHints::new()).unwrap();
        assert_eq!(spec.distribution(), DistributionClass::NonCategorical);
        assert_eq!(spec.length_class(), Some(StringLengthClass::Short));
        assert_eq!(spec.similarity()[0], SimilarityFunction::Levenshtein);
    }

    #[test]
    fn test_all_missing_column_is_non_categorical() {
        let ds =
            Dataset::from_rows("d", &["c"], vec![vec![Value::Null], vec![Value::Null]]).unwrap();
        let spec = classify(&ds, &[0], &SemanticHints::new()).unwrap();
        assert_eq!(spec.distribution(), DistributionClass::NonCategorical);
        assert_eq!(spec.value_class(), ValueClass::String);
    }

    #[test]
    fn test_composite_feature() {
        let ds = Dataset::from_rows(
            "d",
            &["first", "last"],
            vec![
                vec![Value::from("Ada"), Value::from("Lovelace")],
                vec![Value::from("Alan"), Value::from("Turing")],
            ],
        )
        .unwrap();
        let spec = classify(&ds, &[0, 1], &SemanticHints::new()).unwrap();
        assert_eq!(spec.distribution(), DistributionClass::TokenCategorical);
        assert_eq!(spec.value_class(), ValueClass::String);
    }

    #[test]
    fn test_composite_datetime_feature() {
        let ds = Dataset::from_rows(
            "d",
            &["start", "end"],
            vec![vec![Value::from("2024-01-01"), Value::from("2024-01-02 10:00")]],
        )
        .unwrap();
        let spec = classify(&ds, &[0, 1], &SemanticHints::new()).unwrap();
        assert_eq!(spec.value_class(), ValueClass::Datetime);
        assert_eq!(spec.datetime_granularity(), Some(DatetimeGranularity::Minute));
    }

    #[test]
    fn test_missing_profile() {
        let ds = text_dataset(&["a"]);
        let err = FeatureClassifier::new()
            .classify(&ds, &[0], &BTreeMap::new(), &SemanticHints::new())
            .unwrap_err();
        assert_eq!(err, ClassifyError::MissingProfile(0));
    }

    #[test]
    fn test_classify_join_spec() {
        let left = text_dataset(&["a", "a", "b"]);
        let right = text_dataset(&["b", "b", "a"]);
        let spec = JoinSpec::from_columns(&[0], &[0]).unwrap();
        let profiler = ColumnProfiler::new();
        let lp = profile_dataset(&profiler, &left, &[0]).unwrap();
        let rp = profile_dataset(&profiler, &right, &[0]).unwrap();

        let pairs = FeatureClassifier::new()
            .classify_join_spec(&left, &right, &spec, &lp, &rp, &SemanticHints::new())
            .unwrap();
        assert_eq!(pairs.len(), 1);
        assert!(pairs[0].is_categorical_string());
    }
}
