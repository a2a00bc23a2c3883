//! Feature types

use serde::{Deserialize, Serialize};

use super::config::SimilarityParams;
use super::error::{ClassifyError, ClassifyResult};
use crate::dataset::{Dataset, DatasetId, Value};
use crate::profile::DatetimeGranularity;
use crate::similarity::SimilarityFunction;

/// How the values of a feature are distributed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DistributionClass {
    /// Few values, each repeated
    Categorical,
    /// Free text with repeated tokens
    TokenCategorical,
    /// Mostly unique values
    NonCategorical,
}

impl std::fmt::Display for DistributionClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Categorical => write!(f, "categorical"),
            Self::TokenCategorical => write!(f, "token-categorical"),
            Self::NonCategorical => write!(f, "non-categorical"),
        }
    }
}

/// Comparison domain of a feature's values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueClass {
    Number,
    String,
    Datetime,
    Other,
}

impl std::fmt::Display for ValueClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number => write!(f, "number"),
            Self::String => write!(f, "string"),
            Self::Datetime => write!(f, "datetime"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Length tier of free-text values, by average tokens per value
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StringLengthClass {
    Short,
    Phrase,
    Sentence,
    Paragraph,
}

/// How the cells of a feature's columns combine into one comparable value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MergeStrategy {
    /// The single column's value, stringified
    Identity,
    /// Present column values joined with a single space
    SpaceJoin,
}

impl MergeStrategy {
    /// Merge the cells of one row; `None` when nothing is present
    pub fn merge<'a, I>(&self, cells: I) -> Option<String>
    where
        I: IntoIterator<Item = &'a Value>,
    {
        let mut parts = cells
            .into_iter()
            .filter_map(Value::to_text)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());

        match self {
            Self::Identity => parts.next(),
            Self::SpaceJoin => {
                let parts: Vec<String> = parts.collect();
                if parts.is_empty() {
                    None
                } else {
                    Some(parts.join(" "))
                }
            }
        }
    }
}

/// A typed, comparable join candidate built from one or more columns of
/// one dataset
///
/// Immutable once built; multi-column features are composites whose values
/// are merged per row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureSpec {
    dataset_id: DatasetId,
    name: String,
    columns: Vec<usize>,
    distribution: DistributionClass,
    value_class: ValueClass,
    length_class: Option<StringLengthClass>,
    merge: MergeStrategy,
    similarity: Vec<SimilarityFunction>,
    numeric_range: Option<(f64, f64)>,
    datetime_granularity: Option<DatetimeGranularity>,
}

impl FeatureSpec {
    /// Build a feature with explicit classes
    ///
    /// The similarity list comes from the dispatch table in
    /// [`ranked_similarity`]; unsupported class combinations fall back to
    /// non-categorical strings compared by exact match.
    pub fn new(
        dataset: &Dataset,
        columns: Vec<usize>,
        distribution: DistributionClass,
        value_class: ValueClass,
    ) -> ClassifyResult<Self> {
        if columns.is_empty() {
            return Err(ClassifyError::EmptyColumnGroup);
        }
        let mut names = Vec::with_capacity(columns.len());
        for &index in &columns {
            names.push(dataset.column(index)?.name().to_string());
        }
        let merge = if columns.len() > 1 {
            MergeStrategy::SpaceJoin
        } else {
            MergeStrategy::Identity
        };

        let mut spec = Self {
            dataset_id: dataset.id(),
            name: names.join("+"),
            columns,
            distribution,
            value_class,
            length_class: None,
            merge,
            similarity: Vec::new(),
            numeric_range: None,
            datetime_granularity: None,
        };
        spec.rerank(&SimilarityParams::default());
        Ok(spec)
    }

    /// Set the string length tier and re-rank
    pub fn with_length_class(
        mut self,
        length: StringLengthClass,
        params: &SimilarityParams,
    ) -> Self {
        self.length_class = Some(length);
        self.rerank(params);
        self
    }

    /// Set the observed numeric `(min, max)` and re-rank
    pub fn with_numeric_range(mut self, min: f64, max: f64, params: &SimilarityParams) -> Self {
        self.numeric_range = Some((min.min(max), min.max(max)));
        self.rerank(params);
        self
    }

    /// Set the finest observed date/time granularity and re-rank
    pub fn with_datetime_granularity(
        mut self,
        granularity: DatetimeGranularity,
        params: &SimilarityParams,
    ) -> Self {
        self.datetime_granularity = Some(granularity);
        self.rerank(params);
        self
    }

    /// Re-rank with explicit parameters
    pub fn with_params(mut self, params: &SimilarityParams) -> Self {
        self.rerank(params);
        self
    }

    /// Replace the ranked similarity list
    pub fn with_similarity(mut self, similarity: Vec<SimilarityFunction>) -> Self {
        self.similarity = similarity;
        self
    }

    fn rerank(&mut self, params: &SimilarityParams) {
        match ranked_similarity(
            self.distribution,
            self.value_class,
            self.length_class,
            self.numeric_range,
            self.datetime_granularity,
            params,
        ) {
            Some(ranked) => self.similarity = ranked,
            None => {
                self.distribution = DistributionClass::NonCategorical;
                self.value_class = ValueClass::String;
                self.similarity = vec![SimilarityFunction::ExactMatch];
            }
        }
    }

    pub fn dataset_id(&self) -> DatasetId {
        self.dataset_id
    }

    /// Column names joined with `+`
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[usize] {
        &self.columns
    }

    pub fn distribution(&self) -> DistributionClass {
        self.distribution
    }

    pub fn value_class(&self) -> ValueClass {
        self.value_class
    }

    pub fn length_class(&self) -> Option<StringLengthClass> {
        self.length_class
    }

    pub fn merge_strategy(&self) -> MergeStrategy {
        self.merge
    }

    /// Ranked similarity functions, best first
    pub fn similarity(&self) -> &[SimilarityFunction] {
        &self.similarity
    }

    pub fn numeric_range(&self) -> Option<(f64, f64)> {
        self.numeric_range
    }

    pub fn datetime_granularity(&self) -> Option<DatetimeGranularity> {
        self.datetime_granularity
    }

    /// Whether this is a categorical string feature
    pub fn is_categorical_string(&self) -> bool {
        self.distribution == DistributionClass::Categorical
            && self.value_class == ValueClass::String
    }

    /// Whether this is a non-categorical string feature
    pub fn is_free_string(&self) -> bool {
        self.distribution == DistributionClass::NonCategorical
            && self.value_class == ValueClass::String
    }

    /// Merged value of one row, `None` when missing
    pub fn merged_value(&self, dataset: &Dataset, row: usize) -> Option<String> {
        self.merge.merge(
            self.columns
                .iter()
                .filter_map(|&column| dataset.value(row, column)),
        )
    }

    /// Merged values of every row
    pub fn merged_values(&self, dataset: &Dataset) -> Vec<Option<String>> {
        (0..dataset.row_count())
            .map(|row| self.merged_value(dataset, row))
            .collect()
    }
}

/// The ranked similarity functions for a class combination
///
/// Returns `None` for combinations without an entry; callers fall back to
/// exact matching.
pub fn ranked_similarity(
    distribution: DistributionClass,
    value_class: ValueClass,
    length: Option<StringLengthClass>,
    numeric_range: Option<(f64, f64)>,
    granularity: Option<DatetimeGranularity>,
    params: &SimilarityParams,
) -> Option<Vec<SimilarityFunction>> {
    use DistributionClass::*;
    use SimilarityFunction as F;

    let hybrid = F::HybridJaccard {
        inner_threshold: params.hybrid_inner_threshold,
    };

    let ranked = match (distribution, value_class) {
        (_, ValueClass::Datetime) => {
            let resolution = granularity.map_or(params.datetime_resolution, |g| {
                g.coarsest(params.datetime_resolution)
            });
            vec![F::DatetimeExact { resolution }]
        }
        (Categorical, ValueClass::Number | ValueClass::String) => vec![F::ExactMatch],
        (TokenCategorical, ValueClass::String) => vec![F::Jaccard, F::Cosine],
        (NonCategorical, ValueClass::Number) => {
            let range = numeric_range.map_or(0.0, |(min, max)| max - min);
            vec![F::NumericDecay {
                range,
                sigma: params.decay_sigma,
            }]
        }
        (NonCategorical, ValueClass::String) => match length.unwrap_or(StringLengthClass::Short) {
            StringLengthClass::Short => vec![
                F::Levenshtein,
                F::JaroWinkler,
                F::NGram {
                    n: params.ngram_size,
                },
            ],
            StringLengthClass::Phrase => vec![
                hybrid,
                F::NGram {
                    n: params.ngram_size,
                },
            ],
            StringLengthClass::Sentence => vec![hybrid, F::TfIdfCosine],
            StringLengthClass::Paragraph => vec![F::TfIdf, hybrid, F::TfIdfCosine],
        },
        _ => return None,
    };
    Some(ranked)
}

/// A candidate join key: one feature from each of two different datasets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeaturePair {
    left: FeatureSpec,
    right: FeatureSpec,
}

impl FeaturePair {
    /// Pair two features; both must come from different datasets
    pub fn new(left: FeatureSpec, right: FeatureSpec) -> ClassifyResult<Self> {
        if left.dataset_id() == right.dataset_id() {
            return Err(ClassifyError::SameDataset(left.dataset_id().to_string()));
        }
        Ok(Self { left, right })
    }

    pub fn left(&self) -> &FeatureSpec {
        &self.left
    }

    pub fn right(&self) -> &FeatureSpec {
        &self.right
    }

    /// Both sides categorical strings
    pub fn is_categorical_string(&self) -> bool {
        self.left.is_categorical_string() && self.right.is_categorical_string()
    }

    /// Both sides non-categorical strings
    pub fn is_free_string(&self) -> bool {
        self.left.is_free_string() && self.right.is_free_string()
    }

    /// Short description for logs, e.g. `city ~ town`
    pub fn describe(&self) -> String {
        format!("{} ~ {}", self.left.name(), self.right.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Dataset {
        Dataset::from_rows(
            "d",
            &["first", "last", "age"],
            vec![
                vec![Value::from("Ada"), Value::from(" Lovelace "), Value::from(36.0)],
                vec![Value::Null, Value::from("Turing"), Value::Null],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_merge_strategies() {
        let ds = dataset();
        let single = FeatureSpec::new(
            &ds,
            vec![2],
            DistributionClass::NonCategorical,
            ValueClass::Number,
        )
        .unwrap();
        assert_eq!(single.merged_value(&ds, 0).as_deref(), Some("36"));
        assert_eq!(single.merged_value(&ds, 1), None);

        let multi = FeatureSpec::new(
            &ds,
            vec![0, 1],
            DistributionClass::TokenCategorical,
            ValueClass::String,
        )
        .unwrap();
        assert_eq!(multi.merge_strategy(), MergeStrategy::SpaceJoin);
        assert_eq!(multi.name(), "first+last");
        assert_eq!(
            multi.merged_values(&ds),
            vec![Some("Ada Lovelace".to_string()), Some("Turing".to_string())]
        );
    }

    #[test]
    fn test_empty_column_group_rejected() {
        let ds = dataset();
        let err = FeatureSpec::new(
            &ds,
            vec![],
            DistributionClass::Categorical,
            ValueClass::String,
        )
        .unwrap_err();
        assert_eq!(err, ClassifyError::EmptyColumnGroup);
    }

    #[test]
    fn test_unsupported_combination_falls_back() {
        let ds = dataset();
        let spec = FeatureSpec::new(
            &ds,
            vec![0],
            DistributionClass::TokenCategorical,
            ValueClass::Number,
        )
        .unwrap();
        assert_eq!(spec.distribution(), DistributionClass::NonCategorical);
        assert_eq!(spec.value_class(), ValueClass::String);
        assert_eq!(spec.similarity(), &[SimilarityFunction::ExactMatch]);
    }

    #[test]
    fn test_dispatch_table() {
        let params = SimilarityParams::default();
        let categorical = ranked_similarity(
            DistributionClass::Categorical,
            ValueClass::String,
            None,
            None,
            None,
            &params,
        )
        .unwrap();
        assert_eq!(categorical, vec![SimilarityFunction::ExactMatch]);

        let paragraph = ranked_similarity(
            DistributionClass::NonCategorical,
            ValueClass::String,
            Some(StringLengthClass::Paragraph),
            None,
            None,
            &params,
        )
        .unwrap();
        assert_eq!(paragraph[0], SimilarityFunction::TfIdf);
        assert_eq!(paragraph.len(), 3);

        let decay = ranked_similarity(
            DistributionClass::NonCategorical,
            ValueClass::Number,
            None,
            Some((0.0, 100.0)),
            None,
            &params,
        )
        .unwrap();
        assert_eq!(
            decay,
            vec![SimilarityFunction::NumericDecay {
                range: 100.0,
                sigma: 0.5
            }]
        );

        let datetime = ranked_similarity(
            DistributionClass::Categorical,
            ValueClass::Datetime,
            None,
            None,
            Some(DatetimeGranularity::Day),
            &params,
        )
        .unwrap();
        assert_eq!(
            datetime,
            vec![SimilarityFunction::DatetimeExact {
                resolution: DatetimeGranularity::Day
            }]
        );
    }

    #[test]
    fn test_feature_pair_rejects_same_dataset() {
        let ds = dataset();
        let a = FeatureSpec::new(
            &ds,
            vec![0],
            DistributionClass::Categorical,
            ValueClass::String,
        )
        .unwrap();
        let err = FeaturePair::new(a.clone(), a).unwrap_err();
        assert!(matches!(err, ClassifyError::SameDataset(_)));
    }
}
