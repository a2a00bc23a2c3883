//! Property-based tests for profiling, classification and matching
//!
//! ## Test Categories
//!
//! ### 1. Profiling
//! - Total and deterministic on any column, including empty and all-missing
//!
//! ### 2. Classification
//! - Repetition ratio at or above the threshold always yields Categorical
//!
//! ### 3. Matching
//! - Categorical pairs only accept case-insensitively equal values
//! - Deterministic, one-to-one, coverage within [0, 1]

use proptest::prelude::*;
use std::collections::HashSet;
use table_fusion_core::dataset::{Column, Dataset, Value};
use table_fusion_core::feature::{
    DistributionClass, FeatureClassifier, FeaturePair, FeatureSpec, SemanticHints, ValueClass,
};
use table_fusion_core::matching::{MatchResult, match_rows};
use table_fusion_core::profile::{ColumnProfiler, profile_dataset};

// ============================================================================
// Test Data Generation Utilities
// ============================================================================

fn cell_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        2 => Just(Value::Null),
        3 => (-1.0e6f64..1.0e6).prop_map(Value::Number),
        5 => "[ a-zA-Z0-9,.'-]{0,24}".prop_map(Value::Text),
    ]
}

fn word_column(max_rows: usize) -> impl Strategy<Value = Vec<Value>> {
    prop::collection::vec(
        prop_oneof![
            1 => Just(Value::Null),
            6 => prop::sample::select(vec![
                "alpha", "Alpha", "beta", "BETA", "gamma", "delta", "Delta",
            ])
            .prop_map(Value::from),
        ],
        0..max_rows,
    )
}

fn single(name: &str, values: Vec<Value>) -> Dataset {
    Dataset::new(name, vec![Column::new("key", values)]).unwrap()
}

fn pair(left: &Dataset, right: &Dataset, distribution: DistributionClass) -> FeaturePair {
    FeaturePair::new(
        FeatureSpec::new(left, vec![0], distribution, ValueClass::String).unwrap(),
        FeatureSpec::new(right, vec![0], distribution, ValueClass::String).unwrap(),
    )
    .unwrap()
}

fn assert_one_to_one(result: &MatchResult) -> Result<(), TestCaseError> {
    let lefts: HashSet<usize> = result.pairs.iter().map(|(l, _)| *l).collect();
    let rights: HashSet<usize> = result.pairs.iter().map(|(_, r)| *r).collect();
    prop_assert_eq!(lefts.len(), result.pairs.len());
    prop_assert_eq!(rights.len(), result.pairs.len());
    Ok(())
}

// ============================================================================
// Profiling
// ============================================================================

proptest! {
    #[test]
    fn prop_profile_is_total_and_deterministic(
        values in prop::collection::vec(cell_strategy(), 0..60)
    ) {
        let column = Column::new("c", values.clone());
        let profiler = ColumnProfiler::new();

        let first = profiler.profile(&column);
        let second = profiler.profile(&column);
        prop_assert_eq!(&first, &second);

        prop_assert_eq!(first.row_count, values.len());
        prop_assert!(first.missing_count <= first.row_count);
        prop_assert!(first.distinct_count <= first.present_count());
        prop_assert!((0.0..=1.0).contains(&first.missing_ratio()));
    }

    #[test]
    fn prop_all_missing_column_profiles(rows in 0usize..20) {
        let column = Column::new("c", vec![Value::Null; rows]);
        let profile = ColumnProfiler::new().profile(&column);
        prop_assert_eq!(profile.missing_count, rows);
        prop_assert_eq!(profile.distinct_count, 0);
        prop_assert!(profile.numeric.is_none());
    }
}

// ============================================================================
// Classification
// ============================================================================

proptest! {
    #[test]
    fn prop_repeated_values_are_categorical(distinct in 1usize..30, extra in 0usize..60) {
        let rows = (3 * distinct).div_ceil(2) + extra;
        let values: Vec<Value> = (0..rows)
            .map(|i| Value::Text(format!("v{}", i % distinct)))
            .collect();
        let dataset = single("d", values);

        let profiles = profile_dataset(&ColumnProfiler::new(), &dataset, &[0]).unwrap();
        prop_assert!(profiles[&0].repetition_ratio().unwrap() >= 1.5);

        let spec = FeatureClassifier::new()
            .classify(&dataset, &[0], &profiles, &SemanticHints::default())
            .unwrap();
        prop_assert_eq!(spec.distribution(), DistributionClass::Categorical);
    }
}

// ============================================================================
// Matching
// ============================================================================

proptest! {
    #[test]
    fn prop_categorical_matches_are_exact(left in word_column(30), right in word_column(30)) {
        let (left, right) = (single("l", left), single("r", right));
        let pairs = [pair(&left, &right, DistributionClass::Categorical)];
        let result = match_rows(&left, &right, &pairs).unwrap();

        for (l, r) in &result.pairs {
            let a = pairs[0].left().merged_value(&left, *l).unwrap();
            let b = pairs[0].right().merged_value(&right, *r).unwrap();
            prop_assert_eq!(a.to_lowercase(), b.to_lowercase());
        }
        assert_one_to_one(&result)?;
    }

    #[test]
    fn prop_fuzzy_matching_is_deterministic_and_one_to_one(
        left in word_column(25),
        right in word_column(25),
    ) {
        let (left, right) = (single("l", left), single("r", right));
        let pairs = [pair(&left, &right, DistributionClass::NonCategorical)];

        let first = match_rows(&left, &right, &pairs).unwrap();
        let second = match_rows(&left, &right, &pairs).unwrap();
        prop_assert_eq!(&first, &second);
        assert_one_to_one(&first)?;

        let coverage = first.coverage.unwrap();
        prop_assert!((0.0..=1.0).contains(&coverage));
        if first.pairs.is_empty() {
            prop_assert_eq!(coverage, 0.0);
        }
    }
}
