//! Column profiler

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::config::ProfilerConfig;
use super::error::ProfileResult;
use super::language::{LanguageDetector, ScriptDetector, dominant};
use super::types::{
    ColumnProfile, NumericStats, PunctuationStats, TokenCount, TokenStats, WhitespaceStats,
};
use crate::dataset::{Column, Dataset, Value};

static WORD_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").unwrap());

static PUNCTUATION_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\p{P}").unwrap());

/// Computes [`ColumnProfile`]s
///
/// Profiling is a pure function of the column's values and is defined for
/// every input, including empty and all-missing columns.
#[derive(Clone)]
pub struct ColumnProfiler {
    config: ProfilerConfig,
    detector: Arc<dyn LanguageDetector>,
}

impl std::fmt::Debug for ColumnProfiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColumnProfiler")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for ColumnProfiler {
    fn default() -> Self {
        Self::new()
    }
}

impl ColumnProfiler {
    /// Create a profiler with default configuration
    pub fn new() -> Self {
        Self::with_config(ProfilerConfig::default())
    }

    /// Create a profiler with custom configuration
    pub fn with_config(config: ProfilerConfig) -> Self {
        Self {
            config,
            detector: Arc::new(ScriptDetector),
        }
    }

    /// Replace the language detector
    pub fn with_language_detector(mut self, detector: Arc<dyn LanguageDetector>) -> Self {
        self.detector = detector;
        self
    }

    /// Profiler configuration
    pub fn config(&self) -> &ProfilerConfig {
        &self.config
    }

    /// Profile a single column
    pub fn profile(&self, column: &Column) -> ColumnProfile {
        let mut profile = ColumnProfile::empty(column.name(), column.storage());
        profile.row_count = column.len();

        let present = self.present_values(column.values(), &mut profile.whitespace);
        profile.missing_count = profile.row_count - present.len();

        if present.is_empty() {
            debug!(column = column.name(), "Column has no present values");
            return profile;
        }

        let present_count = present.len() as f64;

        let distinct: HashSet<&str> = present.iter().map(String::as_str).collect();
        profile.distinct_count = distinct.len();
        profile.distinct_ratio = distinct.len() as f64 / present_count;

        let numbers: Vec<f64> = column
            .values()
            .iter()
            .filter_map(Value::as_f64)
            .collect();
        profile.numeric_count = numbers.len();
        profile.ratio_of_numeric_values = numbers.len() as f64 / present_count;
        profile.numeric = self.numeric_stats(&numbers);

        let mut digits = 0usize;
        let mut visible = 0usize;
        let mut chars = 0usize;
        for text in &present {
            for c in text.chars() {
                chars += 1;
                if !c.is_whitespace() {
                    visible += 1;
                }
                if c.is_ascii_digit() {
                    digits += 1;
                }
            }
        }
        profile.numeric_char_density = if visible == 0 {
            0.0
        } else {
            digits as f64 / visible as f64
        };
        profile.avg_char_length = chars as f64 / present_count;

        if self.config.collect_tokens {
            profile.tokens = Some(self.token_stats(
                &present,
                |text| text.split_whitespace().map(str::to_lowercase).collect(),
            ));
            profile.punctuation_tokens = Some(self.token_stats(&present, |text| {
                WORD_REGEX
                    .find_iter(text)
                    .map(|m| m.as_str().to_lowercase())
                    .collect()
            }));
            profile.punctuation = Some(self.punctuation_stats(&present));
        }

        profile.language = self.detect_language(&present);

        debug!(
            column = column.name(),
            rows = profile.row_count,
            missing = profile.missing_count,
            distinct = profile.distinct_count,
            "Profiled column"
        );

        profile
    }

    /// Stringified, trimmed present values in row order
    fn present_values(&self, values: &[Value], whitespace: &mut WhitespaceStats) -> Vec<String> {
        let mut present = Vec::with_capacity(values.len());
        for value in values {
            match value {
                Value::Text(s) => {
                    if s.starts_with(char::is_whitespace) {
                        whitespace.leading += 1;
                    }
                    if s.ends_with(char::is_whitespace) {
                        whitespace.trailing += 1;
                    }
                    let trimmed = s.trim();
                    if trimmed.is_empty() {
                        whitespace.emptied += usize::from(!s.is_empty());
                    } else {
                        present.push(trimmed.to_string());
                    }
                }
                other => {
                    if let Some(text) = other.to_text() {
                        present.push(text);
                    }
                }
            }
        }
        present
    }

    fn numeric_stats(&self, numbers: &[f64]) -> Option<NumericStats> {
        if numbers.is_empty() {
            return None;
        }

        let count = numbers.len() as f64;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for &n in numbers {
            min = min.min(n);
            max = max.max(n);
            sum += n;
        }
        let mean = sum / count;
        let variance = numbers.iter().map(|n| (n - mean).powi(2)).sum::<f64>() / count;
        let std_dev = variance.sqrt();

        let limit = self.config.outlier_sigma * std_dev;
        let outlier_count = numbers
            .iter()
            .filter(|n| (*n - mean).abs() > limit)
            .count();

        Some(NumericStats {
            count: numbers.len(),
            min,
            max,
            mean,
            std_dev,
            outlier_count,
        })
    }

    fn token_stats<F>(&self, present: &[String], tokenize: F) -> TokenStats
    where
        F: Fn(&str) -> Vec<String>,
    {
        let mut counts: HashMap<String, usize> = HashMap::new();
        let mut token_count = 0usize;
        let mut with_digit_count = 0usize;

        for text in present {
            for token in tokenize(text) {
                token_count += 1;
                if token.chars().any(|c| c.is_ascii_digit()) {
                    with_digit_count += 1;
                }
                *counts.entry(token).or_insert(0) += 1;
            }
        }

        let distinct_count = counts.len();
        TokenStats {
            token_count,
            distinct_count,
            distinct_ratio: if token_count == 0 {
                0.0
            } else {
                distinct_count as f64 / token_count as f64
            },
            avg_tokens_per_value: token_count as f64 / present.len() as f64,
            with_digit_count,
            most_common: top_k(counts, self.config.top_k),
        }
    }

    fn punctuation_stats(&self, present: &[String]) -> PunctuationStats {
        let mut counts: HashMap<String, usize> = HashMap::new();
        let mut values_with_punctuation = 0usize;
        let mut mark_count = 0usize;

        for text in present {
            let mut seen = false;
            for mark in PUNCTUATION_REGEX.find_iter(text) {
                seen = true;
                mark_count += 1;
                *counts.entry(mark.as_str().to_string()).or_insert(0) += 1;
            }
            values_with_punctuation += usize::from(seen);
        }

        PunctuationStats {
            values_with_punctuation,
            mark_count,
            marks_per_value: mark_count as f64 / present.len() as f64,
            most_common: top_k(counts, self.config.top_k),
        }
    }

    fn detect_language(&self, present: &[String]) -> Option<String> {
        if self.config.language_sample == 0 {
            return None;
        }
        let mut tags: HashMap<String, usize> = HashMap::new();
        for text in present.iter().take(self.config.language_sample) {
            if let Some(tag) = self.detector.detect(text) {
                *tags.entry(tag).or_insert(0) += 1;
            }
        }
        dominant(tags)
    }
}

/// Keep the `k` most frequent entries, count descending then token ascending
fn top_k(counts: HashMap<String, usize>, k: usize) -> Vec<TokenCount> {
    let mut entries: Vec<TokenCount> = counts
        .into_iter()
        .map(|(token, count)| TokenCount { token, count })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.token.cmp(&b.token)));
    entries.truncate(k);
    entries
}

/// Profile the given columns of a dataset, keyed by column index
///
/// Only the requested columns are profiled; duplicates are profiled once.
pub fn profile_dataset(
    profiler: &ColumnProfiler,
    dataset: &Dataset,
    columns: &[usize],
) -> ProfileResult<BTreeMap<usize, ColumnProfile>> {
    let mut profiles = BTreeMap::new();
    for &index in columns {
        if profiles.contains_key(&index) {
            continue;
        }
        let column = dataset.column(index)?;
        profiles.insert(index, profiler.profile(column));
    }
    Ok(profiles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::StorageType;

    fn text_column(values: &[&str]) -> Column {
        Column::new("c", values.iter().map(|v| Value::from(*v)).collect())
    }

    #[test]
    fn test_all_missing_column() {
        let column = Column::new("c", vec![Value::Null, Value::Number(f64::NAN)]);
        let profile = ColumnProfiler::new().profile(&column);

        assert_eq!(profile.row_count, 2);
        assert_eq!(profile.missing_count, 2);
        assert_eq!(profile.distinct_count, 0);
        assert!(profile.numeric.is_none());
        assert!(profile.tokens.is_none());
        assert!(profile.language.is_none());
    }

    #[test]
    fn test_empty_column() {
        let profile = ColumnProfiler::new().profile(&Column::new("c", vec![]));
        assert_eq!(profile.row_count, 0);
        assert_eq!(profile.storage, StorageType::Empty);
    }

    #[test]
    fn test_whitespace_reclassified_as_missing() {
        let profile = ColumnProfiler::new().profile(&text_column(&["  a", "b ", "   ", "c"]));

        assert_eq!(profile.missing_count, 1);
        assert_eq!(profile.whitespace.leading, 2);
        assert_eq!(profile.whitespace.trailing, 2);
        assert_eq!(profile.whitespace.emptied, 1);
        assert_eq!(profile.distinct_count, 3);
    }

    #[test]
    fn test_numeric_stats_and_outliers() {
        let mut values: Vec<Value> = (0..20).map(|_| Value::Number(10.0)).collect();
        values.push(Value::Number(1000.0));
        let profile = ColumnProfiler::new().profile(&Column::new("n", values));

        let numeric = profile.numeric.unwrap();
        assert_eq!(numeric.count, 21);
        assert_eq!(numeric.min, 10.0);
        assert_eq!(numeric.max, 1000.0);
        assert_eq!(numeric.outlier_count, 1);
        assert_eq!(profile.ratio_of_numeric_values, 1.0);
    }

    #[test]
    fn test_single_value_has_no_outliers() {
        let profile = ColumnProfiler::new().profile(&Column::new("n", vec![Value::Number(5.0)]));
        let numeric = profile.numeric.unwrap();
        assert_eq!(numeric.std_dev, 0.0);
        assert_eq!(numeric.outlier_count, 0);
    }

    #[test]
    fn test_numeric_text_counts_as_numeric() {
        let profile = ColumnProfiler::new().profile(&text_column(&["1", "2.5", "x"]));
        assert_eq!(profile.numeric_count, 2);
        assert!((profile.ratio_of_numeric_values - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_token_stats() {
        let profile = ColumnProfiler::new().profile(&text_column(&[
            "Main Street",
            "Elm street",
            "main st.",
            "Route 66",
        ]));

        let tokens = profile.tokens.unwrap();
        assert_eq!(tokens.token_count, 8);
        assert_eq!(tokens.with_digit_count, 1);
        assert_eq!(tokens.most_common[0].token, "main");
        assert_eq!(tokens.most_common[0].count, 2);
        assert_eq!(tokens.most_common[1].token, "street");

        let punctuation_tokens = profile.punctuation_tokens.unwrap();
        assert!(punctuation_tokens.most_common.iter().any(|t| t.token == "st"));

        let punctuation = profile.punctuation.unwrap();
        assert_eq!(punctuation.values_with_punctuation, 1);
        assert_eq!(punctuation.mark_count, 1);
    }

    #[test]
    fn test_top_k_limit() {
        let config = ProfilerConfig::builder().top_k(2).build();
        let profile =
            ColumnProfiler::with_config(config).profile(&text_column(&["a b c d", "a b"]));
        let tokens = profile.tokens.unwrap();
        assert_eq!(tokens.most_common.len(), 2);
        assert_eq!(tokens.most_common[0].token, "a");
        assert_eq!(tokens.most_common[1].token, "b");
    }

    #[test]
    fn test_language_tag() {
        let profile =
            ColumnProfiler::new().profile(&text_column(&["Paris", "Berlin", "Москва"]));
        assert_eq!(profile.language.as_deref(), Some("Latn"));
    }

    #[test]
    fn test_failing_detector_is_not_an_error() {
        struct NeverDetects;
        impl LanguageDetector for NeverDetects {
            fn detect(&self, _text: &str) -> Option<String> {
                None
            }
        }

        let profiler = ColumnProfiler::new().with_language_detector(Arc::new(NeverDetects));
        let profile = profiler.profile(&text_column(&["Paris"]));
        assert!(profile.language.is_none());
        assert_eq!(profile.distinct_count, 1);
    }

    #[test]
    fn test_profile_is_deterministic() {
        let column = text_column(&["b a", "a b", "c", "a"]);
        let profiler = ColumnProfiler::new();
        assert_eq!(profiler.profile(&column), profiler.profile(&column));
    }

    #[test]
    fn test_numeric_char_density() {
        let profile = ColumnProfiler::new().profile(&text_column(&["ab12"]));
        assert_eq!(profile.numeric_char_density, 0.5);
        assert_eq!(profile.avg_char_length, 4.0);
    }

    #[test]
    fn test_profile_dataset_selected_columns() {
        let dataset = Dataset::from_rows(
            "d",
            &["a", "b", "c"],
            vec![vec![Value::from("x"), Value::from(1.0), Value::from("y")]],
        )
        .unwrap();

        let profiles = profile_dataset(&ColumnProfiler::new(), &dataset, &[2, 0, 2]).unwrap();
        assert_eq!(profiles.len(), 2);
        assert!(profiles.contains_key(&0));
        assert!(profiles.contains_key(&2));

        assert!(profile_dataset(&ColumnProfiler::new(), &dataset, &[7]).is_err());
    }
}
