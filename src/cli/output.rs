//! Output formatting for CLI

use std::collections::BTreeMap;
use std::io::Write;

use table_fusion_core::dataset::Dataset;
use table_fusion_core::join::{JoinResult, SpecOutcome};
use table_fusion_core::profile::ColumnProfile;

/// Format column profiles as an aligned table
pub fn format_profile_table(profiles: &BTreeMap<usize, ColumnProfile>) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "{:<24} {:<9} {:>8} {:>8} {:>9} {:>8} {:>7}  {}\n",
        "column", "storage", "rows", "missing", "distinct", "numeric", "tokens", "top tokens"
    ));

    for profile in profiles.values() {
        let (avg_tokens, top) = match &profile.tokens {
            Some(tokens) => (
                format!("{:.1}", tokens.avg_tokens_per_value),
                tokens
                    .most_common
                    .iter()
                    .take(3)
                    .map(|t| format!("{}({})", t.token, t.count))
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
            None => ("-".to_string(), String::new()),
        };

        output.push_str(&format!(
            "{:<24} {:<9} {:>8} {:>8} {:>9} {:>7.0}% {:>7}  {}\n",
            truncate(&profile.column_name, 24),
            profile.storage.to_string(),
            profile.row_count,
            profile.missing_count,
            profile.distinct_count,
            profile.ratio_of_numeric_values * 100.0,
            avg_tokens,
            top
        ));

        if let Some(numeric) = &profile.numeric {
            output.push_str(&format!(
                "{:<24} min {} max {} mean {:.3} std {:.3} outliers {}\n",
                "",
                numeric.min,
                numeric.max,
                numeric.mean,
                numeric.std_dev,
                numeric.outlier_count
            ));
        }
    }

    output
}

/// Format the per-spec report of an augmentation run
pub fn format_join_report(result: &JoinResult) -> String {
    let mut output = String::new();

    for spec in &result.report.specs {
        let marker = match (&spec.outcome, result.winning_spec, result.winning_candidate) {
            (SpecOutcome::Evaluated { .. }, Some(index), candidate)
                if index == spec.index && candidate == spec.candidate =>
            {
                "*"
            }
            (SpecOutcome::Evaluated { .. }, _, _) => " ",
            (SpecOutcome::Failed { .. }, _, _) => "!",
            (SpecOutcome::Cancelled, _, _) => "-",
        };
        let features = if spec.features.is_empty() {
            String::new()
        } else {
            format!(" [{}]", spec.features.join(", "))
        };
        output.push_str(&format!(
            "{} spec {}{}: {} in {}ms\n",
            marker, spec.index, features, spec.outcome, spec.duration_ms
        ));
    }

    match result.coverage() {
        Some(coverage) => output.push_str(&format!(
            "\nJoined {} of {} rows ({:.1}%), {} columns, in {}\n",
            result.matches.matched(),
            result.matches.left_rows,
            coverage * 100.0,
            result.dataset.column_count(),
            result.report.duration_formatted()
        )),
        None => output.push_str(&format!(
            "\nNo join spec succeeded; left table returned unchanged ({})\n",
            result.report.duration_formatted()
        )),
    }

    output
}

/// Write a dataset as CSV with a header row; missing cells are empty
pub fn write_csv<W: Write>(dataset: &Dataset, writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(dataset.columns().iter().map(|c| c.name()))?;
    for row in 0..dataset.row_count() {
        let record: Vec<String> = dataset
            .columns()
            .iter()
            .map(|column| column.get(row).and_then(|v| v.to_text()).unwrap_or_default())
            .collect();
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        value.to_string()
    } else {
        let kept: String = value.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}
