//! CLI command for augmenting a table with a second one

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Duration;

use table_fusion_core::dataset::{Dataset, SemanticType};
use table_fusion_core::feature::{JoinSpec, SemanticHints};
use table_fusion_core::join::JoinOrchestrator;

use super::InputOptions;
use crate::cli::error::CliError;
use crate::cli::output::{format_join_report, write_csv};
use crate::config::FusionConfig;

/// Arguments for the `augment` command
pub struct AugmentArgs {
    /// Table to augment
    pub left: PathBuf,
    /// Table providing the new columns
    pub right: PathBuf,
    /// Candidate join specs, e.g. `first+last=name,zip=postcode`
    pub specs: Vec<String>,
    /// Semantic type hints, e.g. `founded=datetime`
    pub hints: Vec<String>,
    /// Output CSV (stdout if not provided)
    pub output: Option<PathBuf>,
    /// Write the run report as JSON
    pub report: Option<PathBuf>,
    /// Overrides the configured time budget
    pub timeout_ms: Option<u64>,
    /// Fail when no spec matches anything
    pub require_match: bool,
    pub input_options: InputOptions,
}

/// Handle the `augment` command
pub fn handle_augment(args: &AugmentArgs, config: &FusionConfig) -> Result<(), CliError> {
    let left = args.input_options.load(&args.left)?;
    let right = args.input_options.load(&args.right)?;

    let specs = if args.specs.is_empty() {
        shared_column_specs(&left, &right)?
    } else {
        args.specs
            .iter()
            .map(|spec| parse_join_spec(&left, &right, spec))
            .collect::<Result<Vec<_>, _>>()?
    };

    let mut hints = SemanticHints::new();
    for hint in &args.hints {
        let (column, semantic) = parse_hint(hint)?;
        hints = hints.with_hint(column, semantic);
    }

    eprintln!(
        "Augmenting {} ({} rows) with {} ({} rows) using {} join spec(s)...",
        left.name(),
        left.row_count(),
        right.name(),
        right.row_count(),
        specs.len()
    );

    let mut augment_config = config.augment.clone();
    if let Some(ms) = args.timeout_ms {
        augment_config = augment_config.with_timeout(Duration::from_millis(ms));
    }
    let orchestrator = JoinOrchestrator::with_config(augment_config).with_hints(hints);
    let result = orchestrator.augment(&left, &right, &specs);

    eprint!("{}", format_join_report(&result));

    if let Some(path) = &args.report {
        let json = serde_json::to_string_pretty(&result.report).map_err(|e| CliError::Write {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        std::fs::write(path, json).map_err(|e| CliError::Write {
            path: path.clone(),
            reason: e.to_string(),
        })?;
    }

    if args.require_match && result.matches.is_empty() {
        return Err(CliError::NotAugmented);
    }

    match &args.output {
        Some(path) => {
            let file = File::create(path).map_err(|e| CliError::Write {
                path: path.clone(),
                reason: e.to_string(),
            })?;
            write_csv(&result.dataset, BufWriter::new(file)).map_err(|e| CliError::Write {
                path: path.clone(),
                reason: e.to_string(),
            })?;
            eprintln!("Joined table written to: {}", path.display());
        }
        None => write_csv(&result.dataset, std::io::stdout().lock()).map_err(|e| {
            CliError::Write {
                path: PathBuf::from("<stdout>"),
                reason: e.to_string(),
            }
        })?,
    }

    Ok(())
}

/// Parse `a+b=c,d=e` into a join spec over named columns
pub fn parse_join_spec(left: &Dataset, right: &Dataset, spec: &str) -> Result<JoinSpec, CliError> {
    let invalid = |reason: &str| CliError::InvalidSpec {
        spec: spec.to_string(),
        reason: reason.to_string(),
    };

    let mut left_groups = Vec::new();
    let mut right_groups = Vec::new();
    for pairing in spec.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (l, r) = pairing
            .split_once('=')
            .ok_or_else(|| invalid("each pairing needs one '='"))?;
        left_groups.push(resolve_group(left, l)?);
        right_groups.push(resolve_group(right, r)?);
    }

    if left_groups.is_empty() {
        return Err(invalid("no column pairings"));
    }
    Ok(JoinSpec::new(left_groups, right_groups)?)
}

/// One single-column spec per column name both tables share
pub fn shared_column_specs(left: &Dataset, right: &Dataset) -> Result<Vec<JoinSpec>, CliError> {
    let specs = left
        .columns()
        .iter()
        .enumerate()
        .filter_map(|(l, column)| right.column_index(column.name()).map(|r| (l, r)))
        .map(|(l, r)| JoinSpec::from_columns(&[l], &[r]))
        .collect::<Result<Vec<_>, _>>()?;

    if specs.is_empty() {
        return Err(CliError::InvalidArgument(
            "no --on given and the tables share no column names".to_string(),
        ));
    }
    Ok(specs)
}

fn resolve_group(dataset: &Dataset, group: &str) -> Result<Vec<usize>, CliError> {
    group
        .split('+')
        .map(str::trim)
        .map(|name| {
            dataset
                .column_index(name)
                .ok_or_else(|| CliError::UnknownColumn {
                    dataset: dataset.name().to_string(),
                    column: name.to_string(),
                })
        })
        .collect()
}

fn parse_hint(hint: &str) -> Result<(String, SemanticType), CliError> {
    let invalid = || {
        CliError::InvalidArgument(format!(
            "hint '{hint}' must look like column=number|datetime|text|other"
        ))
    };
    let (column, kind) = hint.split_once('=').ok_or_else(invalid)?;
    let semantic = match kind.trim().to_ascii_lowercase().as_str() {
        "number" | "numeric" => SemanticType::Number,
        "datetime" | "date" => SemanticType::Datetime,
        "text" | "string" => SemanticType::Text,
        "other" => SemanticType::Other,
        _ => return Err(invalid()),
    };
    Ok((column.trim().to_string(), semantic))
}

#[cfg(test)]
mod tests {
    use super::*;
    use table_fusion_core::dataset::Value;

    fn tables() -> (Dataset, Dataset) {
        let left = Dataset::from_rows(
            "people",
            &["first", "last", "zip"],
            vec![vec![Value::from("Ada"), Value::from("Lovelace"), Value::from("N1")]],
        )
        .unwrap();
        let right = Dataset::from_rows(
            "registry",
            &["name", "zip"],
            vec![vec![Value::from("Ada Lovelace"), Value::from("N1")]],
        )
        .unwrap();
        (left, right)
    }

    #[test]
    fn test_parse_composite_spec() {
        let (left, right) = tables();
        let spec = parse_join_spec(&left, &right, "first+last=name, zip=zip").unwrap();
        assert_eq!(spec.len(), 2);
        assert_eq!(spec.pairings()[0].left, vec![0, 1]);
        assert_eq!(spec.pairings()[0].right, vec![0]);
        assert_eq!(spec.pairings()[1].right, vec![1]);
    }

    #[test]
    fn test_parse_spec_errors() {
        let (left, right) = tables();
        assert!(matches!(
            parse_join_spec(&left, &right, "first"),
            Err(CliError::InvalidSpec { .. })
        ));
        assert!(matches!(
            parse_join_spec(&left, &right, "middle=name"),
            Err(CliError::UnknownColumn { .. })
        ));
        assert!(matches!(
            parse_join_spec(&left, &right, " , "),
            Err(CliError::InvalidSpec { .. })
        ));
    }

    #[test]
    fn test_shared_column_specs() {
        let (left, right) = tables();
        let specs = shared_column_specs(&left, &right).unwrap();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].pairings()[0].left, vec![2]);
    }

    #[test]
    fn test_parse_hint() {
        assert_eq!(
            parse_hint("founded = Date").unwrap(),
            ("founded".to_string(), SemanticType::Datetime)
        );
        assert!(parse_hint("founded").is_err());
        assert!(parse_hint("founded=year").is_err());
    }
}
