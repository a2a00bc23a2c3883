//! CLI command for column profiling

use std::path::PathBuf;

use table_fusion_core::profile::{ColumnProfiler, profile_dataset};

use super::InputOptions;
use crate::cli::error::CliError;
use crate::cli::output::format_profile_table;
use crate::config::FusionConfig;

/// Arguments for the `profile` command
pub struct ProfileArgs {
    /// Dataset file
    pub input: PathBuf,
    /// Columns to profile; all when empty
    pub columns: Vec<String>,
    /// Output format (table, json)
    pub format: String,
    pub input_options: InputOptions,
}

/// Handle the `profile` command
pub fn handle_profile(args: &ProfileArgs, config: &FusionConfig) -> Result<(), CliError> {
    let dataset = args.input_options.load(&args.input)?;

    let indices: Vec<usize> = if args.columns.is_empty() {
        (0..dataset.column_count()).collect()
    } else {
        args.columns
            .iter()
            .map(|name| {
                dataset
                    .column_index(name)
                    .ok_or_else(|| CliError::UnknownColumn {
                        dataset: dataset.name().to_string(),
                        column: name.clone(),
                    })
            })
            .collect::<Result<_, _>>()?
    };

    eprintln!(
        "Profiling {} column(s) of {} ({} rows)...",
        indices.len(),
        dataset.name(),
        dataset.row_count()
    );

    let profiler = ColumnProfiler::with_config(config.augment.profiler.clone());
    let profiles = profile_dataset(&profiler, &dataset, &indices)
        .map_err(|e| CliError::InvalidArgument(e.to_string()))?;

    match args.format.as_str() {
        "json" => {
            let list: Vec<_> = profiles.values().collect();
            let json = serde_json::to_string_pretty(&list)
                .map_err(|e| CliError::InvalidArgument(e.to_string()))?;
            println!("{json}");
        }
        "table" => print!("{}", format_profile_table(&profiles)),
        other => {
            return Err(CliError::InvalidArgument(format!(
                "unknown format '{other}', expected table or json"
            )));
        }
    }

    Ok(())
}
