//! table-fusion command line

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use table_fusion::cli::CliError;
use table_fusion::cli::commands::InputOptions;
use table_fusion::cli::commands::augment::{AugmentArgs, handle_augment};
use table_fusion::cli::commands::profile::{ProfileArgs, handle_profile};
use table_fusion::config::FusionConfig;
use table_fusion::logging::{LoggingConfig, init_logging};

#[derive(Parser)]
#[command(
    name = "table-fusion",
    version,
    about = "Profile tables and join them by entity resolution"
)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON log lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct InputArgs {
    /// Field delimiter for delimited files
    #[arg(short, long)]
    delimiter: Option<char>,

    /// Input files have no header row
    #[arg(long)]
    no_headers: bool,
}

impl From<InputArgs> for InputOptions {
    fn from(args: InputArgs) -> Self {
        InputOptions {
            delimiter: args.delimiter,
            no_headers: args.no_headers,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Profile the columns of a table
    Profile {
        /// CSV, TSV or JSON records file
        input: PathBuf,

        /// Columns to profile (all by default)
        #[arg(short, long, value_delimiter = ',')]
        columns: Vec<String>,

        /// Output format: table or json
        #[arg(short, long, default_value = "table")]
        format: String,

        #[command(flatten)]
        input_args: InputArgs,
    },

    /// Append the columns of RIGHT to LEFT by matching rows
    Augment {
        /// Table to augment
        left: PathBuf,

        /// Table providing new columns
        right: PathBuf,

        /// Join spec, e.g. first+last=name,zip=postcode; repeat to try several
        #[arg(long = "on")]
        specs: Vec<String>,

        /// Semantic type hint, e.g. founded=datetime
        #[arg(long = "hint")]
        hints: Vec<String>,

        /// Write the joined table here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write the per-spec report as JSON
        #[arg(long)]
        report: Option<PathBuf>,

        /// Stop starting new specs after this many milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Exit with an error when nothing could be joined
        #[arg(long)]
        require_match: bool,

        #[command(flatten)]
        input_args: InputArgs,
    },

    /// Print the effective configuration as TOML
    Config,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<CliError>() {
                Some(cli_err) => eprintln!("Error: {}", cli_err.user_message()),
                None => eprintln!("Error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = FusionConfig::load_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;

    let mut logging = if cli.verbose {
        LoggingConfig::development()
    } else {
        config.logging.clone()
    };
    if cli.json_logs {
        logging = logging.with_json_format(true);
    }
    init_logging(&logging).map_err(CliError::from)?;

    match cli.command {
        Commands::Profile {
            input,
            columns,
            format,
            input_args,
        } => {
            let args = ProfileArgs {
                input,
                columns,
                format,
                input_options: input_args.into(),
            };
            handle_profile(&args, &config)?;
        }
        Commands::Augment {
            left,
            right,
            specs,
            hints,
            output,
            report,
            timeout_ms,
            require_match,
            input_args,
        } => {
            let args = AugmentArgs {
                left,
                right,
                specs,
                hints,
                output,
                report,
                timeout_ms,
                require_match,
                input_options: input_args.into(),
            };
            handle_augment(&args, &config)?;
        }
        Commands::Config => {
            print!("{}", config.to_toml_string().map_err(CliError::from)?);
        }
    }

    Ok(())
}
