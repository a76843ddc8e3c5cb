// skucheck CLI - verify recognized SKUs against the reference catalogue

mod exit_codes;
mod run;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use skucheck_recon::VerifyError;
use tracing_subscriber::EnvFilter;

use exit_codes::{error_kind_exit_code, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "skucheck")]
#[command(about = "Check recognized SKUs against the reference catalogue")]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    /// More log output (debug level)
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only warnings and errors on stderr
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Options shared by every command that reads the job configuration.
#[derive(Args, Clone)]
pub struct JobArgs {
    /// Job config file (defaults to ~/.config/skucheck/skucheck.toml when present)
    #[arg(long, short = 'c', env = "SKUCHECK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Project root, replacing paths.base_dir from the config
    #[arg(long, env = "SKUCHECK_BASE_DIR")]
    pub base_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Partition receipts, join the catalogue, classify and write the report
    #[command(after_help = "\
Examples:
  skucheck run
  skucheck run --base-dir ~/work/studying_r/kr
  skucheck run --config job.toml --json")]
    Run {
        #[command(flatten)]
        job: JobArgs,

        /// Print the run summary as JSON on stdout
        #[arg(long)]
        json: bool,
    },

    /// Show resolved input and output paths without running
    #[command(after_help = "\
Examples:
  skucheck paths
  skucheck paths --config job.toml")]
    Paths {
        #[command(flatten)]
        job: JobArgs,
    },
}

pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self {
            code,
            message: msg.into(),
            hint: None,
        }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

const NOT_FOUND_HINT: &str =
    "check paths.base_dir / --base-dir; `skucheck paths` shows what is probed";

impl From<VerifyError> for CliError {
    fn from(err: VerifyError) -> Self {
        let hint = match &err {
            VerifyError::NotFound { .. } => Some(NOT_FOUND_HINT.to_string()),
            VerifyError::MissingColumn { column, .. } => {
                Some(format!("add a '{column}' column or map it under [verify.columns]"))
            }
            _ => None,
        };
        Self {
            code: error_kind_exit_code(err.kind()),
            message: err.to_string(),
            hint,
        }
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        None => {
            // No subcommand = show help
            eprintln!("Usage: skucheck <command> [options]");
            eprintln!("       skucheck --help for more information");
            Err(CliError::new(EXIT_USAGE, ""))
        }
        Some(Commands::Run { job, json }) => run::cmd_run(job, json),
        Some(Commands::Paths { job }) => run::cmd_paths(job),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}
