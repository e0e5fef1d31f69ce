//! value-harness CLI
//!
//! Runs and validates feature files against the value processor.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use value_harness::commands;
use value_harness::{HarnessConfig, RunOptions, RunSummary};

#[derive(Parser)]
#[command(name = "value-harness")]
#[command(about = "Feature-file driven BDD harness for the value processor")]
struct Cli {
    /// Config file (default: ./value-harness.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run feature files
    Run {
        /// Feature files or directories (default: configured features dir)
        paths: Vec<PathBuf>,

        /// Directory to search when no paths are given
        #[arg(long)]
        features_dir: Option<PathBuf>,

        /// Stop after the first failing scenario
        #[arg(long)]
        fail_fast: bool,

        /// Only run scenarios whose name contains this text
        #[arg(long)]
        name: Option<String>,

        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check feature files for undefined steps without running them
    Validate {
        /// Feature files or directories (default: configured features dir)
        paths: Vec<PathBuf>,

        /// Report mode - print all issues but exit with success
        #[arg(long)]
        report: bool,
    },
    /// Process a single input value and print the result as JSON
    Process {
        #[arg(allow_negative_numbers = true)]
        value: i64,
    },
}

fn init_tracing(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn paths_or_default(paths: Vec<PathBuf>, default_dir: PathBuf) -> Vec<PathBuf> {
    if paths.is_empty() {
        vec![default_dir]
    } else {
        paths
    }
}

fn print_summary(summary: &RunSummary) {
    for failure in &summary.load_failures {
        println!("ERROR: {}", failure);
    }
    for outcome in &summary.outcomes {
        if outcome.passed {
            println!("PASS: {} ({}:{})", outcome.name, outcome.path.display(), outcome.line);
        } else {
            println!("FAIL: {} ({}:{})", outcome.name, outcome.path.display(), outcome.line);
            if let Some(ref failure) = outcome.failure {
                println!("    - {}", failure);
            }
            if outcome.steps_skipped > 0 {
                println!("    ({} steps skipped)", outcome.steps_skipped);
            }
        }
    }
    println!(
        "\n{} scenarios: {} passed, {} failed",
        summary.outcomes.len(),
        summary.passed(),
        summary.failed()
    );
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = HarnessConfig::load(cli.config.as_deref())?;
    init_tracing(&config.log_filter);

    match cli.command {
        Commands::Run {
            paths,
            features_dir,
            fail_fast,
            name,
            json,
        } => {
            let features_dir = features_dir.unwrap_or(config.features_dir);
            let run_config = commands::run::RunConfig {
                paths: paths_or_default(paths, features_dir),
                options: RunOptions {
                    fail_fast: fail_fast || config.fail_fast,
                    name_filter: name,
                },
            };

            let summary = commands::run::run(&run_config)?;

            if json {
                let out = serde_json::to_string_pretty(&summary)
                    .context("Failed to serialize run summary")?;
                println!("{}", out);
            } else {
                print_summary(&summary);
            }

            if !summary.is_success() {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Validate { paths, report } => {
            let paths = paths_or_default(paths, config.features_dir);
            let result = commands::validate::validate_paths(&paths)?;

            for error in &result.errors {
                eprintln!("ERROR: {}", error);
            }
            for warning in &result.warnings {
                eprintln!("WARN: {}", warning);
            }

            if result.errors.is_empty() && result.warnings.is_empty() {
                println!("Validation passed: no issues found");
            } else {
                println!(
                    "\nValidation complete: {} errors, {} warnings",
                    result.errors.len(),
                    result.warnings.len()
                );
            }

            if !report && !result.is_valid() {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Process { value } => {
            let report = commands::process::run(value);
            let out = serde_json::to_string_pretty(&report)
                .context("Failed to serialize process report")?;
            println!("{}", out);

            if !report.is_success() {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
