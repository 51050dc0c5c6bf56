//! Command-line argument definitions for the run dashboard
//!
//! This module defines the CLI interface using clap derive API.

use crate::app::models::PersonFilter;
use crate::constants::DEFAULT_LOG_LEVEL;
use crate::{Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the run dashboard
///
/// Validates running activity CSV files and reports mileage statistics.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "run-dashboard",
    version,
    about = "Validate running activity CSV files and summarize mileage per runner",
    long_about = "Reads a CSV file with the columns date, person and miles run, validates \
                  every row, and either reports each problem by row number or prints overall \
                  statistics, a per-runner leaderboard and a date-ordered chart series."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to a JSON configuration file
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Parse a file and print metrics, leaderboard and chart series
    Summary(SummaryArgs),
    /// Parse a file and report only whether it is valid
    Validate(ValidateArgs),
}

/// Arguments for the summary command
#[derive(Debug, Clone, Parser)]
pub struct SummaryArgs {
    /// CSV file with date, person and miles run columns
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Runner to chart; every runner when omitted
    #[arg(short, long, value_name = "NAME")]
    pub person: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Keep rows whose every field is blank (they then fail validation)
    #[arg(long = "keep-empty-lines")]
    pub keep_empty_lines: bool,
}

impl SummaryArgs {
    /// Chart filter selected by `--person`
    ///
    /// The name is taken literally, so a runner called `all` can be charted
    /// on their own.
    pub fn person_filter(&self) -> PersonFilter {
        match &self.person {
            Some(name) => PersonFilter::Person(name.trim().to_string()),
            None => PersonFilter::All,
        }
    }
}

/// Arguments for the validate command
#[derive(Debug, Clone, Parser)]
pub struct ValidateArgs {
    /// CSV file with date, person and miles run columns
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Output formats for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON document on stdout
    Json,
}

impl Args {
    /// Log level implied by the verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            DEFAULT_LOG_LEVEL
        }
    }

    /// Validate argument combinations clap cannot express
    pub fn validate(&self) -> Result<()> {
        if let Some(Commands::Summary(summary)) = &self.command {
            if summary.person.as_deref().is_some_and(|name| name.trim().is_empty()) {
                return Err(Error::configuration(
                    "--person must name a runner; omit it to chart everyone",
                ));
            }
        }
        Ok(())
    }
}
