//! Command-line interface definition using clap.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};

use crate::config;

/// Weekly kitchen briefing: run, inspect and audit briefing runs
#[derive(Parser, Debug)]
#[command(name = "kitchen-briefing")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to the data directory (runs, results, locations.json)
    #[arg(short, long, env = "BRIEFING_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a briefing for one location and week
    Run {
        /// Location slug
        #[arg(short, long)]
        location: String,

        /// First day of the week (YYYY-MM-DD)
        #[arg(short, long)]
        week_start: NaiveDate,

        /// Reuse an open run instead of creating one
        #[arg(long)]
        run_id: Option<String>,

        /// Who or what requested the run
        #[arg(long)]
        triggered_by: Option<String>,

        /// Directory of exported agent feeds (default: <data-dir>/feeds)
        #[arg(long, env = "BRIEFING_FEED_DIR")]
        feed_dir: Option<PathBuf>,

        /// Per-phase deadline in seconds
        #[arg(long, default_value = "120")]
        phase_timeout: u64,

        /// Skip the narrative phase even if a key is configured
        #[arg(long)]
        no_narrative: bool,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Show a stored run and its briefing
    Show {
        /// Run ID
        run_id: String,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// List the persisted agent results of a run
    Results {
        /// Run ID
        run_id: String,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// List stored runs, newest first
    List {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl Cli {
    /// Returns the data directory path, using default if not specified.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(config::default_data_dir)
    }

    /// Returns the log level based on verbosity.
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse_run() {
        let cli = Cli::parse_from([
            "kitchen-briefing",
            "run",
            "--location",
            "harbour-st",
            "--week-start",
            "2026-10-12",
        ]);
        match cli.command {
            Commands::Run {
                location,
                week_start,
                run_id,
                phase_timeout,
                format,
                ..
            } => {
                assert_eq!(location, "harbour-st");
                assert_eq!(week_start, NaiveDate::from_ymd_opt(2026, 10, 12).unwrap());
                assert!(run_id.is_none());
                assert_eq!(phase_timeout, 120);
                assert_eq!(format, OutputFormat::Text);
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_rejects_bad_date() {
        let result = Cli::try_parse_from([
            "kitchen-briefing",
            "run",
            "--location",
            "harbour-st",
            "--week-start",
            "12/10/2026",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_show_json() {
        let cli = Cli::parse_from(["kitchen-briefing", "show", "run-123", "--format", "json"]);
        match cli.command {
            Commands::Show { run_id, format } => {
                assert_eq!(run_id, "run-123");
                assert_eq!(format, OutputFormat::Json);
            }
            _ => panic!("Expected Show command"),
        }
    }

    #[test]
    fn test_cli_verbose_and_data_dir() {
        let cli = Cli::parse_from(["kitchen-briefing", "-vv", "--data-dir", "/srv/briefing", "list"]);
        assert_eq!(cli.log_level(), tracing::Level::DEBUG);
        assert_eq!(cli.data_dir(), PathBuf::from("/srv/briefing"));
    }

    #[test]
    fn test_cli_help() {
        Cli::command().debug_assert();
    }
}
