//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::corpus::DateWindow;
use crate::time::ViewerZone;
use chrono::NaiveDate;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Roomstat - activity reports for chatroom exports
///
/// Reads a JSON chatroom export ({"messages": [...]}) from standard input
/// and renders a heatmap, engagement trend or speaker-share chart, or
/// prints a word-frequency table.
///
/// Examples:
///   roomstat < history.json
///   roomstat --report engagement -o engagement.json < history.json
///   roomstat --report speakers --timezone Europe/Berlin < history.json
///   roomstat --report wordfreq --wordle --user "Ann Lee" < history.json
///   roomstat --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Report to generate (heatmap, engagement, speakers, wordfreq)
    ///
    /// Defaults to the config file setting, or heatmap.
    #[arg(short, long, value_name = "NAME")]
    pub report: Option<String>,

    /// Save the chart to FILE instead of displaying it
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<String>,

    /// File format for saved charts (json, text)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Output word frequencies as repeated words, for word-cloud tools
    #[arg(short, long)]
    pub wordle: bool,

    /// Limit analysis to a specific user (exact display name)
    #[arg(short, long, value_name = "USER", default_value = "")]
    pub user: String,

    /// Only include messages on or after this local date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub after: Option<NaiveDate>,

    /// Only include messages before this local date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub before: Option<NaiveDate>,

    /// Time zone for day and hour bucketing (IANA name)
    ///
    /// Defaults to the system time zone.
    #[arg(long, value_name = "ZONE", env = "ROOMSTAT_TZ")]
    pub timezone: Option<String>,

    /// Abort on the first message with an unparseable timestamp
    #[arg(long)]
    pub strict: bool,

    /// Stopword list for the word-frequency report
    #[arg(long, value_name = "FILE")]
    pub ignore_file: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .roomstat.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .roomstat.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// File format for saved charts.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON document (default)
    #[default]
    Json,
    /// Plain-text table
    Text,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let (Some(after), Some(before)) = (self.after, self.before) {
            if after >= before {
                return Err(format!(
                    "--after ({}) must be earlier than --before ({})",
                    after, before
                ));
            }
        }

        if let Some(ref zone) = self.timezone {
            ViewerZone::from_name(zone).map_err(|e| e.to_string())?;
        }

        if let Some(ref output) = self.output {
            if output.trim().is_empty() {
                return Err("Output path must not be blank".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Local date window requested with --after / --before.
    pub fn date_window(&self) -> DateWindow {
        DateWindow {
            after: self.after,
            before: self.before,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            report: None,
            output: None,
            format: None,
            wordle: false,
            user: String::new(),
            after: None,
            before: None,
            timezone: None,
            strict: false,
            ignore_file: None,
            config: None,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_parse_short_flags() {
        let args = Args::parse_from(["roomstat", "-r", "speakers", "-u", "Ann Lee", "-w"]);
        assert_eq!(args.report.as_deref(), Some("speakers"));
        assert_eq!(args.user, "Ann Lee");
        assert!(args.wordle);
        assert!(args.output.is_none());
    }

    #[test]
    fn test_parse_dates() {
        let args = Args::parse_from(["roomstat", "--after", "2013-01-01", "--before", "2013-02-01"]);
        let window = args.date_window();
        assert_eq!(window.after, NaiveDate::from_ymd_opt(2013, 1, 1));
        assert_eq!(window.before, NaiveDate::from_ymd_opt(2013, 2, 1));
        assert!(Args::try_parse_from(["roomstat", "--after", "January"]).is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_date_order() {
        let mut args = make_args();
        args.after = NaiveDate::from_ymd_opt(2013, 2, 1);
        args.before = NaiveDate::from_ymd_opt(2013, 2, 1);
        assert!(args.validate().is_err());

        args.before = NaiveDate::from_ymd_opt(2013, 3, 1);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_timezone() {
        let mut args = make_args();
        args.timezone = Some("Europe/Berlin".to_string());
        assert!(args.validate().is_ok());

        args.timezone = Some("Nowhere/Special".to_string());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
