//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.roomstat.toml` files.

use crate::cli::OutputFormat;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".roomstat.toml";

/// Smallest accepted trend sampling step, in days.
pub const MIN_TREND_STEP: f64 = 1e-4;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Speaker-share report settings.
    #[serde(default)]
    pub speakers: SpeakersConfig,

    /// Engagement report settings.
    #[serde(default)]
    pub engagement: EngagementConfig,

    /// Word-frequency report settings.
    #[serde(default)]
    pub wordfreq: WordFreqConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Report to run.
    #[serde(default = "default_report")]
    pub report: String,

    /// Chart output path. Empty means display on the terminal.
    #[serde(default)]
    pub output: String,

    /// File format for saved charts.
    #[serde(default)]
    pub format: OutputFormat,

    /// Room name used in chart titles.
    #[serde(default = "default_room")]
    pub room: String,

    /// IANA zone for calendar bucketing. Empty means the system zone.
    #[serde(default)]
    pub timezone: String,

    /// Abort on the first unparseable timestamp instead of skipping it.
    #[serde(default)]
    pub strict_timestamps: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            report: default_report(),
            output: String::new(),
            format: OutputFormat::default(),
            room: default_room(),
            timezone: String::new(),
            strict_timestamps: false,
        }
    }
}

fn default_report() -> String {
    "heatmap".to_string()
}

fn default_room() -> String {
    "Chat".to_string()
}

/// Speaker-share settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeakersConfig {
    /// Users need strictly more messages than this for their own series.
    #[serde(default = "default_min_messages")]
    pub min_messages: usize,
}

impl Default for SpeakersConfig {
    fn default() -> Self {
        Self {
            min_messages: default_min_messages(),
        }
    }
}

fn default_min_messages() -> usize {
    50
}

/// Engagement trend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngagementConfig {
    /// Degree of the fitted trend polynomial.
    #[serde(default = "default_degree")]
    pub degree: usize,

    /// Trend sampling step, in days.
    #[serde(default = "default_step")]
    pub step: f64,
}

impl Default for EngagementConfig {
    fn default() -> Self {
        Self {
            degree: default_degree(),
            step: default_step(),
        }
    }
}

fn default_degree() -> usize {
    5
}

fn default_step() -> f64 {
    0.01
}

/// Word-frequency settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordFreqConfig {
    /// Minimum occurrences for a word to be reported.
    #[serde(default = "default_min_count")]
    pub min_count: usize,

    /// Stopword list, one word per line. Missing is fine.
    #[serde(default = "default_ignore_file")]
    pub ignore_file: String,

    /// Emit repeated-token lines instead of a table.
    #[serde(default)]
    pub wordle: bool,
}

impl Default for WordFreqConfig {
    fn default() -> Self {
        Self {
            min_count: default_min_count(),
            ignore_file: default_ignore_file(),
            wordle: false,
        }
    }
}

fn default_min_count() -> usize {
    100
}

fn default_ignore_file() -> String {
    "ignore.txt".to_string()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence, but only when they were given.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref report) = args.report {
            self.general.report = report.clone();
        }
        if let Some(ref output) = args.output {
            self.general.output = output.clone();
        }
        if let Some(format) = args.format {
            self.general.format = format;
        }
        if let Some(ref timezone) = args.timezone {
            self.general.timezone = timezone.clone();
        }
        if let Some(ref ignore_file) = args.ignore_file {
            self.wordfreq.ignore_file = ignore_file.display().to_string();
        }

        // Flags only ever switch things on
        if args.strict {
            self.general.strict_timestamps = true;
        }
        if args.wordle {
            self.wordfreq.wordle = true;
        }
    }

    /// Reject values no report can work with.
    pub fn validate(&self) -> Result<()> {
        if !self.engagement.step.is_finite() || self.engagement.step < MIN_TREND_STEP {
            bail!(
                "engagement.step must be at least {} days, got {}",
                MIN_TREND_STEP,
                self.engagement.step
            );
        }

        if self.general.report.trim().is_empty() {
            bail!("general.report must name a report");
        }

        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Args;
    use clap::Parser;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.report, "heatmap");
        assert!(config.general.output.is_empty());
        assert_eq!(config.speakers.min_messages, 50);
        assert_eq!(config.engagement.degree, 5);
        assert_eq!(config.wordfreq.min_count, 100);
        assert_eq!(config.wordfreq.ignore_file, "ignore.txt");
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
report = "speakers"
room = "Accelerator"
format = "text"

[speakers]
min_messages = 10

[wordfreq]
wordle = true
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.report, "speakers");
        assert_eq!(config.general.room, "Accelerator");
        assert_eq!(config.general.format, OutputFormat::Text);
        assert_eq!(config.speakers.min_messages, 10);
        assert!(config.wordfreq.wordle);
        assert_eq!(config.wordfreq.min_count, 100);
        assert_eq!(config.engagement.step, 0.01);
    }

    #[test]
    fn test_cli_overrides_config() {
        let mut config = Config::default();
        config.general.room = "Ops".to_string();

        let args = Args::parse_from([
            "roomstat",
            "--report",
            "wordfreq",
            "--wordle",
            "--ignore-file",
            "stop.txt",
            "-o",
            "chart.json",
        ]);
        config.merge_with_args(&args);

        assert_eq!(config.general.report, "wordfreq");
        assert_eq!(config.general.output, "chart.json");
        assert_eq!(config.general.room, "Ops");
        assert!(config.wordfreq.wordle);
        assert_eq!(config.wordfreq.ignore_file, "stop.txt");
    }

    #[test]
    fn test_absent_flags_keep_config() {
        let mut config = Config::default();
        config.general.report = "engagement".to_string();
        config.general.strict_timestamps = true;

        let args = Args::parse_from(["roomstat"]);
        config.merge_with_args(&args);

        assert_eq!(config.general.report, "engagement");
        assert!(config.general.strict_timestamps);
    }

    #[test]
    fn test_validate_rejects_bad_step() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());
        config.engagement.step = 0.0;
        assert!(config.validate().is_err());
        config.engagement.step = 1e-300;
        assert!(config.validate().is_err());
        config.engagement.step = MIN_TREND_STEP;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[speakers]"));
        assert!(toml_str.contains("[engagement]"));
        assert!(toml_str.contains("[wordfreq]"));
    }
}
