//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::models::ScoreScale;
use clap::Parser;
use std::path::PathBuf;

/// wee-summary - summarize Web Exploration Engine scrape results
///
/// Reads scrape results from JSON files (or polls the scraping API for a
/// finished job) and writes a Markdown or JSON summary report with status
/// counts, industry breakdowns, rankings and sentiment rollups.
///
/// Examples:
///   wee-summary --input results.json
///   wee-summary --input ./scrapes --format json --output summary.json
///   wee-summary --job 8f14e45f --api-url https://scraper.example.com
///   wee-summary --input ./scrapes --dry-run
///   wee-summary --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// File or directory of scrape result JSON
    #[arg(
        short,
        long,
        value_name = "PATH",
        required_unless_present_any = ["init_config", "job"],
        conflicts_with = "job"
    )]
    pub input: Option<PathBuf>,

    /// Scrape job ID to fetch from the scraping API
    #[arg(long, value_name = "ID")]
    pub job: Option<String>,

    /// Scraping API base URL
    ///
    /// Defaults to the config file value, or http://localhost:3002.
    #[arg(long, value_name = "URL", env = "WEE_API_URL")]
    pub api_url: Option<String>,

    /// Output file path for the report
    ///
    /// Defaults to the config file value, or wee_summary.md.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Path to configuration file
    ///
    /// If not specified, looks for .wee-summary.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Top metadata scores below this are reported as weak (0.0 - 1.0)
    #[arg(long, value_name = "SCORE")]
    pub weak_threshold: Option<f64>,

    /// Number of entries in each review ranking
    #[arg(long, value_name = "N")]
    pub top_n: Option<usize>,

    /// Scale of incoming classification scores
    #[arg(long, value_name = "SCALE")]
    pub score_scale: Option<ScoreScale>,

    /// Fail if the metadata/domain match percentage is below this value
    ///
    /// Useful for CI pipelines. Exit code 2 when the threshold is missed.
    #[arg(long, value_name = "PCT")]
    pub min_match: Option<f64>,

    /// List the files that would be loaded and exit
    #[arg(long, requires = "input")]
    pub dry_run: bool,

    /// Generate a default .wee-summary.toml configuration file
    #[arg(long)]
    pub init_config: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
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

        if let Some(ref api_url) = self.api_url {
            if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
                return Err("API URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if let Some(ref job) = self.job {
            if job.trim().is_empty() {
                return Err("Job ID must not be empty".to_string());
            }
        }

        if let Some(threshold) = self.weak_threshold {
            if !(0.0..=1.0).contains(&threshold) {
                return Err("Weak threshold must be between 0.0 and 1.0".to_string());
            }
        }

        if self.top_n == Some(0) {
            return Err("Top N must be at least 1".to_string());
        }

        if let Some(min_match) = self.min_match {
            if !(0.0..=100.0).contains(&min_match) {
                return Err("Minimum match must be between 0 and 100".to_string());
            }
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref input) = self.input {
            if !input.exists() {
                return Err(format!("Input path does not exist: {}", input.display()));
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

    /// Short description of where results come from, for the report header.
    pub fn source_label(&self) -> String {
        match (&self.input, &self.job) {
            (Some(path), _) => path.display().to_string(),
            (None, Some(job)) => format!("job {}", job),
            (None, None) => String::new(),
        }
    }
}
