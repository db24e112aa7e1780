//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.wee-summary.toml` files.

use crate::analysis::SummaryOptions;
use crate::models::ScoreScale;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".wee-summary.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Input discovery settings.
    #[serde(default)]
    pub input: InputConfig,

    /// Aggregation settings.
    #[serde(default)]
    pub summary: SummaryConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,

    /// Scraping API settings.
    #[serde(default)]
    pub api: ApiConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            verbose: false,
        }
    }
}

fn default_output() -> String {
    "wee_summary.md".to_string()
}

/// Result file discovery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// File extensions to include.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Directory or file names to skip.
    #[serde(default = "default_excludes")]
    pub excludes: Vec<String>,

    /// Maximum file size in bytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,

    /// Maximum number of files to load.
    #[serde(default)]
    pub max_files: Option<usize>,

    /// Scale of incoming classification scores.
    #[serde(default)]
    pub score_scale: ScoreScale,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            excludes: default_excludes(),
            max_file_size: default_max_file_size(),
            max_files: None,
            score_scale: ScoreScale::default(),
        }
    }
}

fn default_extensions() -> Vec<String> {
    vec!["json".to_string()]
}

fn default_excludes() -> Vec<String> {
    vec!["node_modules", "target", "dist", "build"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_max_file_size() -> u64 {
    10 * 1024 * 1024 // 10MB
}

/// Aggregation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// Top metadata scores below this are reported as weak.
    #[serde(default = "default_weak_threshold")]
    pub weak_threshold: f64,

    /// Number of entries in each review ranking.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            weak_threshold: default_weak_threshold(),
            top_n: default_top_n(),
        }
    }
}

fn default_weak_threshold() -> f64 {
    0.5
}

fn default_top_n() -> usize {
    3
}

impl From<&SummaryConfig> for SummaryOptions {
    fn from(config: &SummaryConfig) -> Self {
        Self {
            weak_threshold: config.weak_threshold,
            top_n: config.top_n,
        }
    }
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Include per-URL radar score tables.
    #[serde(default)]
    pub include_radar: bool,

    /// Include the per-URL emotions table.
    #[serde(default = "default_true")]
    pub include_emotions: bool,

    /// Maximum entries listed per URL list section.
    #[serde(default = "default_max_list_items")]
    pub max_list_items: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            include_radar: false,
            include_emotions: true,
            max_list_items: default_max_list_items(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_list_items() -> usize {
    25
}

/// Scraping API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the scraping API.
    #[serde(default = "default_api_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Delay between status polls in milliseconds.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Number of polls before giving up on a job.
    #[serde(default = "default_max_polls")]
    pub max_polls: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_url(),
            timeout_seconds: default_timeout(),
            poll_interval_ms: default_poll_interval(),
            max_polls: default_max_polls(),
        }
    }
}

pub fn default_api_url() -> String {
    "http://localhost:3002".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_poll_interval() -> u64 {
    5000
}

fn default_max_polls() -> usize {
    120 // 10 minutes at the default interval
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
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given explicitly.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }

        if let Some(ref api_url) = args.api_url {
            self.api.base_url = api_url.clone();
        }

        if let Some(threshold) = args.weak_threshold {
            self.summary.weak_threshold = threshold;
        }
        if let Some(top_n) = args.top_n {
            self.summary.top_n = top_n;
        }

        if let Some(scale) = args.score_scale {
            self.input.score_scale = scale;
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Check the merged settings. File values get the same range checks
    /// as their command-line counterparts.
    pub fn validate(&self) -> Result<()> {
        let threshold = self.summary.weak_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            anyhow::bail!(
                "summary.weak_threshold must be between 0.0 and 1.0, got {}",
                threshold
            );
        }

        if self.summary.top_n == 0 {
            anyhow::bail!("summary.top_n must be at least 1");
        }

        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://")
        {
            anyhow::bail!(
                "api.base_url must start with 'http://' or 'https://', got '{}'",
                self.api.base_url
            );
        }

        if self.api.max_polls == 0 {
            anyhow::bail!("api.max_polls must be at least 1");
        }

        Ok(())
    }

    /// Options for the aggregator.
    pub fn summary_options(&self) -> SummaryOptions {
        SummaryOptions::from(&self.summary)
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
