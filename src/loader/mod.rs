//! Loading scrape results from disk.
//!
//! This module discovers result files under an input path, parses the
//! batches they contain and normalizes classification scores to the
//! [0, 1] scale used by the aggregator.

use crate::error::LoadError;
use crate::models::{ErrorResponse, ScoreScale, ScrapeOutcome, ScraperResult};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Configuration for discovering and reading result files.
#[derive(Debug, Clone)]
pub struct LoadConfig {
    /// File extensions to include (e.g., ["json"])
    pub extensions: Vec<String>,
    /// Names to skip while walking (e.g., ["node_modules"])
    pub excludes: Vec<String>,
    /// Maximum file size in bytes
    pub max_file_size: u64,
    /// Maximum number of files to load
    pub max_files: Option<usize>,
    /// Scale the classification scores are written in
    pub score_scale: ScoreScale,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["json".to_string()],
            excludes: vec!["node_modules".to_string(), "target".to_string()],
            max_file_size: 10 * 1024 * 1024, // 10MB
            max_files: None,
            score_scale: ScoreScale::Auto,
        }
    }
}

impl From<&crate::config::InputConfig> for LoadConfig {
    fn from(config: &crate::config::InputConfig) -> Self {
        Self {
            extensions: config.extensions.clone(),
            excludes: config.excludes.clone(),
            max_file_size: config.max_file_size,
            max_files: config.max_files,
            score_scale: config.score_scale,
        }
    }
}

/// A result file found under the input path.
#[derive(Debug, Clone)]
pub struct ScannedFile {
    /// Path relative to the input root (file name for a single-file input)
    pub path: String,
    /// Absolute or root-joined location on disk
    pub location: PathBuf,
    /// File size in bytes
    pub size: u64,
}

/// Results and failures parsed from one batch.
#[derive(Debug, Clone, Default)]
pub struct LoadedBatch {
    pub results: Vec<ScraperResult>,
    /// Per-URL errors reported by the scraper.
    pub failures: Vec<ErrorResponse>,
    /// Entries that were neither a result nor an error shape.
    pub invalid: usize,
}

impl LoadedBatch {
    pub fn normalize_scores(&mut self, scale: ScoreScale) {
        for result in &mut self.results {
            result.normalize_scores(scale);
        }
    }

    fn extend(&mut self, other: LoadedBatch) {
        self.results.extend(other.results);
        self.failures.extend(other.failures);
        self.invalid += other.invalid;
    }
}

/// Everything read from an input path.
#[derive(Debug, Clone, Default)]
pub struct LoadedInput {
    pub batch: LoadedBatch,
    pub files_loaded: usize,
    pub files_failed: usize,
}

/// Parse the text of a result file.
///
/// Accepts a JSON array of entries, a single entry, or a job envelope
/// `{"status": ..., "result": ...}` wrapping either of those.
pub fn parse_batch(text: &str) -> Result<LoadedBatch, LoadError> {
    let value: Value = serde_json::from_str(text)?;
    batch_from_value(value)
}

/// Build a batch from an already-parsed JSON value.
pub fn batch_from_value(value: Value) -> Result<LoadedBatch, LoadError> {
    match value {
        Value::Array(entries) => {
            let mut batch = LoadedBatch::default();
            for entry in entries {
                push_entry(&mut batch, entry);
            }
            Ok(batch)
        }
        Value::Object(mut map) if is_envelope(&map) => {
            let result = map.remove("result").unwrap_or(Value::Null);
            batch_from_value(result)
        }
        Value::Object(_) => {
            let mut batch = LoadedBatch::default();
            push_entry(&mut batch, value);
            if batch.invalid > 0 {
                return Err(LoadError::Parse(
                    "object is neither a scrape result nor an error".to_string(),
                ));
            }
            Ok(batch)
        }
        Value::Null => Ok(LoadedBatch::default()),
        other => Err(LoadError::Parse(format!(
            "expected an array or object, found {}",
            json_type(&other)
        ))),
    }
}

fn is_envelope(map: &serde_json::Map<String, Value>) -> bool {
    map.contains_key("status") && map.contains_key("result") && !map.contains_key("url")
}

fn push_entry(batch: &mut LoadedBatch, entry: Value) {
    match serde_json::from_value::<ScrapeOutcome>(entry) {
        Ok(ScrapeOutcome::Success(result)) => batch.results.push(*result),
        Ok(ScrapeOutcome::Failure(failure)) => {
            debug!(
                "Scrape failed for {}: {} ({})",
                failure.url.as_deref().unwrap_or("<unknown url>"),
                failure.error_message,
                failure.error_code
            );
            batch.failures.push(failure);
        }
        Err(e) => {
            debug!("Skipping unrecognized entry: {}", e);
            batch.invalid += 1;
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Discovers and reads result files under a root path.
pub struct ResultLoader {
    config: LoadConfig,
    root: PathBuf,
}

impl ResultLoader {
    /// Create a loader for a file or directory.
    pub fn new(root: PathBuf, config: LoadConfig) -> Self {
        Self { config, root }
    }

    /// Find all result files, sorted by path.
    pub fn scan(&self) -> Result<Vec<ScannedFile>, LoadError> {
        if !self.root.exists() {
            return Err(LoadError::NotFound(self.root.clone()));
        }

        let mut files = Vec::new();

        if self.root.is_file() {
            let size = fs::metadata(&self.root)
                .map_err(|source| LoadError::Io {
                    path: self.root.clone(),
                    source,
                })?
                .len();
            let name = self
                .root
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| self.root.display().to_string());
            files.push(ScannedFile {
                path: name,
                location: self.root.clone(),
                size,
            });
            return Ok(files);
        }

        self.walk_dir(&self.root, &mut files);
        files.sort_by(|a, b| a.path.cmp(&b.path));

        if let Some(max) = self.config.max_files {
            files.truncate(max);
        }

        Ok(files)
    }

    /// Read and parse every scanned file.
    ///
    /// Unreadable or malformed files are skipped and counted in
    /// `files_failed`.
    pub fn load(&self) -> Result<LoadedInput, LoadError> {
        let files = self.scan()?;
        let mut input = LoadedInput::default();

        for file in &files {
            match self.load_file(file) {
                Ok(batch) => {
                    debug!(
                        "Loaded {} results and {} failures from {}",
                        batch.results.len(),
                        batch.failures.len(),
                        file.path
                    );
                    input.batch.extend(batch);
                    input.files_loaded += 1;
                }
                Err(e) => {
                    warn!("Skipping {}: {}", file.path, e);
                    input.files_failed += 1;
                }
            }
        }

        input.batch.normalize_scores(self.config.score_scale);

        info!(
            "Loaded {} results from {} files ({} failed)",
            input.batch.results.len(),
            input.files_loaded,
            input.files_failed
        );

        Ok(input)
    }

    fn load_file(&self, file: &ScannedFile) -> Result<LoadedBatch, LoadError> {
        let text = fs::read_to_string(&file.location).map_err(|source| LoadError::Io {
            path: file.location.clone(),
            source,
        })?;
        parse_batch(&text)
    }

    /// Check if a file matches the configured extensions and size limit.
    pub fn matches(&self, path: &Path) -> bool {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if !self
            .config
            .extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ext))
        {
            return false;
        }

        match fs::metadata(path) {
            Ok(metadata) => metadata.len() <= self.config.max_file_size,
            Err(_) => false,
        }
    }

    /// Hidden entries and explicit excludes are skipped.
    fn is_excluded(&self, name: &str) -> bool {
        name.starts_with('.') || self.config.excludes.iter().any(|pattern| name == pattern)
    }

    fn walk_dir(&self, dir: &Path, files: &mut Vec<ScannedFile>) {
        let entries = match fs::read_dir(dir) {
            Ok(e) => e,
            Err(e) => {
                debug!("Cannot read directory {}: {}", dir.display(), e);
                return;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().to_string();

            if self.is_excluded(&name) {
                continue;
            }

            if path.is_dir() {
                self.walk_dir(&path, files);
            } else if path.is_file() && self.matches(&path) {
                if let Ok(metadata) = fs::metadata(&path) {
                    let rel_path = path.strip_prefix(&self.root).unwrap_or(&path);
                    files.push(ScannedFile {
                        path: rel_path.to_string_lossy().to_string(),
                        location: path.clone(),
                        size: metadata.len(),
                    });
                }
            }
        }
    }
}
