//! Typed errors for the ingestion boundaries.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from the scraping API job client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Job {job_id} failed with status: {status}")]
    JobFailed { job_id: String, status: String },

    #[error("Job {job_id} did not complete after {polls} polls")]
    Timeout { job_id: String, polls: usize },
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Parse(err.to_string())
    }
}

impl From<LoadError> for ClientError {
    fn from(err: LoadError) -> Self {
        ClientError::Parse(err.to_string())
    }
}

/// Errors from reading result files.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Input path not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid result data: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        LoadError::Parse(err.to_string())
    }
}
