//! Job-status client for the scraping API.
//!
//! The scraping service runs jobs asynchronously and exposes their state as
//! a `{status, result}` envelope. This client polls that endpoint until the
//! job settles and hands the result to the loader's batch parser.

use crate::error::ClientError;
use crate::loader::{batch_from_value, LoadedBatch};
use crate::models::ScoreScale;
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};

/// Lifecycle state of a scrape job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobState {
    Pending,
    Processing,
    Completed,
    Failed,
    Other(String),
}

impl From<String> for JobState {
    fn from(s: String) -> Self {
        match s.trim().to_lowercase().as_str() {
            "pending" | "queued" => JobState::Pending,
            "processing" | "running" => JobState::Processing,
            "completed" | "done" => JobState::Completed,
            "failed" | "error" => JobState::Failed,
            _ => JobState::Other(s),
        }
    }
}

impl From<JobState> for String {
    fn from(state: JobState) -> Self {
        state.to_string()
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobState::Pending => write!(f, "pending"),
            JobState::Processing => write!(f, "processing"),
            JobState::Completed => write!(f, "completed"),
            JobState::Failed => write!(f, "failed"),
            JobState::Other(s) => write!(f, "{}", s),
        }
    }
}

/// Response of the job status endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatus {
    pub status: JobState,
    #[serde(default)]
    pub result: Option<Value>,
}

/// Settings for talking to the scraping API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub poll_interval_ms: u64,
    pub max_polls: usize,
    pub score_scale: ScoreScale,
    pub show_progress: bool,
}

impl ClientConfig {
    pub fn from_config(api: &crate::config::ApiConfig, score_scale: ScoreScale) -> Self {
        Self {
            base_url: api.base_url.clone(),
            timeout_seconds: api.timeout_seconds,
            poll_interval_ms: api.poll_interval_ms,
            max_polls: api.max_polls,
            score_scale,
            show_progress: true,
        }
    }
}

pub struct JobClient {
    config: ClientConfig,
    http_client: reqwest::Client,
}

impl JobClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            config,
            http_client,
        })
    }

    fn status_url(&self, job_id: &str) -> String {
        format!(
            "{}/api/status/{}",
            self.config.base_url.trim_end_matches('/'),
            job_id
        )
    }

    /// Fetch the current status of a job once.
    pub async fn fetch_status(&self, job_id: &str) -> Result<JobStatus, ClientError> {
        let url = self.status_url(job_id);
        let resp = self.http_client.get(&url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Poll until the job completes and return its parsed results.
    pub async fn wait_for_results(&self, job_id: &str) -> Result<LoadedBatch, ClientError> {
        info!("Waiting for scrape job {}", job_id);
        let spinner = self.spinner(job_id);

        let outcome = self.poll(job_id, spinner.as_ref()).await;

        if let Some(pb) = spinner {
            match &outcome {
                Ok(batch) => pb.finish_with_message(format!("{} results", batch.results.len())),
                Err(_) => pb.abandon_with_message("job did not complete"),
            }
        }

        outcome
    }

    async fn poll(
        &self,
        job_id: &str,
        spinner: Option<&ProgressBar>,
    ) -> Result<LoadedBatch, ClientError> {
        for attempt in 1..=self.config.max_polls {
            let job = self.fetch_status(job_id).await?;
            debug!(job_id, attempt, status = %job.status, "Polled job status");

            if let Some(pb) = spinner {
                pb.set_message(format!("job {} {}", job_id, job.status));
            }

            match job.status {
                JobState::Completed => {
                    let mut batch = batch_from_value(job.result.unwrap_or(Value::Null))?;
                    batch.normalize_scores(self.config.score_scale);
                    info!(
                        "Job {} completed with {} results ({} failed)",
                        job_id,
                        batch.results.len(),
                        batch.failures.len()
                    );
                    return Ok(batch);
                }
                JobState::Failed => {
                    return Err(ClientError::JobFailed {
                        job_id: job_id.to_string(),
                        status: job.status.to_string(),
                    });
                }
                _ => {
                    if attempt < self.config.max_polls {
                        tokio::time::sleep(Duration::from_millis(self.config.poll_interval_ms))
                            .await;
                    }
                }
            }
        }

        Err(ClientError::Timeout {
            job_id: job_id.to_string(),
            polls: self.config.max_polls,
        })
    }

    fn spinner(&self, job_id: &str) -> Option<ProgressBar> {
        if !self.config.show_progress {
            return None;
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
        {
            pb.set_style(style);
        }
        pb.set_message(format!("job {} pending", job_id));
        pb.enable_steady_tick(Duration::from_millis(120));
        Some(pb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_config(base_url: String) -> ClientConfig {
        ClientConfig {
            base_url,
            timeout_seconds: 5,
            poll_interval_ms: 1,
            max_polls: 3,
            score_scale: ScoreScale::Auto,
            show_progress: false,
        }
    }

    #[test]
    fn test_job_state_from_string() {
        assert_eq!(JobState::from("completed".to_string()), JobState::Completed);
        assert_eq!(JobState::from("Processing".to_string()), JobState::Processing);
        assert_eq!(JobState::from("failed".to_string()), JobState::Failed);
        assert_eq!(
            JobState::from("paused".to_string()),
            JobState::Other("paused".to_string())
        );
    }

    #[tokio::test]
    async fn test_completed_job_returns_results() {
        let mut server = mockito::Server::new_async().await;
        let body = json!({
            "status": "completed",
            "result": [
                {
                    "url": "https://a.com",
                    "domainStatus": "live",
                    "industryClassification": {
                        "zeroShotMetaDataClassify": [{ "label": "Tech", "score": 72 }],
                        "zeroShotDomainClassify": []
                    }
                },
                { "url": "https://b.com", "errorStatus": 500, "errorCode": "500", "errorMessage": "boom" }
            ]
        });
        let _m = server
            .mock("GET", "/api/status/job-1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await;

        let client = JobClient::new(test_config(server.url())).unwrap();
        let batch = client.wait_for_results("job-1").await.unwrap();

        assert_eq!(batch.results.len(), 1);
        assert_eq!(batch.failures.len(), 1);
        let score = batch.results[0].top_metadata().unwrap().score;
        assert!((score - 0.72).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_failed_job() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/api/status/job-2")
            .with_status(200)
            .with_body(json!({ "status": "failed", "result": null }).to_string())
            .create_async()
            .await;

        let client = JobClient::new(test_config(server.url())).unwrap();
        let err = client.wait_for_results("job-2").await.unwrap_err();
        assert!(matches!(err, ClientError::JobFailed { .. }));
    }

    #[tokio::test]
    async fn test_api_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/api/status/job-3")
            .with_status(500)
            .with_body("internal error")
            .create_async()
            .await;

        let client = JobClient::new(test_config(server.url())).unwrap();
        let err = client.fetch_status("job-3").await.unwrap_err();
        match err {
            ClientError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "internal error");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_gives_up_after_max_polls() {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("GET", "/api/status/job-4")
            .with_status(200)
            .with_body(json!({ "status": "processing" }).to_string())
            .expect(3)
            .create_async()
            .await;

        let client = JobClient::new(test_config(server.url())).unwrap();
        let err = client.wait_for_results("job-4").await.unwrap_err();

        assert!(matches!(err, ClientError::Timeout { polls: 3, .. }));
        m.assert_async().await;
    }
}
