use std::time::Duration;

use analysis_core::{AnalysisRequest, JobId};
use analysis_logging::{analysis_debug, analysis_info};
use serde::{Deserialize, Serialize};

use crate::{BackendError, BackendErrorKind, ProgressResponse};

#[derive(Debug, Clone)]
pub struct BackendSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5001".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// The two calls the controller makes against the analysis service.
#[async_trait::async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Starts a job and returns its id.
    async fn submit(&self, request: &AnalysisRequest) -> Result<JobId, BackendError>;

    /// Queries the status of a job once.
    async fn poll(&self, job_id: &str) -> Result<ProgressResponse, BackendError>;
}

#[derive(Debug, Serialize)]
struct SubmitBody<'a> {
    urls: Vec<SubmitEntry<'a>>,
}

#[derive(Debug, Serialize)]
struct SubmitEntry<'a> {
    url: &'a str,
    repeticiones: u32,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    task_id: String,
}

#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    base_url: reqwest::Url,
    client: reqwest::Client,
}

impl ReqwestBackend {
    pub fn new(settings: &BackendSettings) -> Result<Self, BackendError> {
        let base_url = reqwest::Url::parse(&settings.base_url)
            .map_err(|err| BackendError::new(BackendErrorKind::InvalidUrl, err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(BackendError::new(
                BackendErrorKind::InvalidUrl,
                format!("{base_url} cannot be used as a base url"),
            ));
        }
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| BackendError::new(BackendErrorKind::Network, err.to_string()))?;
        Ok(Self { base_url, client })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<reqwest::Url, BackendError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| BackendError::new(BackendErrorKind::InvalidUrl, "base url has no path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait::async_trait]
impl AnalysisBackend for ReqwestBackend {
    async fn submit(&self, request: &AnalysisRequest) -> Result<JobId, BackendError> {
        let url = self.endpoint(&["analizar-inicio"])?;
        let body = SubmitBody {
            urls: request
                .entries()
                .iter()
                .map(|entry| SubmitEntry {
                    url: &entry.url,
                    repeticiones: entry.repetitions,
                })
                .collect(),
        };
        analysis_debug!("POST {} with {} urls", url, body.urls.len());

        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let parsed: SubmitResponse = read_json(response).await?;
        analysis_info!("Backend accepted job {}", parsed.task_id);
        Ok(parsed.task_id)
    }

    async fn poll(&self, job_id: &str) -> Result<ProgressResponse, BackendError> {
        let url = self.endpoint(&["progreso", job_id])?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        read_json(response).await
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, BackendError> {
    let status = response.status();
    if !status.is_success() {
        return Err(BackendError::new(
            BackendErrorKind::HttpStatus(status.as_u16()),
            status.to_string(),
        ));
    }
    let text = response.text().await.map_err(map_reqwest_error)?;
    serde_json::from_str(&text)
        .map_err(|err| BackendError::new(BackendErrorKind::MalformedResponse, err.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> BackendError {
    if err.is_timeout() {
        return BackendError::new(BackendErrorKind::Timeout, err.to_string());
    }
    BackendError::new(BackendErrorKind::Network, err.to_string())
}
