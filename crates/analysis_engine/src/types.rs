use std::fmt;
use std::path::PathBuf;

use analysis_core::{ExportFormat, Generation, JobId, ResultSet};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    JobAccepted {
        generation: Generation,
        job_id: JobId,
    },
    SubmissionFailed {
        generation: Generation,
        error: BackendError,
    },
    Progress {
        job_id: JobId,
        progress: i64,
    },
    JobCompleted {
        job_id: JobId,
        result: ResultSet,
    },
    PollFailed {
        job_id: JobId,
        error: BackendError,
    },
    /// The poller for a superseded job stopped; nothing to report upstream.
    PollCancelled {
        job_id: JobId,
    },
    ExportWritten {
        format: ExportFormat,
        path: PathBuf,
    },
    ExportFailed {
        format: ExportFormat,
        message: String,
    },
}

/// Body of `GET /progreso/{task_id}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProgressResponse {
    pub status: String,
    #[serde(default)]
    pub progress: Option<i64>,
    #[serde(default)]
    pub result: Option<ResultSet>,
}

impl ProgressResponse {
    pub fn job_status(&self) -> JobStatus {
        JobStatus::from(self.status.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Running,
    Done,
    Error,
    Other(String),
}

impl From<&str> for JobStatus {
    fn from(raw: &str) -> Self {
        match raw {
            "pending" => JobStatus::Pending,
            "running" | "processing" => JobStatus::Running,
            "done" => JobStatus::Done,
            "error" => JobStatus::Error,
            other => JobStatus::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct BackendError {
    pub kind: BackendErrorKind,
    pub message: String,
}

impl BackendError {
    pub(crate) fn new(kind: BackendErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendErrorKind {
    InvalidUrl,
    Network,
    Timeout,
    HttpStatus(u16),
    MalformedResponse,
    JobFailed,
}

impl fmt::Display for BackendErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendErrorKind::InvalidUrl => write!(f, "invalid backend url"),
            BackendErrorKind::Network => write!(f, "network error"),
            BackendErrorKind::Timeout => write!(f, "timeout"),
            BackendErrorKind::HttpStatus(code) => write!(f, "http status {code}"),
            BackendErrorKind::MalformedResponse => write!(f, "malformed response"),
            BackendErrorKind::JobFailed => write!(f, "job failed"),
        }
    }
}
