use std::sync::mpsc;
use std::time::Duration;

use analysis_core::ResultSet;
use analysis_logging::{analysis_debug, analysis_warn};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::{AnalysisBackend, BackendError, BackendErrorKind, EngineEvent, JobStatus};

#[derive(Debug, Clone)]
pub struct PollSettings {
    /// Delay before each status query.
    pub interval: Duration,
    /// Wall-clock ceiling on the whole polling cycle; `None` polls until terminal.
    pub max_duration: Option<Duration>,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(1000),
            max_duration: None,
        }
    }
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelProgressSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    Done(ResultSet),
    Failed(BackendError),
    Cancelled,
}

/// Polls `job_id` until the backend reports a terminal status, a query fails,
/// or `cancel` fires.
///
/// Ticks are serialized: each query completes before the next delay starts.
/// A query already in flight when `cancel` fires is allowed to finish and its
/// answer is discarded. Failures are never retried.
pub async fn poll_job(
    backend: &dyn AnalysisBackend,
    job_id: &str,
    settings: &PollSettings,
    cancel: &CancellationToken,
    sink: &dyn ProgressSink,
) -> PollOutcome {
    let started = Instant::now();
    let mut ticks: u64 = 0;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => return PollOutcome::Cancelled,
            _ = tokio::time::sleep(settings.interval) => {}
        }

        if let Some(limit) = settings.max_duration {
            if started.elapsed() >= limit {
                analysis_warn!("Job {} still not finished after {:?}", job_id, limit);
                return PollOutcome::Failed(BackendError::new(
                    BackendErrorKind::Timeout,
                    format!("job did not finish within {limit:?}"),
                ));
            }
        }

        ticks += 1;
        let response = backend.poll(job_id).await;
        if cancel.is_cancelled() {
            return PollOutcome::Cancelled;
        }

        let response = match response {
            Ok(response) => response,
            Err(err) => {
                analysis_warn!("Poll {} for job {} failed: {}", ticks, job_id, err);
                return PollOutcome::Failed(err);
            }
        };

        match response.job_status() {
            JobStatus::Done => {
                analysis_debug!("Job {} done after {} polls", job_id, ticks);
                return PollOutcome::Done(response.result.unwrap_or_default());
            }
            JobStatus::Error => {
                return PollOutcome::Failed(BackendError::new(
                    BackendErrorKind::JobFailed,
                    "backend reported the job as failed",
                ));
            }
            JobStatus::Pending | JobStatus::Running | JobStatus::Other(_) => {
                if let Some(progress) = response.progress {
                    sink.emit(EngineEvent::Progress {
                        job_id: job_id.to_string(),
                        progress,
                    });
                }
            }
        }
    }
}
