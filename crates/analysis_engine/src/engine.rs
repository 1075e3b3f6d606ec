use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use analysis_core::{AnalysisRequest, ExportDocument, Generation, JobId};
use analysis_logging::{analysis_debug, analysis_error, analysis_info, analysis_warn};
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

use crate::persist::write_export;
use crate::poller::{poll_job, ChannelProgressSink, PollOutcome, PollSettings};
use crate::{AnalysisBackend, BackendError, BackendSettings, EngineEvent, ReqwestBackend};

#[derive(Debug, Clone, Default)]
pub struct EngineSettings {
    pub backend: BackendSettings,
    pub poll: PollSettings,
    pub output_dir: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

enum EngineCommand {
    Submit {
        generation: Generation,
        request: AnalysisRequest,
    },
    StartPolling {
        job_id: JobId,
    },
    CancelPolling {
        job_id: JobId,
    },
    WriteExport(ExportDocument),
}

/// Owns the background runtime; commands in, events out.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: EngineSettings) -> Result<Self, EngineError> {
        let backend = ReqwestBackend::new(&settings.backend)?;
        Self::with_backend(Arc::new(backend), settings.poll, settings.output_dir)
    }

    pub fn with_backend(
        backend: Arc<dyn AnalysisBackend>,
        poll: PollSettings,
        output_dir: PathBuf,
    ) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = Runtime::new()?;

        thread::spawn(move || {
            let mut worker = Worker {
                runtime,
                backend,
                poll,
                output_dir,
                event_tx,
                active_poll: None,
            };
            while let Ok(command) = cmd_rx.recv() {
                worker.handle(command);
            }
            worker.cancel_active();
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn submit(&self, generation: Generation, request: AnalysisRequest) {
        let _ = self.cmd_tx.send(EngineCommand::Submit {
            generation,
            request,
        });
    }

    /// Starts polling `job_id`, cancelling any poller that is still running.
    pub fn start_polling(&self, job_id: impl Into<JobId>) {
        let _ = self.cmd_tx.send(EngineCommand::StartPolling {
            job_id: job_id.into(),
        });
    }

    pub fn cancel_polling(&self, job_id: impl Into<JobId>) {
        let _ = self.cmd_tx.send(EngineCommand::CancelPolling {
            job_id: job_id.into(),
        });
    }

    pub fn write_export(&self, document: ExportDocument) {
        let _ = self.cmd_tx.send(EngineCommand::WriteExport(document));
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    /// `Disconnected` means the worker thread is gone and no further events will arrive.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<EngineEvent, mpsc::RecvTimeoutError> {
        self.event_rx.recv_timeout(timeout)
    }
}

struct Worker {
    runtime: Runtime,
    backend: Arc<dyn AnalysisBackend>,
    poll: PollSettings,
    output_dir: PathBuf,
    event_tx: mpsc::Sender<EngineEvent>,
    active_poll: Option<(JobId, CancellationToken)>,
}

impl Worker {
    fn handle(&mut self, command: EngineCommand) {
        match command {
            EngineCommand::Submit {
                generation,
                request,
            } => {
                let backend = self.backend.clone();
                let event_tx = self.event_tx.clone();
                self.runtime.spawn(async move {
                    let event = match backend.submit(&request).await {
                        Ok(job_id) => EngineEvent::JobAccepted { generation, job_id },
                        Err(error) => {
                            analysis_error!("Submission {} failed: {}", generation, error);
                            EngineEvent::SubmissionFailed { generation, error }
                        }
                    };
                    let _ = event_tx.send(event);
                });
            }
            EngineCommand::StartPolling { job_id } => {
                self.cancel_active();
                let token = CancellationToken::new();
                self.active_poll = Some((job_id.clone(), token.clone()));

                let backend = self.backend.clone();
                let settings = self.poll.clone();
                let event_tx = self.event_tx.clone();
                analysis_info!("Polling job {} every {:?}", job_id, settings.interval);
                self.runtime.spawn(async move {
                    let sink = ChannelProgressSink::new(event_tx.clone());
                    let outcome =
                        poll_job(backend.as_ref(), &job_id, &settings, &token, &sink).await;
                    let event = match outcome {
                        PollOutcome::Done(result) => EngineEvent::JobCompleted { job_id, result },
                        PollOutcome::Failed(error) => EngineEvent::PollFailed { job_id, error },
                        PollOutcome::Cancelled => EngineEvent::PollCancelled { job_id },
                    };
                    let _ = event_tx.send(event);
                });
            }
            EngineCommand::CancelPolling { job_id } => {
                if self
                    .active_poll
                    .as_ref()
                    .is_some_and(|(active, _)| *active == job_id)
                {
                    self.cancel_active();
                } else {
                    analysis_debug!("No active poller for job {}", job_id);
                }
            }
            EngineCommand::WriteExport(document) => {
                let event = match write_export(&self.output_dir, &document) {
                    Ok(path) => {
                        analysis_info!("Wrote {} ({})", path.display(), document.format.mime_type());
                        EngineEvent::ExportWritten {
                            format: document.format,
                            path,
                        }
                    }
                    Err(err) => {
                        analysis_warn!("Failed to write {}: {}", document.filename, err);
                        EngineEvent::ExportFailed {
                            format: document.format,
                            message: err.to_string(),
                        }
                    }
                };
                let _ = self.event_tx.send(event);
            }
        }
    }

    fn cancel_active(&mut self) {
        if let Some((job_id, token)) = self.active_poll.take() {
            analysis_debug!("Cancelling poller for job {}", job_id);
            token.cancel();
        }
    }
}
