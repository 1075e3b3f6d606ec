use std::sync::mpsc::RecvTimeoutError;
use std::time::Duration;

use analysis_core::{Effect, Msg};
use analysis_engine::{EngineEvent, EngineHandle};
use analysis_logging::{analysis_debug, analysis_info, analysis_warn};
use anyhow::{bail, Result};

/// Executes core effects against the engine and turns engine events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SubmitJob {
                    generation,
                    request,
                } => {
                    analysis_info!(
                        "SubmitJob generation={} urls={} repetitions={}",
                        generation,
                        request.len(),
                        request.repetitions()
                    );
                    self.engine.submit(generation, request);
                }
                Effect::StartPolling { job_id } => {
                    analysis_debug!("StartPolling job_id={}", job_id);
                    self.engine.start_polling(job_id);
                }
                Effect::CancelPolling { job_id } => {
                    analysis_debug!("CancelPolling job_id={}", job_id);
                    self.engine.cancel_polling(job_id);
                }
                Effect::WriteExport(document) => {
                    analysis_debug!(
                        "WriteExport {} bytes={}",
                        document.filename,
                        document.contents.len()
                    );
                    self.engine.write_export(document);
                }
            }
        }
    }

    /// Waits up to `timeout` for the next engine event that the core cares about.
    ///
    /// Returns `Msg::Tick` when nothing arrived in time.
    pub fn next_msg(&self, timeout: Duration) -> Result<Msg> {
        received_msg(self.engine.recv_timeout(timeout))
    }
}

fn received_msg(received: Result<EngineEvent, RecvTimeoutError>) -> Result<Msg> {
    match received {
        Ok(event) => Ok(map_event(event).unwrap_or(Msg::NoOp)),
        Err(RecvTimeoutError::Timeout) => Ok(Msg::Tick),
        Err(RecvTimeoutError::Disconnected) => bail!("analysis engine stopped unexpectedly"),
    }
}

pub fn map_event(event: EngineEvent) -> Option<Msg> {
    let msg = match event {
        EngineEvent::JobAccepted { generation, job_id } => Msg::JobAccepted { generation, job_id },
        EngineEvent::SubmissionFailed { generation, error } => Msg::SubmissionFailed {
            generation,
            message: error.to_string(),
        },
        EngineEvent::Progress { job_id, progress } => Msg::ProgressReported { job_id, progress },
        EngineEvent::JobCompleted { job_id, result } => Msg::JobCompleted { job_id, result },
        EngineEvent::PollFailed { job_id, error } => {
            analysis_warn!("Job {} stopped polling: {}", job_id, error);
            Msg::PollFailed {
                job_id,
                message: error.to_string(),
            }
        }
        EngineEvent::PollCancelled { job_id } => {
            analysis_debug!("Poller for job {} cancelled", job_id);
            return None;
        }
        EngineEvent::ExportWritten { format, path } => Msg::ExportWritten {
            format,
            path: path.display().to_string(),
        },
        EngineEvent::ExportFailed { format, message } => Msg::ExportFailed { format, message },
    };
    Some(msg)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use analysis_core::{ExportFormat, ResultSet};
    use analysis_engine::{BackendError, BackendErrorKind};

    use super::*;

    #[test]
    fn cancelled_pollers_produce_no_message() {
        let event = EngineEvent::PollCancelled {
            job_id: "job-1".to_string(),
        };
        assert_eq!(map_event(event), None);
    }

    #[test]
    fn a_dead_engine_is_an_error_not_a_tick() {
        assert_eq!(received_msg(Err(RecvTimeoutError::Timeout)).unwrap(), Msg::Tick);
        let err = received_msg(Err(RecvTimeoutError::Disconnected)).unwrap_err();
        assert!(err.to_string().contains("stopped"), "{err}");
        let cancelled = EngineEvent::PollCancelled {
            job_id: "job-1".to_string(),
        };
        assert_eq!(received_msg(Ok(cancelled)).unwrap(), Msg::NoOp);
    }

    #[test]
    fn backend_errors_keep_their_cause_in_the_message() {
        let event = EngineEvent::SubmissionFailed {
            generation: 4,
            error: BackendError {
                kind: BackendErrorKind::HttpStatus(502),
                message: "bad gateway".to_string(),
            },
        };
        match map_event(event) {
            Some(Msg::SubmissionFailed {
                generation,
                message,
            }) => {
                assert_eq!(generation, 4);
                assert!(message.contains("502"), "{message}");
                assert!(message.contains("bad gateway"), "{message}");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn completion_and_exports_map_one_to_one() {
        let done = map_event(EngineEvent::JobCompleted {
            job_id: "job-2".to_string(),
            result: ResultSet::new(),
        });
        assert_eq!(
            done,
            Some(Msg::JobCompleted {
                job_id: "job-2".to_string(),
                result: ResultSet::new()
            })
        );

        let written = map_event(EngineEvent::ExportWritten {
            format: ExportFormat::Csv,
            path: PathBuf::from("out").join("resultados.csv"),
        });
        match written {
            Some(Msg::ExportWritten { format, path }) => {
                assert_eq!(format, ExportFormat::Csv);
                assert!(path.ends_with("resultados.csv"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
