use crate::{export, parse_input, AnalysisError, AppState, Effect, Msg, Notification};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::SubmitRequested {
            urls_json,
            repetitions,
        } => {
            // Validation failures leave the current cycle untouched.
            let request = match parse_input(&urls_json, &repetitions) {
                Ok(request) => request,
                Err(err) => {
                    state.notify_error(&err);
                    return (state, Vec::new());
                }
            };
            let mut effects = Vec::with_capacity(2);
            if let Some(job_id) = state.polling_job_id() {
                effects.push(Effect::CancelPolling {
                    job_id: job_id.clone(),
                });
            }
            let generation = state.begin_submission(request.clone());
            effects.push(Effect::SubmitJob {
                generation,
                request,
            });
            effects
        }
        Msg::JobAccepted { generation, job_id } => {
            if state.is_awaiting_acceptance(generation) {
                state.start_polling(job_id.clone());
                vec![Effect::StartPolling { job_id }]
            } else {
                Vec::new()
            }
        }
        Msg::SubmissionFailed {
            generation,
            message,
        } => {
            if state.is_awaiting_acceptance(generation) {
                state.fail(&AnalysisError::SubmissionFailed(message));
            }
            Vec::new()
        }
        Msg::ProgressReported { job_id, progress } => {
            if state.is_polling(&job_id) {
                state.set_progress(progress);
            }
            Vec::new()
        }
        Msg::JobCompleted { job_id, result } => {
            if state.is_polling(&job_id) {
                let message = format!(
                    "Analysis completed: {} URLs, {} requests",
                    result.url_count(),
                    result.record_count()
                );
                state.complete(job_id, result);
                state.notify(Notification::success(message));
            }
            Vec::new()
        }
        Msg::PollFailed { job_id, message } => {
            if state.is_polling(&job_id) {
                state.fail(&AnalysisError::PollFailed(message));
            }
            Vec::new()
        }
        Msg::ExportRequested(format) => {
            let document = match state.results() {
                Some(results) => export(results, format),
                None => Err(AnalysisError::NoDataToExport),
            };
            match document {
                Ok(document) => vec![Effect::WriteExport(document)],
                Err(err) => {
                    state.notify_error(&err);
                    Vec::new()
                }
            }
        }
        Msg::ExportWritten { format, path } => {
            state.notify(Notification::success(format!(
                "Exported {} to {path}",
                format.filename()
            )));
            Vec::new()
        }
        Msg::ExportFailed { format, message } => {
            state.notify(Notification::error(format!(
                "Failed to export {}: {message}",
                format.filename()
            )));
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
