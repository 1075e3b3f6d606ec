use crate::{ExportFormat, Generation, JobId, ResultSet};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User asked to analyze the URL list file contents `repetitions` times each.
    SubmitRequested {
        urls_json: String,
        repetitions: String,
    },
    /// Backend accepted a submission and assigned a job id.
    JobAccepted { generation: Generation, job_id: JobId },
    /// Starting the job failed (network, non-2xx, malformed body).
    SubmissionFailed { generation: Generation, message: String },
    /// A poll returned a non-terminal status.
    ProgressReported { job_id: JobId, progress: i64 },
    /// A poll returned `done` with its result payload.
    JobCompleted { job_id: JobId, result: ResultSet },
    /// A poll query failed; the poller has already stopped.
    PollFailed { job_id: JobId, message: String },
    /// User asked for a download of the current results.
    ExportRequested(ExportFormat),
    ExportWritten { format: ExportFormat, path: String },
    ExportFailed { format: ExportFormat, message: String },
    /// Render tick.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
