use crate::{AnalysisRequest, ExportDocument, Generation, JobId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SubmitJob {
        generation: Generation,
        request: AnalysisRequest,
    },
    StartPolling { job_id: JobId },
    /// Stop the poller for a superseded job; late callbacks are ignored.
    CancelPolling { job_id: JobId },
    WriteExport(ExportDocument),
}
