use crate::view_model::AppViewModel;
use crate::{summarize, AnalysisError, AnalysisRequest, Notification, ResultSet};

/// Opaque backend task identifier.
pub type JobId = String;

/// Per-submission counter; responses carrying an older value are stale.
pub type Generation = u64;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum JobPhase {
    #[default]
    Idle,
    Submitted {
        generation: Generation,
    },
    Polling {
        generation: Generation,
        job_id: JobId,
        progress: u8,
    },
    Done {
        job_id: JobId,
    },
    Failed {
        reason: String,
    },
}

impl JobPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobPhase::Done { .. } | JobPhase::Failed { .. })
    }

    /// Submitted or polling; the submit control stays disabled.
    pub fn is_busy(&self) -> bool {
        matches!(self, JobPhase::Submitted { .. } | JobPhase::Polling { .. })
    }
}

/// Session state. Holds the single retained result set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    phase: JobPhase,
    generation: Generation,
    request: Option<AnalysisRequest>,
    results: Option<ResultSet>,
    notifications: Vec<Notification>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &JobPhase {
        &self.phase
    }

    /// Request of the most recent accepted submission.
    pub fn request(&self) -> Option<&AnalysisRequest> {
        self.request.as_ref()
    }

    pub fn results(&self) -> Option<&ResultSet> {
        self.results.as_ref()
    }

    pub fn view(&self) -> AppViewModel {
        let progress = match &self.phase {
            JobPhase::Polling { progress, .. } => Some(*progress),
            JobPhase::Done { .. } => Some(100),
            _ => None,
        };
        AppViewModel {
            phase: self.phase.clone(),
            busy: self.phase.is_busy(),
            progress,
            summary: self.results.as_ref().map(summarize),
            exports_enabled: self.results.as_ref().is_some_and(|r| !r.is_empty()),
            pending_notifications: self.notifications.len(),
            dirty: self.dirty,
        }
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
        self.mark_dirty();
    }

    pub(crate) fn notify_error(&mut self, err: &AnalysisError) {
        self.notify(Notification::from(err));
    }

    pub(crate) fn polling_job_id(&self) -> Option<&JobId> {
        match &self.phase {
            JobPhase::Polling { job_id, .. } => Some(job_id),
            _ => None,
        }
    }

    pub(crate) fn is_polling(&self, candidate: &str) -> bool {
        self.polling_job_id().is_some_and(|job_id| job_id == candidate)
    }

    pub(crate) fn is_awaiting_acceptance(&self, candidate: Generation) -> bool {
        matches!(self.phase, JobPhase::Submitted { generation } if generation == candidate)
    }

    /// Resets to a fresh cycle and returns its generation.
    pub(crate) fn begin_submission(&mut self, request: AnalysisRequest) -> Generation {
        self.generation += 1;
        self.request = Some(request);
        self.phase = JobPhase::Submitted {
            generation: self.generation,
        };
        self.mark_dirty();
        self.generation
    }

    pub(crate) fn start_polling(&mut self, job_id: JobId) {
        self.phase = JobPhase::Polling {
            generation: self.generation,
            job_id,
            progress: 0,
        };
        self.mark_dirty();
    }

    pub(crate) fn set_progress(&mut self, reported: i64) {
        if let JobPhase::Polling { progress, .. } = &mut self.phase {
            let clamped = reported.clamp(0, 100) as u8;
            if *progress != clamped {
                *progress = clamped;
                self.dirty = true;
            }
        }
    }

    /// The only writer of the result slot.
    pub(crate) fn complete(&mut self, job_id: JobId, results: ResultSet) {
        self.results = Some(results);
        self.phase = JobPhase::Done { job_id };
        self.mark_dirty();
    }

    pub(crate) fn fail(&mut self, err: &AnalysisError) {
        self.phase = JobPhase::Failed {
            reason: err.to_string(),
        };
        self.notify_error(err);
    }
}
