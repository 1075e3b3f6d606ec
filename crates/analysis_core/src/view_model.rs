use crate::{JobPhase, SummaryStatistics};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub phase: JobPhase,
    pub busy: bool,
    /// Backend-reported percentage; not guaranteed to be monotonic.
    pub progress: Option<u8>,
    pub summary: Option<SummaryStatistics>,
    pub exports_enabled: bool,
    pub pending_notifications: usize,
    pub dirty: bool,
}

impl AppViewModel {
    /// `"42% completed"` style label while a job is in flight.
    pub fn progress_label(&self) -> Option<String> {
        self.progress.map(|value| format!("{value}% completed"))
    }
}
