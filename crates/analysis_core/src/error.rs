use thiserror::Error;

/// Every failure the controller surfaces to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("malformed input: {0}")]
    MalformedInput(String),
    #[error("repetition count out of range (expected 1-100): {0}")]
    RepetitionCountOutOfRange(String),
    #[error("failed to start the analysis: {0}")]
    SubmissionFailed(String),
    #[error("failed to query progress: {0}")]
    PollFailed(String),
    #[error("no results to export")]
    NoDataToExport,
    #[error("serialization error: {0}")]
    Serialization(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

/// Transient user-facing message produced by a state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

impl From<&AnalysisError> for Notification {
    fn from(err: &AnalysisError) -> Self {
        Notification::error(err.to_string())
    }
}
