//! Batch analyzer engine: backend IO, progress polling and export writing.
mod backend;
mod engine;
mod persist;
mod poller;
mod types;

pub use backend::{AnalysisBackend, BackendSettings, ReqwestBackend};
pub use engine::{EngineError, EngineHandle, EngineSettings};
pub use persist::{write_export, PersistError};
pub use poller::{poll_job, ChannelProgressSink, PollOutcome, PollSettings, ProgressSink};
pub use types::{BackendError, BackendErrorKind, EngineEvent, JobStatus, ProgressResponse};
