use std::path::{Path, PathBuf};
use std::time::Duration;

use analysis_engine::{BackendSettings, EngineSettings, PollSettings};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::logging::LogDestination;

pub const DEFAULT_CONFIG_FILENAME: &str = "batch-analyzer.ron";

/// Settings read from `batch-analyzer.ron`; every field is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend_url: String,
    pub poll_interval_ms: u64,
    /// Give up on a job that has not finished after this many seconds.
    pub max_poll_duration_secs: Option<u64>,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub output_dir: PathBuf,
    pub log_level: String,
    pub log_destination: LogDestination,
    pub log_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        let backend = BackendSettings::default();
        Self {
            backend_url: backend.base_url,
            poll_interval_ms: 1000,
            max_poll_duration_secs: None,
            connect_timeout_secs: backend.connect_timeout.as_secs(),
            request_timeout_secs: backend.request_timeout.as_secs(),
            output_dir: PathBuf::from("."),
            log_level: "info".to_string(),
            log_destination: LogDestination::Terminal,
            log_file: PathBuf::from("./batch-analyzer.log"),
        }
    }
}

impl AppConfig {
    /// Loads `path`, or `./batch-analyzer.ron` when present, or the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILENAME);
                if default.exists() {
                    Self::from_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("parsing config: {}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        Ok(ron::from_str(raw)?)
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            backend: BackendSettings {
                base_url: self.backend_url.clone(),
                connect_timeout: Duration::from_secs(self.connect_timeout_secs),
                request_timeout: Duration::from_secs(self.request_timeout_secs),
            },
            poll: PollSettings {
                interval: Duration::from_millis(self.poll_interval_ms.max(1)),
                max_duration: self.max_poll_duration_secs.map(Duration::from_secs),
            },
            output_dir: self.output_dir.clone(),
        }
    }
}
