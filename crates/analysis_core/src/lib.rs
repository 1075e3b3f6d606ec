//! Batch analyzer core: pure job lifecycle state machine, validation,
//! aggregation and export serialization.
mod charts;
mod effect;
mod error;
mod export;
mod msg;
mod record;
mod request;
mod result_set;
mod state;
mod stats;
mod update;
mod view_model;

pub use charts::{
    chart_series, response_time_points, ChartSeries, HtmlStats, ResponseTimePoint,
    ResponseTimeSample, ResponseTimeStats, SizeBuckets,
};
pub use effect::Effect;
pub use error::{AnalysisError, Notification, NotificationLevel};
pub use export::{
    export, export_csv, export_json, CsvWriter, ExportDocument, ExportFormat, CSV_EXPORT_FILENAME,
    CSV_HEADERS, JSON_EXPORT_FILENAME,
};
pub use msg::Msg;
pub use record::{Field, MetricRecord};
pub use request::{
    parse_input, parse_repetitions, preview, preview_all, validate, AnalysisRequest, UrlEntry,
    UrlPreview, UrlValidity, MAX_REPETITIONS, MIN_REPETITIONS,
};
pub use result_set::ResultSet;
pub use state::{AppState, Generation, JobId, JobPhase};
pub use stats::{summarize, SummaryStatistics, NO_SPEED_RATING};
pub use update::update;
pub use view_model::AppViewModel;
