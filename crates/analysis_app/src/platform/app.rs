use std::fs;
use std::path::Path;
use std::time::Duration;

use analysis_core::{
    chart_series, export, parse_input, preview_all, response_time_points, summarize, update,
    AppState, ExportFormat, JobPhase, Msg, NotificationLevel, ResultSet,
};
use analysis_engine::{write_export, EngineHandle};
use analysis_logging::{analysis_error, analysis_info};
use anyhow::{bail, Context, Result};

use super::config::AppConfig;
use super::effects::EffectRunner;
use super::report;

const EVENT_WAIT: Duration = Duration::from_millis(200);

/// Drives one job from submission to its terminal state, then writes the requested exports.
pub fn run_analysis(
    config: &AppConfig,
    urls_path: &Path,
    repetitions: &str,
    exports: &[ExportFormat],
) -> Result<()> {
    let urls_json = read_input(urls_path)?;
    let engine = EngineHandle::new(config.engine_settings()).context("starting engine")?;
    let mut session = Session::new(EffectRunner::new(engine));

    session.dispatch(Msg::SubmitRequested {
        urls_json,
        repetitions: repetitions.to_string(),
    });
    if !session.state.phase().is_busy() {
        bail!("input rejected; nothing was submitted");
    }

    let mut last_label = None;
    while !session.state.phase().is_terminal() {
        let msg = session.runner.next_msg(EVENT_WAIT)?;
        session.dispatch(msg);
        if session.state.consume_dirty() {
            let label = session.state.view().progress_label();
            if label != last_label {
                if let Some(text) = &label {
                    println!("{text}");
                }
                last_label = label;
            }
        }
    }

    if let JobPhase::Failed { reason } = session.state.phase() {
        bail!("analysis failed: {reason}");
    }

    if let Some(summary) = session.state.view().summary {
        print!("{}", report::render_summary(&summary, &report::timestamp()));
    }

    for format in exports {
        session.export(*format)?;
    }
    if session.failed_exports > 0 {
        bail!("{} export(s) could not be written", session.failed_exports);
    }
    Ok(())
}

pub fn preview_urls(urls_path: &Path, repetitions: Option<&str>) -> Result<()> {
    let raw = read_input(urls_path)?;
    let request = parse_input(&raw, repetitions.unwrap_or("1"))?;
    let totals = repetitions.map(|_| (request.repetitions(), request.total_analyses()));
    print!("{}", report::render_preview(&preview_all(&request), totals));
    Ok(())
}

/// Offline processing of a previously exported `resultados.json`.
pub fn summarize_file(
    config: &AppConfig,
    results_path: &Path,
    write_csv: bool,
    show_charts: bool,
) -> Result<()> {
    let raw = fs::read_to_string(results_path)
        .with_context(|| format!("reading results: {}", results_path.display()))?;
    let results: ResultSet = serde_json::from_str(&raw)
        .with_context(|| format!("parsing results: {}", results_path.display()))?;
    analysis_info!(
        "Loaded {} URLs / {} records from {}",
        results.url_count(),
        results.record_count(),
        results_path.display()
    );

    print!(
        "{}",
        report::render_summary(&summarize(&results), &report::timestamp())
    );

    if show_charts {
        match chart_series(&results) {
            Some(series) => print!("{}", report::render_charts(&series)),
            None => println!("No response-time data to chart."),
        }
        print!("{}", report::render_points(&response_time_points(&results)));
    }

    if write_csv {
        let document = export(&results, ExportFormat::Csv)?;
        let path = write_export(&config.output_dir, &document)?;
        println!("Exported {} to {}", document.filename, path.display());
    }
    Ok(())
}

fn read_input(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading URL list: {}", path.display()))
}

struct Session {
    state: AppState,
    runner: EffectRunner,
    failed_exports: usize,
}

impl Session {
    fn new(runner: EffectRunner) -> Self {
        Self {
            state: AppState::new(),
            runner,
            failed_exports: 0,
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let (state, effects) = update(std::mem::take(&mut self.state), msg);
        self.state = state;
        self.runner.enqueue(effects);
        self.flush_notifications();
    }

    /// Requests one export and blocks until the engine reports on it.
    fn export(&mut self, format: ExportFormat) -> Result<()> {
        let has_results = self.state.results().is_some_and(|results| !results.is_empty());
        self.dispatch(Msg::ExportRequested(format));
        if !has_results {
            self.failed_exports += 1;
            return Ok(());
        }
        loop {
            let msg = self.runner.next_msg(EVENT_WAIT)?;
            let finished = match &msg {
                Msg::ExportWritten { format: done, .. } => *done == format,
                Msg::ExportFailed { format: done, .. } => {
                    if *done == format {
                        self.failed_exports += 1;
                    }
                    *done == format
                }
                _ => false,
            };
            self.dispatch(msg);
            if finished {
                return Ok(());
            }
        }
    }

    fn flush_notifications(&mut self) {
        for notification in self.state.take_notifications() {
            let line = report::render_notification(&notification);
            match notification.level {
                NotificationLevel::Success => println!("{line}"),
                NotificationLevel::Error => {
                    analysis_error!("{}", notification.message);
                    eprintln!("{line}");
                }
            }
        }
    }
}
