use std::path::PathBuf;

use analysis_core::ExportFormat;
use analysis_logging::parse_level;
use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::platform::{app, config::AppConfig, logging};

#[derive(Parser, Debug)]
#[command(name = "batch-analyzer")]
#[command(about = "Submit URL batches to the analysis backend and export the results")]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Command,

    /// Path to config RON. If omitted, uses ./batch-analyzer.ron if present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Override the backend base URL.
    #[arg(long, global = true)]
    pub backend_url: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the domain and protocol of each URL without submitting anything.
    Preview {
        /// JSON file holding an array of URL strings.
        #[arg(long)]
        urls: PathBuf,
        #[arg(long)]
        repetitions: Option<String>,
    },
    /// Submit a batch, follow it to completion and print the summary.
    Run {
        #[arg(long)]
        urls: PathBuf,
        /// Analyses per URL (1-100).
        #[arg(long)]
        repetitions: String,
        /// Write resultados.json when the job is done.
        #[arg(long)]
        json: bool,
        /// Write resultados.csv when the job is done.
        #[arg(long)]
        csv: bool,
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Summarize a previously exported resultados.json.
    Summarize {
        #[arg(long)]
        results: PathBuf,
        #[arg(long)]
        csv: bool,
        #[arg(long)]
        charts: bool,
    },
}

pub fn dispatch(args: Args) -> Result<()> {
    let mut cfg = AppConfig::load(args.config.as_deref())?;
    apply_overrides(&mut cfg, &args);
    logging::initialize(cfg.log_destination, parse_level(&cfg.log_level), &cfg.log_file);

    match args.cmd {
        Command::Preview { urls, repetitions } => app::preview_urls(&urls, repetitions.as_deref()),
        Command::Run {
            urls,
            repetitions,
            json,
            csv,
            out_dir,
        } => {
            if let Some(dir) = out_dir {
                cfg.output_dir = dir;
            }
            app::run_analysis(&cfg, &urls, &repetitions, &export_formats(json, csv))
        }
        Command::Summarize {
            results,
            csv,
            charts,
        } => app::summarize_file(&cfg, &results, csv, charts),
    }
}

fn apply_overrides(cfg: &mut AppConfig, args: &Args) {
    if let Some(level) = &args.log_level {
        cfg.log_level = level.clone();
    }
    if let Some(url) = &args.backend_url {
        cfg.backend_url = url.clone();
    }
}

fn export_formats(json: bool, csv: bool) -> Vec<ExportFormat> {
    let mut formats = Vec::new();
    if json {
        formats.push(ExportFormat::Json);
    }
    if csv {
        formats.push(ExportFormat::Csv);
    }
    formats
}
