mod cli;
mod platform;

use analysis_logging::analysis_error;
use clap::Parser;

fn main() {
    let args = cli::Args::parse();
    if let Err(err) = cli::dispatch(args) {
        analysis_error!("{:#}", err);
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
