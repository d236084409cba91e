//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - runs the fetch/merge pipeline
//! - writes the updated dataset
//! - prints reports

use clap::Parser;

use crate::cli::{Cli, Command, FetchArgs, StatusArgs};
use crate::data::bls::DEFAULT_SERIES;
use crate::domain::FetchConfig;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `bls` binary.
pub fn run() -> Result<(), AppError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Fetch(args) => handle_fetch(args),
        Command::Status(args) => handle_status(args),
    }
}

fn handle_fetch(args: FetchArgs) -> Result<(), AppError> {
    let config = fetch_config_from_args(&args);
    let run = pipeline::run_fetch(&config)?;

    if !config.dry_run {
        crate::io::dataset::write_dataset(&config.data_path, &run.dataset)?;
    }

    println!("{}", crate::report::format_run_summary(&run, &config));
    Ok(())
}

fn handle_status(args: StatusArgs) -> Result<(), AppError> {
    let dataset = crate::io::dataset::load_dataset(&args.data)?;
    let stats = crate::report::series_stats(&dataset);

    println!("{}", crate::report::format_status(&args.data, &stats));
    Ok(())
}

pub fn fetch_config_from_args(args: &FetchArgs) -> FetchConfig {
    let series_ids = if args.series.is_empty() {
        DEFAULT_SERIES.iter().map(|(id, _)| id.to_string()).collect()
    } else {
        args.series.clone()
    };

    FetchConfig {
        data_path: args.data.clone(),
        series_ids,
        default_start_year: args.start_year,
        end_year: args.end_year,
        policy: args.policy,
        timeout_secs: args.timeout_secs,
        dry_run: args.dry_run,
    }
}
