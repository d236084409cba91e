//! Command-line parsing for the BLS series pipeline.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the fetch/merge code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::StartPolicy;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "bls", version, about = "Incremental fetcher for BLS time series")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch the configured series, merge them into the dataset CSV, and save.
    Fetch(FetchArgs),
    /// Summarize the persisted dataset without touching the network.
    Status(StatusArgs),
}

/// Options for a fetch run.
#[derive(Debug, Parser, Clone)]
pub struct FetchArgs {
    /// Path of the persisted dataset CSV.
    #[arg(long, default_value = "data/bls_observations.csv")]
    pub data: PathBuf,

    /// Series id to fetch (repeatable). Defaults to the built-in set.
    #[arg(short = 's', long = "series")]
    pub series: Vec<String>,

    /// Start year used when the dataset is empty.
    #[arg(long, default_value_t = 2022)]
    pub start_year: i32,

    /// End year of the fetch window (defaults to the current year).
    #[arg(long)]
    pub end_year: Option<i32>,

    /// Which end of the existing dataset anchors the fetch window.
    #[arg(long, value_enum, default_value_t = StartPolicy::Latest)]
    pub policy: StartPolicy,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Merge and report, but do not write the dataset back.
    #[arg(long)]
    pub dry_run: bool,
}

/// Options for the dataset status report.
#[derive(Debug, Parser)]
pub struct StatusArgs {
    /// Path of the persisted dataset CSV.
    #[arg(long, default_value = "data/bls_observations.csv")]
    pub data: PathBuf,
}
