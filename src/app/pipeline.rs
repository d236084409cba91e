//! Shared fetch pipeline used by the CLI commands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load -> start window -> per-series fetch -> merge
//!
//! The CLI front-end then focuses on presentation and on writing the result.

use std::time::Duration;

use chrono::{Datelike, Local};
use log::{info, warn};

use crate::data::bls::BlsClient;
use crate::domain::{
    Dataset, FetchConfig, FetchOutcome, FetchWindow, Observation, SeriesFetch, StartWindow,
};
use crate::error::AppError;
use crate::merge;

/// All computed outputs of a single `bls fetch` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub dataset: Dataset,
    pub window: StartWindow,
    pub fetch_window: FetchWindow,
    pub fetches: Vec<SeriesFetch>,
    pub observations_before: usize,
    pub observations_after: usize,
}

/// Execute the full fetch pipeline and return the merged dataset plus
/// per-series outcomes. Does not write anything; the caller decides that.
pub fn run_fetch(config: &FetchConfig) -> Result<RunOutput, AppError> {
    let client = BlsClient::from_env(Duration::from_secs(config.timeout_secs))?;
    let existing = crate::io::dataset::load_dataset(&config.data_path)?;

    let window = merge::compute_start_window(&existing, config.policy, config.default_start_year);
    let end_year = config.end_year.unwrap_or_else(|| Local::now().year());
    let fetch_window = FetchWindow {
        start_year: window.year,
        end_year,
    };

    let mut fetches = Vec::with_capacity(config.series_ids.len());
    for series_id in &config.series_ids {
        info!(
            "fetching {series_id} ({}..{})",
            fetch_window.start_year, fetch_window.end_year
        );
        let fetch = client.fetch_series(series_id, &fetch_window);
        match &fetch.outcome {
            FetchOutcome::Failed(reason) => warn!("{series_id}: {reason}"),
            FetchOutcome::Empty => info!("{series_id}: no data in window"),
            FetchOutcome::Success(obs) => info!("{series_id}: {} observations", obs.len()),
        }
        fetches.push(fetch);
    }

    Ok(merge_results(existing, window, fetch_window, fetches))
}

/// Fold per-series results into the dataset.
///
/// Split out from `run_fetch` so the merge step is testable without a client.
pub fn merge_results(
    existing: Dataset,
    window: StartWindow,
    fetch_window: FetchWindow,
    fetches: Vec<SeriesFetch>,
) -> RunOutput {
    let observations_before = existing.len();

    let incoming: Vec<Observation> = fetches
        .iter()
        .flat_map(|fetch| match &fetch.outcome {
            FetchOutcome::Success(obs) => obs.clone(),
            _ => Vec::new(),
        })
        .collect();

    let dataset = merge::merge(&existing, incoming);
    let observations_after = dataset.len();

    RunOutput {
        dataset,
        window,
        fetch_window,
        fetches,
        observations_before,
        observations_after,
    }
}
