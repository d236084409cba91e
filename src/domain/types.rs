//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - built up in memory during a fetch run
//! - persisted to CSV and reloaded by the next run
//! - summarized in terminal reports

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One monthly data point of a named series.
///
/// `(series_id, date)` is the uniqueness key throughout the pipeline.
/// `date` is always the first day of the observation's month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub series_id: String,
    pub date: NaiveDate,
    pub value: f64,
}

/// An ordered collection of observations.
///
/// A `Dataset` produced by `merge::merge` is unique by `(series_id, date)`
/// and sorted ascending by that key. A dataset read from disk is re-sorted on
/// load, so downstream code can rely on the sort order either way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub observations: Vec<Observation>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Newest observation date across all series.
    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.observations.iter().map(|o| o.date).max()
    }

    /// Oldest observation date across all series.
    pub fn earliest_date(&self) -> Option<NaiveDate> {
        self.observations.iter().map(|o| o.date).min()
    }

    /// Restore the `(series_id, date)` sort order.
    pub fn sort(&mut self) {
        self.observations
            .sort_by(|a, b| (a.series_id.as_str(), a.date).cmp(&(b.series_id.as_str(), b.date)));
    }
}

/// Which end of the existing dataset anchors the fetch window.
///
/// The two anchors produce very different result sets, so exactly one applies
/// per run and it is an explicit CLI choice rather than an implementation
/// detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StartPolicy {
    /// Anchor at the newest known date: re-request the anchor month onward,
    /// picking up new months plus any revisions to the anchor itself.
    Latest,
    /// Anchor at the oldest known date: refetch the whole history. Useful
    /// when the persisted file is suspect.
    Earliest,
}

/// Start of the fetch window derived from the persisted dataset.
///
/// The remote API only accepts whole years; the month is carried so reports
/// can show exactly where a run resumed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartWindow {
    pub year: i32,
    pub month: u32,
}

/// Year range requested from the remote source, applied to each series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchWindow {
    pub start_year: i32,
    pub end_year: i32,
}

/// What one series request produced, kept as three distinct cases so the
/// operator can tell "no data available" apart from "transient error".
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// The remote answered with data. Records that failed normalization have
    /// already been dropped (and counted in `SeriesFetch::dropped`).
    Success(Vec<Observation>),
    /// The remote answered successfully but the data array was empty.
    Empty,
    /// Transport failure, non-success HTTP status, or an application-level
    /// failure status. Never fatal to the run.
    Failed(String),
}

/// Per-series fetch result as shown in the run summary.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesFetch {
    pub series_id: String,
    /// Raw records in the response, before normalization.
    pub records_read: usize,
    /// Records dropped because a field failed to normalize.
    pub dropped: usize,
    pub outcome: FetchOutcome,
}

/// A full run's configuration as understood by the pipeline.
///
/// Derived from CLI flags (plus defaults); loaded once at startup and
/// immutable for the run.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub data_path: PathBuf,
    pub series_ids: Vec<String>,
    /// Epoch used by `compute_start_window` when the dataset is empty.
    pub default_start_year: i32,
    /// End of the fetch window; `None` means the current year.
    pub end_year: Option<i32>,
    pub policy: StartPolicy,
    pub timeout_secs: u64,
    /// Merge and report, but do not write the dataset back.
    pub dry_run: bool,
}

/// Per-series summary of the persisted dataset (for `bls status`).
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesStats {
    pub series_id: String,
    pub n_obs: usize,
    pub first: NaiveDate,
    pub last: NaiveDate,
    pub latest_value: f64,
}
