//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the fetch/merge code stays clean and testable
//! - output changes are localized

use std::path::Path;

use crate::app::pipeline::RunOutput;
use crate::data::bls::series_label;
use crate::domain::{FetchConfig, FetchOutcome, SeriesFetch, SeriesStats, StartPolicy};

/// Format the full fetch-run summary: window, per-series outcomes, and how
/// the dataset changed.
pub fn format_run_summary(run: &RunOutput, config: &FetchConfig) -> String {
    let mut out = String::new();

    out.push_str("=== bls - fetch summary ===\n");
    out.push_str(&format!(
        "Window: {}-{:02} -> {} (policy: {})\n",
        run.window.year,
        run.window.month,
        run.fetch_window.end_year,
        policy_name(config.policy),
    ));
    out.push_str(&format!("Dataset: {}\n", config.data_path.display()));
    out.push('\n');

    out.push_str(&format_series_table(&run.fetches));
    out.push('\n');

    let added = run.observations_after.saturating_sub(run.observations_before);
    out.push_str(&format!(
        "Observations: {} -> {} (+{added})\n",
        run.observations_before, run.observations_after,
    ));
    if config.dry_run {
        out.push_str("Dry run: dataset not written.\n");
    }

    out
}

/// Format the `status` output: one line per series in the persisted dataset.
pub fn format_status(path: &Path, stats: &[SeriesStats]) -> String {
    let mut out = String::new();

    out.push_str("=== bls - dataset status ===\n");
    out.push_str(&format!("Dataset: {}\n", path.display()));

    if stats.is_empty() {
        out.push_str("(empty)\n");
        return out;
    }

    out.push('\n');
    out.push_str(&format!(
        "{:<15} {:<32} {:>6} {:>12} {:>12} {:>12}\n",
        "series", "label", "n_obs", "first", "last", "latest"
    ));
    out.push_str(&format!(
        "{:-<15} {:-<32} {:-<6} {:-<12} {:-<12} {:-<12}\n",
        "", "", "", "", "", ""
    ));

    for s in stats {
        out.push_str(&format!(
            "{:<15} {:<32} {:>6} {:>12} {:>12} {:>12.3}\n",
            s.series_id,
            series_label(&s.series_id).unwrap_or(""),
            s.n_obs,
            s.first.format("%Y-%m-%d"),
            s.last.format("%Y-%m-%d"),
            s.latest_value,
        ));
    }

    out
}

fn format_series_table(fetches: &[SeriesFetch]) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "{:<15} {:<32} {:>6} {:>8} outcome\n",
        "series", "label", "rows", "dropped"
    ));
    out.push_str(&format!(
        "{:-<15} {:-<32} {:-<6} {:-<8} {:-<24}\n",
        "", "", "", "", ""
    ));

    for fetch in fetches {
        out.push_str(&format!(
            "{:<15} {:<32} {:>6} {:>8} {}\n",
            fetch.series_id,
            series_label(&fetch.series_id).unwrap_or(""),
            fetch.records_read,
            fetch.dropped,
            outcome_label(&fetch.outcome),
        ));
    }

    out
}

fn outcome_label(outcome: &FetchOutcome) -> String {
    match outcome {
        FetchOutcome::Success(obs) => format!("ok ({} observations)", obs.len()),
        FetchOutcome::Empty => "no data".to_string(),
        FetchOutcome::Failed(reason) => format!("failed: {reason}"),
    }
}

fn policy_name(policy: StartPolicy) -> &'static str {
    match policy {
        StartPolicy::Latest => "latest",
        StartPolicy::Earliest => "earliest",
    }
}
