//! Incremental series merger.
//!
//! A run is a load → fetch → merge → save cycle; this module owns the middle
//! step: deciding how far back to re-request, and folding freshly fetched
//! observations into whatever the previous run persisted.
//!
//! Invariants after `merge`:
//!
//! - no two observations share a `(series_id, date)` key
//! - observations are sorted ascending by that key
//! - where existing and incoming overlap, the incoming value is kept

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::domain::{Dataset, Observation, StartPolicy, StartWindow};

/// Determine the start of the fetch window from the persisted dataset.
///
/// - empty dataset: `(default_start_year, 1)`, the configured epoch
/// - `Latest`: year/month of the newest known observation, so a run
///   re-requests the anchor year onward and picks up new months plus any
///   revisions published since
/// - `Earliest`: year/month of the oldest known observation, which amounts to
///   refetching the whole history
pub fn compute_start_window(
    existing: &Dataset,
    policy: StartPolicy,
    default_start_year: i32,
) -> StartWindow {
    let anchor = match policy {
        StartPolicy::Latest => existing.latest_date(),
        StartPolicy::Earliest => existing.earliest_date(),
    };

    match anchor {
        Some(date) => StartWindow {
            year: date.year(),
            month: date.month(),
        },
        None => StartWindow {
            year: default_start_year,
            month: 1,
        },
    }
}

/// Merge freshly fetched observations into the existing dataset.
///
/// Existing and incoming are concatenated in that order and deduplicated by
/// `(series_id, date)` with last-seen-wins, so an incoming observation
/// replaces a stale persisted value for the same key. The result is sorted
/// ascending by the key.
pub fn merge(existing: &Dataset, incoming: Vec<Observation>) -> Dataset {
    let mut by_key: BTreeMap<(String, NaiveDate), f64> = BTreeMap::new();

    for obs in existing.observations.iter().cloned().chain(incoming) {
        by_key.insert((obs.series_id, obs.date), obs.value);
    }

    let observations = by_key
        .into_iter()
        .map(|((series_id, date), value)| Observation {
            series_id,
            date,
            value,
        })
        .collect();

    Dataset { observations }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(series_id: &str, date: &str, value: f64) -> Observation {
        Observation {
            series_id: series_id.to_string(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            value,
        }
    }

    fn dataset(observations: Vec<Observation>) -> Dataset {
        Dataset { observations }
    }

    #[test]
    fn merge_incoming_overrides_existing() {
        let existing = dataset(vec![obs("LNS14000000", "2023-01-01", 3.4)]);
        let incoming = vec![
            obs("LNS14000000", "2023-01-01", 3.6),
            obs("LNS14000000", "2023-02-01", 3.5),
        ];

        let merged = merge(&existing, incoming);
        assert_eq!(
            merged.observations,
            vec![
                obs("LNS14000000", "2023-01-01", 3.6),
                obs("LNS14000000", "2023-02-01", 3.5),
            ]
        );
    }

    #[test]
    fn merge_with_subset_of_itself_is_identity() {
        let existing = dataset(vec![
            obs("CEU0000000001", "2022-01-01", 150_000.0),
            obs("LNS14000000", "2022-01-01", 4.0),
            obs("LNS14000000", "2022-02-01", 3.8),
        ]);

        let subset = vec![existing.observations[1].clone()];
        let merged = merge(&existing, subset);
        assert_eq!(merged, existing);
    }

    #[test]
    fn merge_sorts_by_series_then_date() {
        let existing = dataset(vec![obs("LNS14000000", "2023-03-01", 3.5)]);
        let incoming = vec![
            obs("LNS14000000", "2023-01-01", 3.4),
            obs("CEU0000000001", "2023-02-01", 155_000.0),
            obs("CEU0000000001", "2023-01-01", 154_000.0),
        ];

        let merged = merge(&existing, incoming);
        let keys: Vec<(&str, NaiveDate)> = merged
            .observations
            .iter()
            .map(|o| (o.series_id.as_str(), o.date))
            .collect();

        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        assert_eq!(merged.len(), 4);
    }

    #[test]
    fn merge_into_empty_dataset() {
        let incoming = vec![
            obs("LNS14000000", "2022-02-01", 3.8),
            obs("LNS14000000", "2022-01-01", 4.0),
        ];

        let merged = merge(&Dataset::default(), incoming);
        assert_eq!(merged.len(), 2);
        assert_eq!(
            merged.observations[0].date,
            NaiveDate::from_ymd_opt(2022, 1, 1).unwrap()
        );
    }

    #[test]
    fn merge_duplicate_keys_within_incoming_take_the_last() {
        let incoming = vec![
            obs("LNS14000000", "2023-01-01", 3.4),
            obs("LNS14000000", "2023-01-01", 3.6),
        ];

        let merged = merge(&Dataset::default(), incoming);
        assert_eq!(merged.observations, vec![obs("LNS14000000", "2023-01-01", 3.6)]);
    }

    #[test]
    fn start_window_empty_dataset_uses_default_epoch() {
        let window = compute_start_window(&Dataset::default(), StartPolicy::Latest, 2022);
        assert_eq!(window, StartWindow { year: 2022, month: 1 });
    }

    #[test]
    fn start_window_latest_anchors_at_newest_date() {
        let existing = dataset(vec![
            obs("LNS14000000", "2022-11-01", 3.6),
            obs("CEU0000000001", "2023-03-01", 155_000.0),
        ]);

        let window = compute_start_window(&existing, StartPolicy::Latest, 2022);
        assert_eq!(window, StartWindow { year: 2023, month: 3 });
    }

    #[test]
    fn start_window_earliest_anchors_at_oldest_date() {
        let existing = dataset(vec![
            obs("LNS14000000", "2019-06-01", 3.7),
            obs("CEU0000000001", "2023-03-01", 155_000.0),
        ]);

        let window = compute_start_window(&existing, StartPolicy::Earliest, 2022);
        assert_eq!(window, StartWindow { year: 2019, month: 6 });
    }
}
