//! Reporting utilities: per-series dataset stats and formatted terminal output.

use crate::domain::{Dataset, SeriesStats};

pub mod format;

pub use format::*;

/// Summarize the dataset per series: observation count, date range, and the
/// most recent value.
///
/// Relies on the dataset's `(series_id, date)` sort order, so each series is
/// one contiguous run and its last row is the newest observation.
pub fn series_stats(dataset: &Dataset) -> Vec<SeriesStats> {
    let mut out: Vec<SeriesStats> = Vec::new();

    for obs in &dataset.observations {
        match out.last_mut() {
            Some(stats) if stats.series_id == obs.series_id => {
                stats.n_obs += 1;
                stats.last = obs.date;
                stats.latest_value = obs.value;
            }
            _ => out.push(SeriesStats {
                series_id: obs.series_id.clone(),
                n_obs: 1,
                first: obs.date,
                last: obs.date,
                latest_value: obs.value,
            }),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Observation;
    use chrono::NaiveDate;

    fn obs(series_id: &str, date: &str, value: f64) -> Observation {
        Observation {
            series_id: series_id.to_string(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            value,
        }
    }

    #[test]
    fn series_stats_groups_sorted_runs() {
        let dataset = Dataset {
            observations: vec![
                obs("CEU0000000001", "2022-01-01", 150_000.0),
                obs("CEU0000000001", "2022-02-01", 151_000.0),
                obs("LNS14000000", "2022-01-01", 4.0),
            ],
        };

        let stats = series_stats(&dataset);
        assert_eq!(stats.len(), 2);

        assert_eq!(stats[0].series_id, "CEU0000000001");
        assert_eq!(stats[0].n_obs, 2);
        assert_eq!(stats[0].first, NaiveDate::from_ymd_opt(2022, 1, 1).unwrap());
        assert_eq!(stats[0].last, NaiveDate::from_ymd_opt(2022, 2, 1).unwrap());
        assert!((stats[0].latest_value - 151_000.0).abs() < 1e-12);

        assert_eq!(stats[1].series_id, "LNS14000000");
        assert_eq!(stats[1].n_obs, 1);
    }

    #[test]
    fn series_stats_empty_dataset() {
        assert!(series_stats(&Dataset::default()).is_empty());
    }
}
