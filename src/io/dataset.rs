//! Dataset CSV persistence.
//!
//! The on-disk shape is the pipeline's exchange format: a
//! `seriesID,date,value` header with ISO (`YYYY-MM-DD`) dates. Writing then
//! reading back reproduces the same `(series_id, date, value)` set.
//!
//! Reading is tolerant of row order (the dataset is re-sorted on load) but
//! strict about content: a file we cannot fully parse is a fatal error, since
//! there is no safe merge target to fall back to.

use std::fs::{File, create_dir_all};
use std::io::{Read, Write};
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::{Dataset, Observation};
use crate::error::AppError;

const HEADER: &str = "seriesID,date,value";

/// Load the persisted dataset, or an empty one if the file does not exist yet.
pub fn load_dataset(path: &Path) -> Result<Dataset, AppError> {
    if !path.exists() {
        return Ok(Dataset::default());
    }

    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open dataset '{}': {e}", path.display())))?;

    read_dataset(file)
        .map_err(|e| AppError::new(2, format!("Invalid dataset '{}': {e}", path.display())))
}

/// Read a dataset from any reader. Rows may be in any order; the result is
/// sorted by `(series_id, date)`.
pub fn read_dataset<R: Read>(reader: R) -> Result<Dataset, String> {
    #[derive(Debug, Deserialize)]
    struct Row {
        #[serde(rename = "seriesID")]
        series_id: String,
        date: String,
        value: f64,
    }

    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut observations = Vec::new();
    for (idx, result) in csv_reader.deserialize::<Row>().enumerate() {
        // +2: one for the header line, one for 1-based numbering.
        let line = idx + 2;
        let row = result.map_err(|e| format!("line {line}: {e}"))?;
        let date = NaiveDate::parse_from_str(&row.date, "%Y-%m-%d")
            .map_err(|e| format!("line {line}: invalid date '{}': {e}", row.date))?;
        observations.push(Observation {
            series_id: row.series_id,
            date,
            value: row.value,
        });
    }

    let mut dataset = Dataset { observations };
    dataset.sort();
    Ok(dataset)
}

/// Write the dataset to its CSV file, creating parent directories as needed.
pub fn write_dataset(path: &Path, dataset: &Dataset) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent).map_err(|e| {
                AppError::new(2, format!("Failed to create '{}': {e}", parent.display()))
            })?;
        }
    }

    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create dataset '{}': {e}", path.display())))?;

    write_to(file, dataset)
        .map_err(|e| AppError::new(2, format!("Failed to write dataset '{}': {e}", path.display())))
}

/// Write the dataset to any writer.
pub fn write_to<W: Write>(mut writer: W, dataset: &Dataset) -> std::io::Result<()> {
    writeln!(writer, "{HEADER}")?;
    for obs in &dataset.observations {
        // `{}` on f64 is the shortest representation that round-trips, so
        // read(write(D)) preserves values exactly.
        writeln!(writer, "{},{},{}", obs.series_id, obs.date.format("%Y-%m-%d"), obs.value)?;
    }
    Ok(())
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

    #[test]
    fn round_trip_preserves_the_dataset() {
        let dataset = Dataset {
            observations: vec![
                obs("CEU0000000001", "2022-01-01", 157_413.0),
                obs("LNS14000000", "2022-01-01", 4.0),
                obs("LNS14000000", "2022-02-01", 3.8),
                obs("LNS14000000", "2023-01-01", 3.467_123),
            ],
        };

        let mut buf = Vec::new();
        write_to(&mut buf, &dataset).unwrap();
        let reloaded = read_dataset(buf.as_slice()).unwrap();

        assert_eq!(reloaded, dataset);
    }

    #[test]
    fn written_file_has_the_expected_header_and_dates() {
        let dataset = Dataset {
            observations: vec![obs("LNS14000000", "2023-02-01", 3.6)],
        };

        let mut buf = Vec::new();
        write_to(&mut buf, &dataset).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert_eq!(text, "seriesID,date,value\nLNS14000000,2023-02-01,3.6\n");
    }

    #[test]
    fn read_sorts_rows_from_disk() {
        let text = "seriesID,date,value\n\
                    LNS14000000,2023-02-01,3.6\n\
                    CEU0000000001,2023-01-01,155000\n\
                    LNS14000000,2023-01-01,3.4\n";

        let dataset = read_dataset(text.as_bytes()).unwrap();
        assert_eq!(
            dataset.observations,
            vec![
                obs("CEU0000000001", "2023-01-01", 155_000.0),
                obs("LNS14000000", "2023-01-01", 3.4),
                obs("LNS14000000", "2023-02-01", 3.6),
            ]
        );
    }

    #[test]
    fn read_rejects_malformed_rows() {
        let text = "seriesID,date,value\nLNS14000000,2023-13-01,3.6\n";
        let err = read_dataset(text.as_bytes()).unwrap_err();
        assert!(err.contains("line 2"), "unexpected error: {err}");

        let text = "seriesID,date,value\nLNS14000000,2023-01-01,not-a-number\n";
        assert!(read_dataset(text.as_bytes()).is_err());
    }

    #[test]
    fn load_missing_file_is_an_empty_dataset() {
        let path = std::env::temp_dir().join("bls-pipeline-no-such-dataset.csv");
        let dataset = load_dataset(&path).unwrap();
        assert!(dataset.is_empty());
    }
}
