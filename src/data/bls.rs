//! BLS public API (v2) integration.
//!
//! One POST per series, strictly sequential. A request only counts as
//! successful when the HTTP status is success *and* the application-level
//! `status` field says so; a 200 with a failure payload is still a failure.
//! Per-series failures never abort the run; they are folded into the
//! returned `SeriesFetch` and reported at the end.

use std::time::Duration;

use chrono::NaiveDate;
use log::warn;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::domain::{FetchOutcome, FetchWindow, Observation, SeriesFetch};
use crate::error::AppError;

const BASE_URL: &str = "https://api.bls.gov/publicAPI/v2/timeseries/data/";
const STATUS_OK: &str = "REQUEST_SUCCEEDED";

/// Default series set, with the labels used in reports.
pub const DEFAULT_SERIES: &[(&str, &str)] = &[
    ("CEU0000000001", "Total Non-Farm Workers"),
    ("LNS14000000", "Unemployment Rate"),
    ("LNS11300000", "Labor Force Participation Rate"),
    ("CES0500000003", "Average Hourly Earnings"),
    ("CES9091000001", "Construction Employment"),
    ("LNS12000000", "Employment-Population Ratio"),
];

/// Human-readable label for a known series id.
pub fn series_label(series_id: &str) -> Option<&'static str> {
    DEFAULT_SERIES
        .iter()
        .find(|(id, _)| *id == series_id)
        .map(|(_, label)| *label)
}

pub struct BlsClient {
    client: Client,
    api_key: String,
}

impl BlsClient {
    pub fn from_env(timeout: Duration) -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let api_key = std::env::var("BLS_API_KEY")
            .map_err(|_| AppError::new(2, "Missing BLS_API_KEY in environment (.env)."))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::new(2, format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, api_key })
    }

    /// Fetch one series for the given window.
    ///
    /// Infallible by design: transport and remote errors become
    /// `FetchOutcome::Failed` so the caller can continue with the remaining
    /// series.
    pub fn fetch_series(&self, series_id: &str, window: &FetchWindow) -> SeriesFetch {
        match self.request_series(series_id, window) {
            Ok(body) => classify_response(series_id, body),
            Err(reason) => SeriesFetch {
                series_id: series_id.to_string(),
                records_read: 0,
                dropped: 0,
                outcome: FetchOutcome::Failed(reason),
            },
        }
    }

    fn request_series(&self, series_id: &str, window: &FetchWindow) -> Result<SeriesResponse, String> {
        let payload = SeriesRequest {
            seriesid: vec![series_id.to_string()],
            startyear: window.start_year.to_string(),
            endyear: window.end_year.to_string(),
            registrationkey: self.api_key.clone(),
        };

        let resp = self
            .client
            .post(BASE_URL)
            .json(&payload)
            .send()
            .map_err(|e| format!("request failed: {e}"))?;

        if !resp.status().is_success() {
            return Err(format!("request failed with status {}", resp.status()));
        }

        resp.json()
            .map_err(|e| format!("invalid response body: {e}"))
    }
}

/// Turn a decoded response into a per-series outcome, normalizing records and
/// dropping (with a log line) the ones that fail.
pub fn classify_response(series_id: &str, body: SeriesResponse) -> SeriesFetch {
    if body.status != STATUS_OK {
        let reason = if body.message.is_empty() {
            format!("remote status {}", body.status)
        } else {
            body.message.join("; ")
        };
        return SeriesFetch {
            series_id: series_id.to_string(),
            records_read: 0,
            dropped: 0,
            outcome: FetchOutcome::Failed(reason),
        };
    }

    let records: Vec<RawRecord> = body
        .results
        .map(|r| r.series)
        .unwrap_or_default()
        .into_iter()
        .flat_map(|s| s.data)
        .collect();

    let records_read = records.len();
    if records_read == 0 {
        return SeriesFetch {
            series_id: series_id.to_string(),
            records_read: 0,
            dropped: 0,
            outcome: FetchOutcome::Empty,
        };
    }

    let mut observations = Vec::with_capacity(records_read);
    let mut dropped = 0usize;
    for record in &records {
        match normalize_point(series_id, &record.year, &record.period, &record.value) {
            Ok(obs) => observations.push(obs),
            Err(err) => {
                dropped += 1;
                warn!("{series_id}: dropped record ({err})");
            }
        }
    }

    SeriesFetch {
        series_id: series_id.to_string(),
        records_read,
        dropped,
        outcome: FetchOutcome::Success(observations),
    }
}

#[derive(Debug, Serialize)]
struct SeriesRequest {
    seriesid: Vec<String>,
    startyear: String,
    endyear: String,
    registrationkey: String,
}

#[derive(Debug, Deserialize)]
pub struct SeriesResponse {
    status: String,
    #[serde(default)]
    message: Vec<String>,
    #[serde(rename = "Results", default)]
    results: Option<ResultsBody>,
}

#[derive(Debug, Deserialize, Default)]
struct ResultsBody {
    #[serde(default)]
    series: Vec<SeriesBody>,
}

#[derive(Debug, Deserialize)]
struct SeriesBody {
    #[serde(default)]
    data: Vec<RawRecord>,
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    year: String,
    period: String,
    value: String,
}

/// A record-level normalization failure. The offending record is dropped;
/// the run continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    MalformedPeriod(String),
    MalformedYear(String),
    MalformedValue(String),
}

impl std::fmt::Display for RecordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordError::MalformedPeriod(raw) => write!(f, "malformed period '{raw}'"),
            RecordError::MalformedYear(raw) => write!(f, "malformed year '{raw}'"),
            RecordError::MalformedValue(raw) => write!(f, "malformed value '{raw}'"),
        }
    }
}

impl std::error::Error for RecordError {}

/// Convert one raw record into a normalized monthly observation.
///
/// The date is pinned to the first day of the month. Values may carry `,`
/// thousands separators (`"1,234.5"` → `1234.5`).
pub fn normalize_point(
    series_id: &str,
    raw_year: &str,
    raw_period: &str,
    raw_value: &str,
) -> Result<Observation, RecordError> {
    let year: i32 = raw_year
        .trim()
        .parse()
        .map_err(|_| RecordError::MalformedYear(raw_year.to_string()))?;
    let month = parse_period_month(raw_period)?;
    let value = parse_value(raw_value)?;

    let date = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| RecordError::MalformedYear(raw_year.to_string()))?;

    Ok(Observation {
        series_id: series_id.to_string(),
        date,
        value,
    })
}

/// Monthly period labels look like `"M01".."M12"`: a leading encoding tag
/// followed by a two-digit month. `"M13"` (annual average) and non-monthly
/// periods are rejected.
fn parse_period_month(raw: &str) -> Result<u32, RecordError> {
    let mut chars = raw.trim().chars();
    chars.next();
    let digits = chars.as_str();

    if digits.len() != 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RecordError::MalformedPeriod(raw.to_string()));
    }

    let month: u32 = digits
        .parse()
        .map_err(|_| RecordError::MalformedPeriod(raw.to_string()))?;
    if !(1..=12).contains(&month) {
        return Err(RecordError::MalformedPeriod(raw.to_string()));
    }
    Ok(month)
}

fn parse_value(raw: &str) -> Result<f64, RecordError> {
    let cleaned = raw.trim().replace(',', "");
    let v: f64 = cleaned
        .parse()
        .map_err(|_| RecordError::MalformedValue(raw.to_string()))?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(RecordError::MalformedValue(raw.to_string()))
    }
}
