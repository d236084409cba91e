//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the dataset model (`Observation`, `Dataset`)
//! - fetch-window types and the start-anchor policy (`StartPolicy`)
//! - per-series fetch results (`FetchOutcome`, `SeriesFetch`)
//! - run configuration (`FetchConfig`)

pub mod types;

pub use types::*;
