//! Remote data sources.
//!
//! - BLS public API v2 client + record normalization (`bls`)

pub mod bls;

pub use bls::*;
