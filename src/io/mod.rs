//! Input/output helpers.
//!
//! - dataset CSV load/save (`dataset`)

pub mod dataset;

pub use dataset::*;
