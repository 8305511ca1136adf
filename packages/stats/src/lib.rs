#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Statistics derivation over case records.
//!
//! Each module implements one step of the pipeline:
//!
//! * [`daily`] groups records by date into the all-region daily series.
//! * [`region`] groups records by region into final per-region totals.
//! * [`summary`] reduces the daily series to headline figures.
//! * [`map`] projects region totals onto map identifiers.
//!
//! Everything here is pure, synchronous computation over an in-memory
//! [`epi_dash_record::RecordStore`]. Nothing is cached between calls.
//!
//! Rounding is half away from zero ([`f64::round`]) everywhere.

pub mod daily;
pub mod map;
pub mod region;
pub mod summary;

use epi_dash_record::RecordStoreError;
use thiserror::Error;

/// Errors that can occur while deriving statistics.
#[derive(Debug, Error)]
pub enum StatsError {
    /// The record source was missing, unreadable, or had the wrong shape.
    #[error("Data load error: {0}")]
    DataLoad(#[from] RecordStoreError),

    /// The record source loaded but contained no records.
    #[error("No case data available")]
    DataUnavailable,

    /// A region's population cannot be used as an incidence denominator.
    #[error(
        "Data integrity error: region '{region}' has invalid population {}",
        describe_population(.population.as_ref())
    )]
    DataIntegrity {
        /// Region whose population is bad.
        region: String,
        /// The offending value (`None` when missing).
        population: Option<i64>,
    },
}

fn describe_population(population: Option<&i64>) -> String {
    population.map_or_else(|| "(missing)".to_string(), ToString::to_string)
}

/// Rounds `value` to `places` decimal places, half away from zero.
#[must_use]
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10_f64.powi(places);
    (value * factor).round() / factor
}

/// `part / whole * 100`, rounded to two places. Zero when `whole` is zero.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round_to(part as f64 / whole as f64 * 100.0, 2)
}
