#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API response types for the epidemic dashboard server.
//!
//! These types are serialized to JSON for the dashboard frontend, which
//! expects column-oriented arrays for the charts. They are separate from
//! the statistics types so the API contract can evolve independently.

use chrono::NaiveDate;
use epi_dash_stats_models::{DailySeries, MapEntry, MapPayload, RegionStatRow, SummaryStats};
use serde::{Deserialize, Serialize};

/// `GET /api/daily_data` response: one array per metric, aligned by index
/// with `dates`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyDataResponse {
    /// Report dates, ascending (`YYYY-MM-DD`).
    pub dates: Vec<NaiveDate>,
    /// New confirmed cases per day.
    pub new_cases: Vec<u64>,
    /// Cumulative confirmed cases.
    pub cumulative_cases: Vec<u64>,
    /// New recoveries per day.
    pub new_recovered: Vec<u64>,
    /// Cumulative recoveries.
    pub cumulative_recovered: Vec<u64>,
    /// New deaths per day.
    pub new_deaths: Vec<u64>,
    /// Cumulative deaths.
    pub cumulative_deaths: Vec<u64>,
    /// Active cases.
    pub active_cases: Vec<i64>,
}

impl From<&DailySeries> for DailyDataResponse {
    fn from(series: &DailySeries) -> Self {
        let rows = &series.rows;
        Self {
            dates: rows.iter().map(|r| r.report_date).collect(),
            new_cases: rows.iter().map(|r| r.new_confirmed).collect(),
            cumulative_cases: rows.iter().map(|r| r.cumulative_confirmed).collect(),
            new_recovered: rows.iter().map(|r| r.new_recovered).collect(),
            cumulative_recovered: rows.iter().map(|r| r.cumulative_recovered).collect(),
            new_deaths: rows.iter().map(|r| r.new_deaths).collect(),
            cumulative_deaths: rows.iter().map(|r| r.cumulative_deaths).collect(),
            active_cases: rows.iter().map(|r| r.active_confirmed).collect(),
        }
    }
}

/// `GET /api/region_data` response, ordered by cumulative cases
/// descending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionDataResponse {
    /// Region names.
    pub regions: Vec<String>,
    /// Cumulative confirmed cases.
    pub cumulative_cases: Vec<u64>,
    /// Active cases.
    pub active_cases: Vec<i64>,
    /// Cases per 100,000 residents.
    pub incidence_rates: Vec<f64>,
}

impl From<&[RegionStatRow]> for RegionDataResponse {
    fn from(rows: &[RegionStatRow]) -> Self {
        Self {
            regions: rows.iter().map(|r| r.region_name.clone()).collect(),
            cumulative_cases: rows.iter().map(|r| r.cumulative_confirmed).collect(),
            active_cases: rows.iter().map(|r| r.active_confirmed).collect(),
            incidence_rates: rows.iter().map(|r| r.incidence_rate).collect(),
        }
    }
}

/// `GET /api/summary_data` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryDataResponse {
    /// Latest cumulative confirmed.
    pub total_cases: u64,
    /// Latest cumulative recovered.
    pub total_recovered: u64,
    /// Latest cumulative deaths.
    pub total_deaths: u64,
    /// Latest active cases.
    pub active_cases: i64,
    /// Percentage recovered.
    pub recovery_rate: f64,
    /// Percentage died.
    pub death_rate: f64,
    /// Highest single-day new confirmed.
    pub max_daily_new: u64,
    /// Date of `max_daily_new`.
    pub max_daily_date: NaiveDate,
}

impl From<SummaryStats> for SummaryDataResponse {
    fn from(s: SummaryStats) -> Self {
        Self {
            total_cases: s.total_cases,
            total_recovered: s.total_recovered,
            total_deaths: s.total_deaths,
            active_cases: s.active_cases,
            recovery_rate: s.recovery_rate,
            death_rate: s.death_rate,
            max_daily_new: s.max_daily_new,
            max_daily_date: s.max_daily_date,
        }
    }
}

/// `GET /api/map_data` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapDataResponse {
    /// Regions matched to boundary features.
    pub map_data: Vec<MapEntry>,
    /// Largest cumulative confirmed among `map_data`.
    pub max_cases: u64,
    /// Smallest cumulative confirmed among `map_data`.
    pub min_cases: u64,
}

impl From<MapPayload> for MapDataResponse {
    fn from(payload: MapPayload) -> Self {
        Self {
            map_data: payload.map_data,
            max_cases: payload.max_cases,
            min_cases: payload.min_cases,
        }
    }
}

/// Body returned for any failed query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable message.
    pub error: String,
}

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}
