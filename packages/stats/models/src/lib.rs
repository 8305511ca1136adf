#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Derived epidemic statistics types.
//!
//! These are the outputs of the aggregation steps: the all-region daily
//! series, the per-region totals, the headline summary, and the map
//! payload. They are rebuilt from the raw records on every query.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// All-region totals for a single report date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStatRow {
    /// Report date.
    pub report_date: NaiveDate,
    /// Sum of `new_confirmed` over the regions reporting that day.
    pub new_confirmed: u64,
    /// Sum of `cumulative_confirmed`.
    pub cumulative_confirmed: u64,
    /// Sum of `new_recovered`.
    pub new_recovered: u64,
    /// Sum of `cumulative_recovered`.
    pub cumulative_recovered: u64,
    /// Sum of `new_deaths`.
    pub new_deaths: u64,
    /// Sum of `cumulative_deaths`.
    pub cumulative_deaths: u64,
    /// `cumulative_confirmed - cumulative_recovered - cumulative_deaths`.
    pub active_confirmed: i64,
}

/// The daily series, ascending by date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySeries {
    /// One row per distinct report date.
    pub rows: Vec<DailyStatRow>,
    /// Dates on which fewer regions reported than appear in the dataset.
    /// Their rows sum only the regions present.
    pub partial_dates: Vec<NaiveDate>,
}

impl DailySeries {
    /// The most recent row, if any.
    #[must_use]
    pub fn latest(&self) -> Option<&DailyStatRow> {
        self.rows.last()
    }
}

/// Final totals for one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionStatRow {
    /// Region name as it appears in the dataset.
    pub region_name: String,
    /// Highest `cumulative_confirmed` seen for the region.
    pub cumulative_confirmed: u64,
    /// Highest `cumulative_recovered` seen for the region.
    pub cumulative_recovered: u64,
    /// Highest `cumulative_deaths` seen for the region.
    pub cumulative_deaths: u64,
    /// First population value recorded for the region.
    pub population: i64,
    /// `cumulative_confirmed - cumulative_recovered - cumulative_deaths`.
    pub active_confirmed: i64,
    /// Cumulative confirmed per 100,000 residents, two decimal places.
    pub incidence_rate: f64,
}

/// Headline figures derived from the daily series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Latest cumulative confirmed.
    pub total_cases: u64,
    /// Latest cumulative recovered.
    pub total_recovered: u64,
    /// Latest cumulative deaths.
    pub total_deaths: u64,
    /// Latest active cases.
    pub active_cases: i64,
    /// Recovered as a percentage of total cases, two decimal places.
    pub recovery_rate: f64,
    /// Deaths as a percentage of total cases, two decimal places.
    pub death_rate: f64,
    /// Highest single-day `new_confirmed`.
    pub max_daily_new: u64,
    /// Earliest date reaching `max_daily_new`.
    pub max_daily_date: NaiveDate,
}

/// Span and pace of the daily series, used by the text report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesOverview {
    /// First report date.
    pub first_date: NaiveDate,
    /// Last report date.
    pub last_date: NaiveDate,
    /// Number of distinct report dates.
    pub days: usize,
    /// Mean of daily `new_confirmed`, one decimal place.
    pub average_daily_new: f64,
}

/// One region positioned on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapEntry {
    /// External identifier matching the boundary file.
    #[serde(rename = "name")]
    pub external_id: String,
    /// Local display name.
    #[serde(rename = "chinese_name")]
    pub local_name: String,
    /// Cumulative confirmed cases.
    #[serde(rename = "value")]
    pub cumulative_confirmed: u64,
    /// Cases per 100,000 residents.
    pub incidence_rate: f64,
    /// Active cases.
    pub active_cases: i64,
    /// Resident population.
    pub population: i64,
}

/// Map-ready projection of the region statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapPayload {
    /// Regions that could be matched to the boundary file.
    pub map_data: Vec<MapEntry>,
    /// Largest cumulative confirmed among `map_data` (0 when empty).
    pub max_cases: u64,
    /// Smallest cumulative confirmed among `map_data` (0 when empty).
    pub min_cases: u64,
    /// Local names that had no translation and were left off the map.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dropped_regions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_entry_uses_dashboard_field_names() {
        let entry = MapEntry {
            external_id: "Wan Chai".to_string(),
            local_name: "湾仔区".to_string(),
            cumulative_confirmed: 12,
            incidence_rate: 7.2,
            active_cases: 10,
            population: 166_695,
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["name"], "Wan Chai");
        assert_eq!(value["chinese_name"], "湾仔区");
        assert_eq!(value["value"], 12);
        assert_eq!(value["active_cases"], 10);
    }

    #[test]
    fn empty_dropped_regions_are_omitted() {
        let value = serde_json::to_value(MapPayload::default()).unwrap();
        assert!(value.get("dropped_regions").is_none());
        assert_eq!(value["max_cases"], 0);
    }

    #[test]
    fn latest_is_last_row() {
        let row = |day| DailyStatRow {
            report_date: NaiveDate::from_ymd_opt(2022, 3, day).unwrap(),
            new_confirmed: 0,
            cumulative_confirmed: u64::from(day),
            new_recovered: 0,
            cumulative_recovered: 0,
            new_deaths: 0,
            cumulative_deaths: 0,
            active_confirmed: i64::from(day),
        };
        let series = DailySeries {
            rows: vec![row(1), row(2)],
            partial_dates: Vec::new(),
        };
        assert_eq!(series.latest().map(|r| r.cumulative_confirmed), Some(2));
        assert!(DailySeries::default().latest().is_none());
    }
}
