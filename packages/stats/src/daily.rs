//! All-region daily series.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use epi_dash_record::RecordStore;
use epi_dash_record_models::active_cases;
use epi_dash_stats_models::{DailySeries, DailyStatRow};

#[derive(Default)]
struct DayTotals<'a> {
    new_confirmed: u64,
    cumulative_confirmed: u64,
    new_recovered: u64,
    cumulative_recovered: u64,
    new_deaths: u64,
    cumulative_deaths: u64,
    regions: BTreeSet<&'a str>,
}

/// Groups records by report date and sums each metric across regions.
///
/// Rows come back ascending by date. A date on which some regions did not
/// report still gets a row, summing only the regions that did; such dates
/// are listed in [`DailySeries::partial_dates`]. An empty store yields an
/// empty series.
#[must_use]
pub fn daily_series(store: &RecordStore) -> DailySeries {
    let mut by_date: BTreeMap<NaiveDate, DayTotals<'_>> = BTreeMap::new();
    let mut all_regions: BTreeSet<&str> = BTreeSet::new();

    for record in store.records() {
        let day = by_date.entry(record.report_date).or_default();
        day.new_confirmed += record.new_confirmed;
        day.cumulative_confirmed += record.cumulative_confirmed;
        day.new_recovered += record.new_recovered;
        day.cumulative_recovered += record.cumulative_recovered;
        day.new_deaths += record.new_deaths;
        day.cumulative_deaths += record.cumulative_deaths;
        day.regions.insert(record.region_name.as_str());
        all_regions.insert(record.region_name.as_str());
    }

    let mut partial_dates = Vec::new();
    let rows = by_date
        .into_iter()
        .map(|(report_date, day)| {
            if day.regions.len() < all_regions.len() {
                partial_dates.push(report_date);
            }
            DailyStatRow {
                report_date,
                new_confirmed: day.new_confirmed,
                cumulative_confirmed: day.cumulative_confirmed,
                new_recovered: day.new_recovered,
                cumulative_recovered: day.cumulative_recovered,
                new_deaths: day.new_deaths,
                cumulative_deaths: day.cumulative_deaths,
                active_confirmed: active_cases(
                    day.cumulative_confirmed,
                    day.cumulative_recovered,
                    day.cumulative_deaths,
                ),
            }
        })
        .collect();

    if !partial_dates.is_empty() {
        log::debug!(
            "{} of the report dates are missing one or more regions",
            partial_dates.len()
        );
    }

    DailySeries {
        rows,
        partial_dates,
    }
}
