//! Headline figures derived from the daily series.

use epi_dash_stats_models::{DailySeries, SeriesOverview, SummaryStats};

use crate::{StatsError, percentage, round_to};

/// Reduces the daily series to the dashboard's headline figures.
///
/// Rows must be ascending by date (as returned by
/// [`crate::daily::daily_series`]): totals are read from the latest row. The
/// peak day is the earliest date with the highest `new_confirmed`.
///
/// # Errors
///
/// Returns [`StatsError::DataUnavailable`] if the series is empty.
pub fn summarize(series: &DailySeries) -> Result<SummaryStats, StatsError> {
    let latest = series.latest().ok_or(StatsError::DataUnavailable)?;

    let mut peak = latest;
    for row in series.rows.iter().rev() {
        if row.new_confirmed >= peak.new_confirmed {
            peak = row;
        }
    }

    Ok(SummaryStats {
        total_cases: latest.cumulative_confirmed,
        total_recovered: latest.cumulative_recovered,
        total_deaths: latest.cumulative_deaths,
        active_cases: latest.active_confirmed,
        recovery_rate: percentage(latest.cumulative_recovered, latest.cumulative_confirmed),
        death_rate: percentage(latest.cumulative_deaths, latest.cumulative_confirmed),
        max_daily_new: peak.new_confirmed,
        max_daily_date: peak.report_date,
    })
}

/// Date span, day count and average daily new cases of the series.
///
/// # Errors
///
/// Returns [`StatsError::DataUnavailable`] if the series is empty.
#[allow(clippy::cast_precision_loss)]
pub fn overview(series: &DailySeries) -> Result<SeriesOverview, StatsError> {
    let rows = &series.rows;
    let (Some(first), Some(last)) = (rows.first(), series.latest()) else {
        return Err(StatsError::DataUnavailable);
    };

    let total_new: u64 = rows.iter().map(|r| r.new_confirmed).sum();

    Ok(SeriesOverview {
        first_date: first.report_date,
        last_date: last.report_date,
        days: rows.len(),
        average_daily_new: round_to(total_new as f64 / rows.len() as f64, 1),
    })
}
