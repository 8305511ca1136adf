//! Plain-text statistics report.
//!
//! Renders the daily series, the overall figures, and the region table the
//! same way the dashboard computes them, for a quick look at a dataset
//! without starting the server.

use std::fmt::{self, Write};

use epi_dash_record::RecordStore;
use epi_dash_stats::StatsError;
use epi_dash_stats::daily::daily_series;
use epi_dash_stats::region::{region_stats, top_regions};
use epi_dash_stats::summary::{overview, summarize};
use epi_dash_stats_models::{DailyStatRow, RegionStatRow};
use thiserror::Error;
use unicode_width::UnicodeWidthStr;

const RULE_WIDTH: usize = 100;
const REGION_COLUMN_WIDTH: usize = 20;

/// Errors raised while rendering a report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Stats(#[from] StatsError),

    #[error("Failed to write report: {0}")]
    Format(#[from] fmt::Error),
}

/// Report layout options.
#[derive(Debug, Clone, Copy)]
pub struct ReportOptions {
    /// Number of leading daily rows to print.
    pub head_days: usize,
    /// Number of regions in the "hardest hit" list.
    pub top_regions: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            head_days: 20,
            top_regions: 5,
        }
    }
}

/// Renders the full report for `store` into `out`.
///
/// Nothing is written if the statistics cannot be computed.
///
/// # Errors
///
/// Returns [`ReportError::Stats`] if the store is empty or a region's
/// population is unusable, or [`ReportError::Format`] if `out` rejects a
/// write.
pub fn render(
    store: &RecordStore,
    options: ReportOptions,
    out: &mut impl Write,
) -> Result<(), ReportError> {
    let series = daily_series(store);
    let summary = summarize(&series)?;
    let span = overview(&series)?;
    let regions = region_stats(store)?;
    let head = &series.rows[..options.head_days.min(series.rows.len())];

    heading(out, "Daily statistics (all regions)")?;
    writeln!(out, "First {} days:", head.len())?;
    rule(out, '-')?;
    daily_table(out, head)?;

    heading(out, "Overall")?;
    writeln!(out, "Date range: {} to {}", span.first_date, span.last_date)?;
    writeln!(out, "Days: {}", span.days)?;
    writeln!(
        out,
        "Peak daily new confirmed: {} ({})",
        thousands(summary.max_daily_new),
        summary.max_daily_date
    )?;
    writeln!(
        out,
        "Final cumulative confirmed: {}",
        thousands(summary.total_cases)
    )?;
    writeln!(
        out,
        "Final cumulative recovered: {}",
        thousands(summary.total_recovered)
    )?;
    writeln!(
        out,
        "Final cumulative deaths: {}",
        thousands(summary.total_deaths)
    )?;
    writeln!(out, "Final active cases: {}", summary.active_cases)?;
    writeln!(
        out,
        "Recovery rate: {:.2}%  Death rate: {:.2}%",
        summary.recovery_rate, summary.death_rate
    )?;
    writeln!(
        out,
        "Average daily new confirmed: {:.1}",
        span.average_daily_new
    )?;
    if !series.partial_dates.is_empty() {
        writeln!(
            out,
            "Note: {} date(s) are missing one or more regions and sum only those present",
            series.partial_dates.len()
        )?;
    }

    heading(out, "Regional statistics (by cumulative confirmed)")?;
    region_table(out, &regions)?;

    let top = top_regions(&regions, options.top_regions);
    writeln!(out)?;
    writeln!(out, "Top {} regions:", top.len())?;
    rule(out, '-')?;
    for row in top {
        writeln!(
            out,
            "{}: cumulative confirmed {}, incidence {:.2}/100k",
            row.region_name,
            thousands(row.cumulative_confirmed),
            row.incidence_rate
        )?;
    }

    Ok(())
}

fn heading(out: &mut impl Write, title: &str) -> fmt::Result {
    writeln!(out)?;
    rule(out, '=')?;
    writeln!(out, "{title}")?;
    rule(out, '=')
}

fn rule(out: &mut impl Write, ch: char) -> fmt::Result {
    for _ in 0..RULE_WIDTH {
        out.write_char(ch)?;
    }
    writeln!(out)
}

fn daily_table(out: &mut impl Write, rows: &[DailyStatRow]) -> fmt::Result {
    writeln!(
        out,
        "{:<12}{:>10}{:>12}{:>10}{:>12}{:>10}{:>12}{:>10}",
        "date", "new", "cumulative", "new_rec", "cum_rec", "new_dth", "cum_dth", "active"
    )?;
    for r in rows {
        writeln!(
            out,
            "{:<12}{:>10}{:>12}{:>10}{:>12}{:>10}{:>12}{:>10}",
            r.report_date.to_string(),
            r.new_confirmed,
            r.cumulative_confirmed,
            r.new_recovered,
            r.cumulative_recovered,
            r.new_deaths,
            r.cumulative_deaths,
            r.active_confirmed
        )?;
    }
    Ok(())
}

fn region_table(out: &mut impl Write, rows: &[RegionStatRow]) -> fmt::Result {
    pad_to_width(out, "region", REGION_COLUMN_WIDTH)?;
    writeln!(
        out,
        "{:>12}{:>12}{:>10}{:>12}{:>10}{:>12}",
        "cumulative", "recovered", "deaths", "population", "active", "per_100k"
    )?;
    for r in rows {
        pad_to_width(out, &r.region_name, REGION_COLUMN_WIDTH)?;
        writeln!(
            out,
            "{:>12}{:>12}{:>10}{:>12}{:>10}{:>12.2}",
            r.cumulative_confirmed,
            r.cumulative_recovered,
            r.cumulative_deaths,
            r.population,
            r.active_confirmed,
            r.incidence_rate
        )?;
    }
    Ok(())
}

/// Writes `text` left-aligned in `width` terminal columns. Wide (CJK)
/// characters count as two columns.
fn pad_to_width(out: &mut impl Write, text: &str, width: usize) -> fmt::Result {
    out.write_str(text)?;
    for _ in text.width()..width {
        out.write_char(' ')?;
    }
    Ok(())
}

/// Formats `n` with comma thousands separators.
fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use epi_dash_record_models::CaseRecord;

    fn record(region: &str, day: u32, new: u64, cumulative: u64, population: i64) -> CaseRecord {
        CaseRecord {
            region_name: region.to_string(),
            report_date: NaiveDate::from_ymd_opt(2022, 3, day).unwrap(),
            new_confirmed: new,
            cumulative_confirmed: cumulative,
            new_recovered: 0,
            cumulative_recovered: 0,
            new_deaths: 0,
            cumulative_deaths: 0,
            population: Some(population),
        }
    }

    fn store() -> RecordStore {
        RecordStore::from_records(vec![
            record("A", 1, 10, 10, 100_000),
            record("B", 1, 5, 5, 50_000),
            record("A", 2, 1200, 1210, 100_000),
        ])
    }

    fn rendered(store: &RecordStore, options: ReportOptions) -> String {
        let mut text = String::new();
        render(store, options, &mut text).unwrap();
        text
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1000), "1,000");
        assert_eq!(thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn report_includes_overall_figures() {
        let text = rendered(&store(), ReportOptions::default());
        assert!(text.contains("Date range: 2022-03-01 to 2022-03-02"));
        assert!(text.contains("Days: 2"));
        assert!(text.contains("Peak daily new confirmed: 1,200 (2022-03-02)"));
        assert!(text.contains("Final cumulative confirmed: 1,210"));
        assert!(text.contains("Average daily new confirmed: 607.5"));
        assert!(text.contains("1 date(s) are missing one or more regions"));
    }

    #[test]
    fn report_lists_top_regions_in_order() {
        let options = ReportOptions {
            head_days: 1,
            top_regions: 1,
        };
        let text = rendered(&store(), options);
        assert!(text.contains("First 1 days:"));
        assert!(text.contains("Top 1 regions:"));
        assert!(text.contains("A: cumulative confirmed 1,210, incidence 1210.00/100k"));
        assert!(!text.contains("B: cumulative confirmed"));
    }

    #[test]
    fn empty_store_is_unavailable_and_writes_nothing() {
        let mut text = String::new();
        assert!(matches!(
            render(&RecordStore::default(), ReportOptions::default(), &mut text),
            Err(ReportError::Stats(StatsError::DataUnavailable))
        ));
        assert!(text.is_empty());
    }

    #[test]
    fn region_columns_align_for_wide_names() {
        let store = RecordStore::from_records(vec![
            record("湾仔区", 1, 12, 12, 100_000),
            record("Abc", 1, 34, 34, 100_000),
        ]);
        let text = rendered(&store, ReportOptions::default());
        let wide = text.lines().find(|l| l.starts_with("湾仔区 ")).unwrap();
        let narrow = text.lines().find(|l| l.starts_with("Abc ")).unwrap();
        assert_eq!(wide.width(), narrow.width());
        assert_eq!(wide.width(), 88);
    }
}
