//! Per-region totals and incidence rates.

use std::collections::BTreeMap;

use epi_dash_record::RecordStore;
use epi_dash_record_models::active_cases;
use epi_dash_stats_models::RegionStatRow;

use crate::{StatsError, round_to};

/// Incidence rates are expressed per this many residents.
pub const INCIDENCE_PER: f64 = 100_000.0;

struct RegionTotals<'a> {
    region_name: &'a str,
    cumulative_confirmed: u64,
    cumulative_recovered: u64,
    cumulative_deaths: u64,
    population: Option<i64>,
}

/// Groups records by region and derives final totals for each.
///
/// Cumulative counts take the maximum seen for the region, which equals
/// the final value for well-formed data and tolerates out-of-order rows.
/// Population is the first non-missing value seen. Rows are sorted
/// descending by cumulative confirmed; regions with equal counts keep the
/// order in which they first appear in the store.
///
/// # Errors
///
/// Returns [`StatsError::DataIntegrity`] if any region's population is
/// missing, zero, or negative.
pub fn region_stats(store: &RecordStore) -> Result<Vec<RegionStatRow>, StatsError> {
    let mut index: BTreeMap<&str, usize> = BTreeMap::new();
    let mut totals: Vec<RegionTotals<'_>> = Vec::new();

    for record in store.records() {
        let idx = *index
            .entry(record.region_name.as_str())
            .or_insert_with(|| {
                totals.push(RegionTotals {
                    region_name: record.region_name.as_str(),
                    cumulative_confirmed: 0,
                    cumulative_recovered: 0,
                    cumulative_deaths: 0,
                    population: None,
                });
                totals.len() - 1
            });

        let region = &mut totals[idx];
        region.cumulative_confirmed = region.cumulative_confirmed.max(record.cumulative_confirmed);
        region.cumulative_recovered = region.cumulative_recovered.max(record.cumulative_recovered);
        region.cumulative_deaths = region.cumulative_deaths.max(record.cumulative_deaths);
        if region.population.is_none() {
            region.population = record.population;
        }
    }

    let mut rows = totals
        .into_iter()
        .map(into_row)
        .collect::<Result<Vec<_>, _>>()?;

    rows.sort_by(|a, b| b.cumulative_confirmed.cmp(&a.cumulative_confirmed));

    Ok(rows)
}

fn into_row(totals: RegionTotals<'_>) -> Result<RegionStatRow, StatsError> {
    let population = match totals.population {
        Some(p) if p > 0 => p,
        other => {
            log::warn!(
                "Region '{}' has unusable population {other:?}",
                totals.region_name
            );
            return Err(StatsError::DataIntegrity {
                region: totals.region_name.to_owned(),
                population: other,
            });
        }
    };

    Ok(RegionStatRow {
        region_name: totals.region_name.to_owned(),
        cumulative_confirmed: totals.cumulative_confirmed,
        cumulative_recovered: totals.cumulative_recovered,
        cumulative_deaths: totals.cumulative_deaths,
        population,
        active_confirmed: active_cases(
            totals.cumulative_confirmed,
            totals.cumulative_recovered,
            totals.cumulative_deaths,
        ),
        incidence_rate: incidence_rate(totals.cumulative_confirmed, population),
    })
}

/// Cases per [`INCIDENCE_PER`] residents, rounded to two places.
///
/// `population` must be positive; [`region_stats`] checks this first.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn incidence_rate(cumulative_confirmed: u64, population: i64) -> f64 {
    round_to(
        cumulative_confirmed as f64 / population as f64 * INCIDENCE_PER,
        2,
    )
}

/// The `n` regions with the most cumulative confirmed cases.
///
/// `rows` must already be in [`region_stats`] order.
#[must_use]
pub fn top_regions(rows: &[RegionStatRow], n: usize) -> &[RegionStatRow] {
    &rows[..n.min(rows.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use epi_dash_record_models::CaseRecord;

    fn record(region: &str, day: u32, cumulative: u64, population: Option<i64>) -> CaseRecord {
        CaseRecord {
            region_name: region.to_string(),
            report_date: NaiveDate::from_ymd_opt(2022, 3, day).unwrap(),
            new_confirmed: 0,
            cumulative_confirmed: cumulative,
            new_recovered: 0,
            cumulative_recovered: cumulative / 4,
            new_deaths: 0,
            cumulative_deaths: cumulative / 10,
            population,
        }
    }

    #[test]
    fn two_region_example() {
        let store = RecordStore::from_records(vec![
            record("B", 1, 5, Some(50_000)),
            record("A", 1, 10, Some(100_000)),
            record("B", 2, 15, Some(50_000)),
            record("A", 2, 30, Some(100_000)),
        ]);
        let rows = region_stats(&store).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].region_name, "A");
        assert_eq!(rows[0].cumulative_confirmed, 30);
        assert!((rows[0].incidence_rate - 30.0).abs() < f64::EPSILON);
        assert_eq!(rows[1].region_name, "B");
        assert_eq!(rows[1].cumulative_confirmed, 15);
        assert!((rows[1].incidence_rate - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn takes_maximum_even_when_out_of_order() {
        let store = RecordStore::from_records(vec![
            record("A", 3, 40, Some(1000)),
            record("A", 1, 10, Some(1000)),
            record("A", 2, 20, Some(1000)),
        ]);
        let rows = region_stats(&store).unwrap();
        assert_eq!(rows[0].cumulative_confirmed, 40);
        assert_eq!(rows[0].cumulative_recovered, 10);
        assert_eq!(rows[0].cumulative_deaths, 4);
        assert_eq!(rows[0].active_confirmed, 26);
    }

    #[test]
    fn incidence_rounds_to_two_places() {
        let store = RecordStore::from_records(vec![record("A", 1, 1, Some(3))]);
        let rows = region_stats(&store).unwrap();
        assert!((rows[0].incidence_rate - 33_333.33).abs() < 1e-6);
        assert!((rows[0].incidence_rate - round_to(1.0 / 3.0 * INCIDENCE_PER, 2)).abs() < 1e-9);
    }

    #[test]
    fn uses_first_population_seen() {
        let store = RecordStore::from_records(vec![
            record("A", 1, 10, None),
            record("A", 2, 20, Some(2000)),
            record("A", 3, 30, Some(9999)),
        ]);
        let rows = region_stats(&store).unwrap();
        assert_eq!(rows[0].population, 2000);
    }

    #[test]
    fn zero_population_is_integrity_error() {
        let store = RecordStore::from_records(vec![
            record("A", 1, 10, Some(1000)),
            record("B", 1, 10, Some(0)),
        ]);
        match region_stats(&store) {
            Err(StatsError::DataIntegrity { region, population }) => {
                assert_eq!(region, "B");
                assert_eq!(population, Some(0));
            }
            other => panic!("expected integrity error, got {other:?}"),
        }
    }

    #[test]
    fn missing_population_is_integrity_error() {
        let store = RecordStore::from_records(vec![record("A", 1, 10, None)]);
        assert!(matches!(
            region_stats(&store),
            Err(StatsError::DataIntegrity {
                population: None,
                ..
            })
        ));
    }

    #[test]
    fn negative_population_is_integrity_error() {
        let store = RecordStore::from_records(vec![record("A", 1, 10, Some(-5))]);
        assert!(matches!(
            region_stats(&store),
            Err(StatsError::DataIntegrity {
                population: Some(-5),
                ..
            })
        ));
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let store = RecordStore::from_records(vec![
            record("C", 1, 10, Some(1000)),
            record("A", 1, 10, Some(1000)),
            record("B", 1, 50, Some(1000)),
        ]);
        let rows = region_stats(&store).unwrap();
        let names: Vec<&str> = rows.iter().map(|r| r.region_name.as_str()).collect();
        assert_eq!(names, vec!["B", "C", "A"]);
    }

    #[test]
    fn empty_store_gives_no_regions() {
        assert!(region_stats(&RecordStore::default()).unwrap().is_empty());
    }

    #[test]
    fn top_regions_caps_at_length() {
        let store = RecordStore::from_records(vec![
            record("A", 1, 10, Some(1000)),
            record("B", 1, 20, Some(1000)),
        ]);
        let rows = region_stats(&store).unwrap();
        assert_eq!(top_regions(&rows, 1)[0].region_name, "B");
        assert_eq!(top_regions(&rows, 5).len(), 2);
        assert!(top_regions(&rows, 0).is_empty());
    }
}
