//! One function per dashboard query.
//!
//! Each call reloads the record source and recomputes from scratch, so
//! handlers share no mutable state and repeated calls over unchanged data
//! return identical results.

use epi_dash_geography_models::RegionNameTable;
use epi_dash_record::RecordSource;
use epi_dash_server_models::{
    DailyDataResponse, MapDataResponse, RegionDataResponse, SummaryDataResponse,
};
use epi_dash_stats::StatsError;
use epi_dash_stats::daily::daily_series;
use epi_dash_stats::map::MapProjector;
use epi_dash_stats::region::region_stats;
use epi_dash_stats::summary::summarize;

/// Daily all-region series. An empty source gives empty arrays.
///
/// # Errors
///
/// Returns [`StatsError::DataLoad`] if the source cannot be loaded.
pub fn daily_data(source: &dyn RecordSource) -> Result<DailyDataResponse, StatsError> {
    let store = source.load()?;
    let series = daily_series(&store);
    Ok(DailyDataResponse::from(&series))
}

/// Per-region totals, most cases first.
///
/// # Errors
///
/// Returns [`StatsError::DataLoad`] if the source cannot be loaded, or
/// [`StatsError::DataIntegrity`] if a region's population is unusable.
pub fn region_data(source: &dyn RecordSource) -> Result<RegionDataResponse, StatsError> {
    let store = source.load()?;
    let rows = region_stats(&store)?;
    Ok(RegionDataResponse::from(rows.as_slice()))
}

/// Headline figures.
///
/// # Errors
///
/// Returns [`StatsError::DataLoad`] if the source cannot be loaded, or
/// [`StatsError::DataUnavailable`] if it holds no records.
pub fn summary_data(source: &dyn RecordSource) -> Result<SummaryDataResponse, StatsError> {
    let store = source.load()?;
    let series = daily_series(&store);
    Ok(summarize(&series)?.into())
}

/// Map payload for the regions `table` can translate.
///
/// # Errors
///
/// Returns [`StatsError::DataLoad`] if the source cannot be loaded, or
/// [`StatsError::DataIntegrity`] if a region's population is unusable.
pub fn map_data(
    source: &dyn RecordSource,
    table: &RegionNameTable,
) -> Result<MapDataResponse, StatsError> {
    let store = source.load()?;
    let rows = region_stats(&store)?;
    Ok(MapProjector::new(table).project(&rows).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use epi_dash_geography_models::RegionName;
    use epi_dash_record::{CsvFileSource, StaticSource};
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

    /// Regions A (pop. 100,000) and B (pop. 50,000) over two days.
    fn two_region_source() -> StaticSource {
        StaticSource::new(vec![
            record("A", 1, 10, 10, 100_000),
            record("B", 1, 5, 5, 50_000),
            record("A", 2, 20, 30, 100_000),
            record("B", 2, 10, 15, 50_000),
        ])
    }

    fn table() -> RegionNameTable {
        RegionNameTable::new(
            "test",
            "Test",
            vec![RegionName {
                id: "Alpha".to_string(),
                local_name: "A".to_string(),
            }],
        )
        .unwrap()
    }

    #[test]
    fn two_region_daily() {
        let daily = daily_data(&two_region_source()).unwrap();
        assert_eq!(daily.new_cases, vec![15, 30]);
        assert_eq!(daily.cumulative_cases, vec![15, 45]);
        assert_eq!(daily.active_cases, vec![15, 45]);
    }

    #[test]
    fn two_region_regions() {
        let regions = region_data(&two_region_source()).unwrap();
        assert_eq!(regions.regions, vec!["A", "B"]);
        assert_eq!(regions.cumulative_cases, vec![30, 15]);
        assert!(
            regions
                .incidence_rates
                .iter()
                .all(|r| (r - 30.0).abs() < f64::EPSILON)
        );
    }

    #[test]
    fn two_region_summary() {
        let summary = summary_data(&two_region_source()).unwrap();
        assert_eq!(summary.total_cases, 45);
        assert_eq!(summary.active_cases, 45);
        assert_eq!(summary.max_daily_new, 30);
        assert_eq!(
            summary.max_daily_date,
            NaiveDate::from_ymd_opt(2022, 3, 2).unwrap()
        );
    }

    #[test]
    fn two_region_map_drops_untranslated() {
        let map = map_data(&two_region_source(), &table()).unwrap();
        assert_eq!(map.map_data.len(), 1);
        assert_eq!(map.map_data[0].external_id, "Alpha");
        assert_eq!(map.max_cases, 30);
        assert_eq!(map.min_cases, 30);
    }

    #[test]
    fn repeated_queries_are_identical() {
        let source = two_region_source();
        assert_eq!(daily_data(&source).unwrap(), daily_data(&source).unwrap());
        assert_eq!(region_data(&source).unwrap(), region_data(&source).unwrap());
        assert_eq!(
            summary_data(&source).unwrap(),
            summary_data(&source).unwrap()
        );
        assert_eq!(
            map_data(&source, &table()).unwrap(),
            map_data(&source, &table()).unwrap()
        );
    }

    #[test]
    fn empty_source() {
        let source = StaticSource::default();
        let daily = daily_data(&source).unwrap();
        assert!(daily.dates.is_empty());
        assert!(matches!(
            summary_data(&source),
            Err(StatsError::DataUnavailable)
        ));
        assert!(region_data(&source).unwrap().regions.is_empty());
    }

    #[test]
    fn missing_file_is_load_error() {
        let source = CsvFileSource::new("no/such/cases.csv");
        assert!(matches!(
            summary_data(&source),
            Err(StatsError::DataLoad(_))
        ));
    }

    #[test]
    fn zero_population_fails_region_and_map_queries() {
        let source = StaticSource::new(vec![record("A", 1, 1, 1, 0)]);
        assert!(matches!(
            region_data(&source),
            Err(StatsError::DataIntegrity { .. })
        ));
        assert!(matches!(
            map_data(&source, &table()),
            Err(StatsError::DataIntegrity { .. })
        ));
        // The daily series does not need population.
        assert!(daily_data(&source).is_ok());
    }
}
