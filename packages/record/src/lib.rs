#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! In-memory case record store.
//!
//! The store is the whole dataset held in memory. It is loaded in full from
//! a [`RecordSource`] on every query and never mutated afterwards; there is
//! no caching layer and no partial read.

pub mod csv_source;

use std::path::PathBuf;

use epi_dash_record_models::CaseRecord;
use thiserror::Error;

pub use csv_source::CsvFileSource;

/// Errors raised while loading or exporting case records.
#[derive(Debug, Error)]
pub enum RecordStoreError {
    /// The source file does not exist.
    #[error("Data source not found: {}", .path.display())]
    NotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The source exists but could not be read.
    #[error("Failed to read data source {}: {source}", .path.display())]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The header row lacks one or more required columns.
    #[error("Data source is missing required columns: {}", .missing.join(", "))]
    Schema {
        /// Canonical names of the missing columns.
        missing: Vec<String>,
    },

    /// A data row could not be coerced into a [`CaseRecord`].
    #[error("Invalid record on line {line}: {source}")]
    Parse {
        /// 1-based line number in the source (the header is line 1).
        line: u64,
        /// Underlying CSV/deserialization failure.
        #[source]
        source: csv::Error,
    },

    /// Any other CSV reader or writer failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// The full set of case records for one query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordStore {
    records: Vec<CaseRecord>,
}

impl RecordStore {
    /// Wraps an already-loaded set of records, keeping their order.
    #[must_use]
    pub const fn from_records(records: Vec<CaseRecord>) -> Self {
        Self { records }
    }

    /// All records in source order.
    #[must_use]
    pub fn records(&self) -> &[CaseRecord] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Something that can produce a fresh [`RecordStore`] on demand.
///
/// Implementations must read the whole source or fail; callers never see a
/// partially populated store.
pub trait RecordSource: Send + Sync {
    /// Loads every record from the source.
    ///
    /// # Errors
    ///
    /// Returns [`RecordStoreError`] if the source is missing, unreadable,
    /// or does not match the case record schema.
    fn load(&self) -> Result<RecordStore, RecordStoreError>;

    /// Short human-readable label for log messages.
    fn describe(&self) -> String;
}

/// A fixed, in-memory record source. Every load returns a clone of the
/// same records.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    records: Vec<CaseRecord>,
}

impl StaticSource {
    /// Creates a source that always yields `records`.
    #[must_use]
    pub const fn new(records: Vec<CaseRecord>) -> Self {
        Self { records }
    }
}

impl RecordSource for StaticSource {
    fn load(&self) -> Result<RecordStore, RecordStoreError> {
        Ok(RecordStore::from_records(self.records.clone()))
    }

    fn describe(&self) -> String {
        format!("static source ({} records)", self.records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(region: &str, day: u32) -> CaseRecord {
        CaseRecord {
            region_name: region.to_string(),
            report_date: NaiveDate::from_ymd_opt(2022, 3, day).unwrap(),
            new_confirmed: 1,
            cumulative_confirmed: u64::from(day),
            new_recovered: 0,
            cumulative_recovered: 0,
            new_deaths: 0,
            cumulative_deaths: 0,
            population: Some(1000),
        }
    }

    #[test]
    fn store_keeps_source_order() {
        let store = RecordStore::from_records(vec![record("B", 2), record("A", 1)]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.records()[0].region_name, "B");
        assert_eq!(store.records()[1].region_name, "A");
    }

    #[test]
    fn default_store_is_empty() {
        assert!(RecordStore::default().is_empty());
    }

    #[test]
    fn static_source_reloads_identically() {
        let source = StaticSource::new(vec![record("A", 1)]);
        let first = source.load().unwrap();
        let second = source.load().unwrap();
        assert_eq!(first, second);
        assert_eq!(source.describe(), "static source (1 records)");
    }

    #[test]
    fn schema_error_lists_missing_columns() {
        let err = RecordStoreError::Schema {
            missing: vec!["population".to_string(), "new_deaths".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Data source is missing required columns: population, new_deaths"
        );
    }
}
