//! CSV file record source.
//!
//! Reads the whole file, checks the header row against
//! [`CASE_FIELDS`], and deserializes every row into a [`CaseRecord`]. Both
//! the canonical English headers and the Chinese headers of the district dataset are
//! accepted. Export always writes the canonical headers.

use std::fs::File;
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use epi_dash_record_models::{CASE_FIELDS, CaseRecord};

use crate::{RecordSource, RecordStore, RecordStoreError};

/// Loads case records from a CSV file on disk.
#[derive(Debug, Clone)]
pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    /// Creates a source reading from `path`. The file is not touched until
    /// [`RecordSource::load`] is called.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSource for CsvFileSource {
    fn load(&self) -> Result<RecordStore, RecordStoreError> {
        let file = File::open(&self.path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                RecordStoreError::NotFound {
                    path: self.path.clone(),
                }
            } else {
                RecordStoreError::Io {
                    path: self.path.clone(),
                    source: e,
                }
            }
        })?;

        let store = read_csv(file)?;
        log::debug!(
            "Loaded {} case records from {}",
            store.len(),
            self.path.display()
        );
        Ok(store)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Parses CSV case records from any reader.
///
/// # Errors
///
/// Returns [`RecordStoreError::Schema`] if required columns are missing,
/// [`RecordStoreError::Parse`] if a row cannot be coerced, or
/// [`RecordStoreError::Csv`] for lower-level reader failures.
pub fn read_csv<R: Read>(mut reader: R) -> Result<RecordStore, RecordStoreError> {
    let mut raw = Vec::new();
    reader.read_to_end(&mut raw).map_err(csv::Error::from)?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(raw.as_slice());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_owned())
        .collect();
    check_headers(&headers)?;
    reader.set_headers(csv::StringRecord::from(headers));

    let mut records = Vec::new();
    for (idx, result) in reader.deserialize::<CaseRecord>().enumerate() {
        let record = result.map_err(|source| RecordStoreError::Parse {
            line: source
                .position()
                .map_or(idx as u64 + 2, |pos| record_start_line(&raw, pos)),
            source,
        })?;
        records.push(record);
    }

    Ok(RecordStore::from_records(records))
}

/// Line on which the record at `pos` starts.
///
/// The reader stamps a record with the position right after the previous
/// one, before any blank lines it skips, so those are stepped over here.
fn record_start_line(raw: &[u8], pos: &csv::Position) -> u64 {
    let start = usize::try_from(pos.byte()).map_or(raw.len(), |b| b.min(raw.len()));
    let blank_lines = raw[start..]
        .iter()
        .take_while(|&&b| b == b'\n' || b == b'\r')
        .filter(|&&b| b == b'\n')
        .count();
    pos.line() + blank_lines as u64
}

/// Writes `store` as CSV with the canonical header row, even when empty.
///
/// # Errors
///
/// Returns [`RecordStoreError::Csv`] if writing fails.
pub fn write_csv<W: Write>(store: &RecordStore, writer: W) -> Result<(), RecordStoreError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    writer.write_record(CASE_FIELDS.iter().map(|f| f.name))?;
    for record in store.records() {
        writer.serialize(record)?;
    }
    writer.flush().map_err(csv::Error::from)?;

    Ok(())
}

fn check_headers(headers: &[String]) -> Result<(), RecordStoreError> {
    let missing: Vec<String> = CASE_FIELDS
        .iter()
        .filter(|field| !headers.iter().any(|h| field.matches(h)))
        .map(|field| field.name.to_owned())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(RecordStoreError::Schema { missing })
    }
}
