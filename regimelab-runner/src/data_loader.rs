//! CSV bar loading.
//!
//! Expected layout: `timestamp,open,high,low,close,volume` with an optional
//! header row. Timestamps are either decimal epoch seconds or
//! `YYYY-MM-DD HH:MM:SS` (date-only accepted, midnight assumed), parsed as
//! UTC civil time. Malformed rows are skipped and counted, never fatal;
//! empty or header-only input yields an empty bar sequence.

use chrono::{NaiveDate, NaiveDateTime};
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

use regimelab_core::domain::Bar;

/// Errors from the data loading layer. Row-level problems are not errors;
/// they surface as `skipped_rows`.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not open '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error in '{path}': {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
}

/// Bars plus loader diagnostics.
#[derive(Debug)]
pub struct LoadedBars {
    pub bars: Vec<Bar>,
    /// Rows dropped for being malformed (wrong arity, unparseable fields).
    pub skipped_rows: usize,
}

/// Load an ordered bar sequence from a CSV file.
pub fn load_csv(path: &Path) -> Result<LoadedBars, LoadError> {
    let path_display = path.display().to_string();
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path_display.clone(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut bars = Vec::new();
    let mut skipped_rows = 0;

    for (row_index, record) in reader.records().enumerate() {
        let record = record.map_err(|source| LoadError::Csv {
            path: path_display.clone(),
            source,
        })?;

        // A leading header row is recognized by its alphabetic first field
        // and dropped silently.
        if row_index == 0 && is_header(&record) {
            continue;
        }

        match parse_row(&record) {
            Some(bar) => bars.push(bar),
            None => {
                warn!(row = row_index + 1, "skipping malformed csv row");
                skipped_rows += 1;
            }
        }
    }

    info!(path = %path_display, bars = bars.len(), skipped = skipped_rows, "loaded bars");
    Ok(LoadedBars { bars, skipped_rows })
}

fn is_header(record: &csv::StringRecord) -> bool {
    record
        .get(0)
        .is_some_and(|field| field.chars().next().is_some_and(|c| c.is_ascii_alphabetic()))
}

fn parse_row(record: &csv::StringRecord) -> Option<Bar> {
    if record.len() < 6 {
        return None;
    }
    let timestamp = parse_timestamp(record.get(0)?.trim())?;
    let open: f64 = record.get(1)?.trim().parse().ok()?;
    let high: f64 = record.get(2)?.trim().parse().ok()?;
    let low: f64 = record.get(3)?.trim().parse().ok()?;
    let close: f64 = record.get(4)?.trim().parse().ok()?;
    let volume: f64 = record.get(5)?.trim().parse().ok()?;
    Some(Bar::new(timestamp, open, high, low, close, volume))
}

/// Epoch seconds, `YYYY-MM-DD HH:MM:SS`, or bare `YYYY-MM-DD`.
fn parse_timestamp(field: &str) -> Option<i64> {
    if !field.is_empty() && field.bytes().all(|b| b.is_ascii_digit()) {
        return field.parse().ok();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(field, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc().timestamp());
    }
    if let Ok(date) = NaiveDate::parse_from_str(field, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp());
    }
    None
}
