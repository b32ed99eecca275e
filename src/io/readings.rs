//! CSV ingestion of production readings.
//!
//! The first line is a header and is discarded. Each data line carries the
//! timestamp in column 0 and the production value (Wh) in column 1; any
//! further columns are ignored. Rows without a finite value are dropped.
//! Quote characters carry no meaning: every line is one row and every comma
//! separates fields.

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::sim::types::Reading;

/// Parses a CSV payload into readings, in file order.
///
/// Parsing is pure: the same bytes always yield the same readings.
///
/// # Examples
///
/// ```
/// use dispatch_sim::io::readings::parse_readings;
///
/// let csv = b"time,P_Wh\n2020-01-01T00:00:00,1200\n2020-01-01T01:00:00,n/a\n";
/// let readings = parse_readings(csv);
/// assert_eq!(readings.len(), 1);
/// assert_eq!(readings[0].value, 1200.0);
/// ```
pub fn parse_readings(payload: &[u8]) -> Vec<Reading> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .from_reader(payload);

    let mut readings = Vec::new();
    for (idx, record) in rdr.byte_records().enumerate() {
        // Line numbers are 1-based and the header occupies line 1
        let line = idx + 2;
        let record = match record {
            Ok(rec) => rec,
            Err(e) => {
                debug!(line, error = %e, "dropping unreadable row");
                continue;
            }
        };

        let Some(value) = record.get(1).and_then(parse_value) else {
            debug!(line, "dropping row without a finite value");
            continue;
        };
        let timestamp = record.get(0).map(String::from_utf8_lossy).unwrap_or(Cow::Borrowed(""));

        readings.push(Reading::new(timestamp.into_owned(), value));
    }
    readings
}

/// Reads and parses a local CSV file.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn read_readings_file(path: &Path) -> Result<Vec<Reading>> {
    let bytes = fs::read(path)?;
    Ok(parse_readings(&bytes))
}

fn parse_value(field: &[u8]) -> Option<f64> {
    std::str::from_utf8(field)
        .ok()?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}
