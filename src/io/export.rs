//! CSV export for dispatch results.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::error::Result;
use crate::sim::types::DispatchResult;

/// Column header for CSV export, matching the JSON field names.
const HEADER: &str = "timestamp,production,consumption,batteryCharge,netEnergy";

/// Exports dispatch results to a CSV file at the given path.
///
/// Writes a header row followed by one data row per interval. Produces
/// deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an error if file creation or writing fails.
pub fn export_csv(results: &[DispatchResult], path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(results, buf)
}

/// Writes dispatch results as CSV to any writer.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_csv(results: &[DispatchResult], writer: impl Write) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(','))?;

    for r in results {
        wtr.write_record(&[
            r.timestamp.clone(),
            format!("{:.6}", r.production),
            format!("{:.6}", r.consumption),
            format!("{:.6}", r.battery_charge),
            format!("{:.6}", r.net_energy),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_result(h: usize) -> DispatchResult {
        DispatchResult {
            timestamp: format!("2022-01-01T{h:02}:00:00"),
            production: 1.5,
            consumption: 0.75,
            battery_charge: 500.675,
            net_energy: 0.0,
        }
    }

    #[test]
    fn header_matches_json_fields() {
        let mut buf = Vec::new();
        write_csv(&[make_result(0)], &mut buf).unwrap();
        let output = String::from_utf8(buf).unwrap();
        assert_eq!(output.lines().next(), Some(HEADER));
    }

    #[test]
    fn row_count_matches_interval_count() {
        let results: Vec<DispatchResult> = (0..24).map(make_result).collect();
        let mut buf = Vec::new();
        write_csv(&results, &mut buf).unwrap();
        let output = String::from_utf8(buf).unwrap();
        // 1 header + 24 data rows
        assert_eq!(output.lines().count(), 25);
    }

    #[test]
    fn export_reads_back_through_ingestion() {
        let results: Vec<DispatchResult> = (0..3).map(make_result).collect();
        let mut buf = Vec::new();
        write_csv(&results, &mut buf).unwrap();

        // Column 1 is production, so ingestion sees it as the value column
        let readings = crate::io::readings::parse_readings(&buf);
        assert_eq!(readings.len(), 3);
        assert_eq!(readings[2].timestamp, "2022-01-01T02:00:00");
        assert_eq!(readings[2].value, 1.5);
    }

    #[test]
    fn export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        export_csv(&[make_result(5)], &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("2022-01-01T05:00:00,1.500000,0.750000,500.675000,0.000000"));
    }
}
