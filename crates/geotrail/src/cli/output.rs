//! Rendering of captured records for the terminal.

use std::fmt::Write as _;

use crate::error::Result;
use crate::location::LocationRecord;

use super::OutputFormat;

/// Render a list of records in the requested format.
///
/// # Errors
///
/// Returns [`crate::Error::Json`] if JSON serialization fails.
pub fn render_records(records: &[LocationRecord], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Plain => Ok(render_plain(records)),
        OutputFormat::Table => Ok(render_table(records)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(records)?),
    }
}

/// Render a single record in the requested format.
///
/// # Errors
///
/// Returns [`crate::Error::Json`] if JSON serialization fails.
pub fn render_record(record: &LocationRecord, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        other => render_records(std::slice::from_ref(record), other),
    }
}

fn render_plain(records: &[LocationRecord]) -> String {
    if records.is_empty() {
        return "No locations captured yet.".to_string();
    }

    records
        .iter()
        .map(|record| {
            format!(
                "Location {}\nLatitude: {} | Longitude: {}",
                record.id, record.latitude, record.longitude
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_table(records: &[LocationRecord]) -> String {
    let mut out = format!(
        "{:>6}  {:>12}  {:>13}  {}\n",
        "ID", "LATITUDE", "LONGITUDE", "CAPTURED AT"
    );
    for record in records {
        // Writing to a String cannot fail.
        let _ = writeln!(
            out,
            "{:>6}  {:>12.6}  {:>13.6}  {}",
            record.id,
            record.latitude,
            record.longitude,
            record.captured_at.format("%Y-%m-%d %H:%M:%S%.3f UTC"),
        );
    }
    out.truncate(out.trim_end().len());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn record(id: i64, latitude: f64, longitude: f64) -> LocationRecord {
        LocationRecord {
            id,
            latitude,
            longitude,
            captured_at: DateTime::<Utc>::from_timestamp_millis(1_700_000_000_123).unwrap(),
        }
    }

    #[test]
    fn test_plain_empty() {
        let out = render_records(&[], OutputFormat::Plain).unwrap();
        assert_eq!(out, "No locations captured yet.");
    }

    #[test]
    fn test_plain_records() {
        let records = [record(1, 40.5, -74.25), record(2, 51.5, -0.125)];
        let out = render_records(&records, OutputFormat::Plain).unwrap();

        assert_eq!(
            out,
            "Location 1\nLatitude: 40.5 | Longitude: -74.25\n\n\
             Location 2\nLatitude: 51.5 | Longitude: -0.125"
        );
    }

    #[test]
    fn test_table_has_header_and_rows() {
        let records = [record(7, 40.5, -74.25)];
        let out = render_records(&records, OutputFormat::Table).unwrap();
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("LATITUDE"));
        assert!(lines[1].contains("40.500000"));
        assert!(lines[1].contains("-74.250000"));
        assert!(lines[1].contains("2023-11-14 22:13:20.123 UTC"));
    }

    #[test]
    fn test_table_empty_is_header_only() {
        let out = render_records(&[], OutputFormat::Table).unwrap();
        assert_eq!(out.lines().count(), 1);
    }

    #[test]
    fn test_json_records() {
        let records = [record(1, 40.5, -74.25)];
        let out = render_records(&records, OutputFormat::Json).unwrap();
        let parsed: Vec<LocationRecord> = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, records);
    }

    #[test]
    fn test_render_single_record() {
        let rec = record(3, 0.0, 0.0);

        let json = render_record(&rec, OutputFormat::Json).unwrap();
        assert!(json.trim_start().starts_with('{'));

        let plain = render_record(&rec, OutputFormat::Plain).unwrap();
        assert!(plain.starts_with("Location 3"));
    }
}
