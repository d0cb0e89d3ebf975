//! CSV export of the reading history.
//!
//! Output format:
//!
//! ```text
//! Timestamp,pH,Moisture (%),Temperature (°C),Battery (%)
//! 2024-05-01T10:00:02.000Z,6.60,40.00,25.00,89.00
//! 2024-05-01T10:00:00.000Z,6.50,41.00,24.00,90.00
//! ```
//!
//! Rows follow buffer order (newest first) and are limited to the table
//! view.  No trailing newline.

use chrono::{DateTime, Utc};

use crate::history::HistoryBuffer;
use crate::reading::HistoryRecord;

pub const CSV_HEADER: &str = "Timestamp,pH,Moisture (%),Temperature (°C),Battery (%)";

/// A serialized export ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub file_name: String,
    pub contents: String,
    pub rows: usize,
}

fn utc(timestamp_ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(timestamp_ms).unwrap_or_default()
}

/// ISO-8601 UTC with milliseconds, e.g. `2024-05-01T10:00:00.000Z`.
pub fn iso_timestamp(timestamp_ms: i64) -> String {
    utc(timestamp_ms)
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}

/// `soil_data_<YYYY-MM-DD>.csv` for the UTC date of `now_ms`.
pub fn export_file_name(now_ms: i64) -> String {
    format!("soil_data_{}.csv", utc(now_ms).format("%Y-%m-%d"))
}

fn csv_row(record: &HistoryRecord) -> String {
    let r = &record.reading;
    format!(
        "{},{:.2},{:.2},{:.2},{:.2}",
        iso_timestamp(record.timestamp_ms),
        r.ph,
        r.moisture,
        r.temperature,
        r.battery
    )
}

/// Header plus one row per record, in the order given.
pub fn history_to_csv<'a>(records: impl IntoIterator<Item = &'a HistoryRecord>) -> String {
    let mut lines = vec![CSV_HEADER.to_string()];
    lines.extend(records.into_iter().map(csv_row));
    lines.join("\n")
}

/// Export the table view of `history`, named for the date of `now_ms`.
pub fn export_history(history: &HistoryBuffer, now_ms: i64) -> CsvExport {
    CsvExport {
        file_name: export_file_name(now_ms),
        contents: history_to_csv(history.table()),
        rows: history.table().count(),
    }
}
