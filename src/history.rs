//! Rolling reading history.
//!
//! One authoritative newest-first sequence sized for the larger of the two
//! consumers: the recent-readings table / CSV export (10 rows) and the
//! chart window (30 samples).  Each consumer truncates to its own cap.
//!
//! Backed by a `heapless::Deque`, so the capacity is fixed at compile time
//! and insertion never allocates.

use heapless::Deque;
use heapless::Vec as HVec;

use crate::reading::{HistoryRecord, Reading};

/// Rows shown in the recent-readings table and written by CSV export.
pub const TABLE_ROWS: usize = 10;

/// Samples drawn on the chart.
pub const CHART_WINDOW: usize = 30;

/// Records retained: enough for the larger consumer.
pub const HISTORY_CAPACITY: usize = if TABLE_ROWS > CHART_WINDOW {
    TABLE_ROWS
} else {
    CHART_WINDOW
};

/// Newest-first, capped reading history.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    records: Deque<HistoryRecord, HISTORY_CAPACITY>,
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryBuffer {
    pub fn new() -> Self {
        Self {
            records: Deque::new(),
        }
    }

    /// Prepend a new record, evicting the oldest when full.
    ///
    /// Returns the stored record.
    pub fn record(&mut self, reading: Reading, timestamp_ms: i64) -> HistoryRecord {
        let record = HistoryRecord {
            timestamp_ms,
            reading,
        };
        if self.records.is_full() {
            self.records.pop_back();
        }
        // Room is guaranteed by the eviction above.
        let _ = self.records.push_front(record);
        record
    }

    /// Most recent record.
    pub fn latest(&self) -> Option<&HistoryRecord> {
        self.records.front()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All retained records, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryRecord> {
        self.records.iter()
    }

    /// At most `n` records, newest first.
    pub fn newest(&self, n: usize) -> impl Iterator<Item = &HistoryRecord> {
        self.records.iter().take(n)
    }

    /// The table / export view (newest first, at most [`TABLE_ROWS`]).
    pub fn table(&self) -> impl Iterator<Item = &HistoryRecord> {
        self.newest(TABLE_ROWS)
    }

    /// The chart view (newest first, at most [`CHART_WINDOW`]).
    pub fn window(&self) -> HVec<HistoryRecord, CHART_WINDOW> {
        self.newest(CHART_WINDOW).copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(moisture: f64) -> Reading {
        Reading::new(6.5, moisture, 24.0, 90.0)
    }

    #[test]
    fn starts_empty() {
        let h = HistoryBuffer::new();
        assert!(h.is_empty());
        assert!(h.latest().is_none());
        assert_eq!(h.window().len(), 0);
    }

    #[test]
    fn newest_record_is_at_front() {
        let mut h = HistoryBuffer::new();
        h.record(reading(10.0), 1_000);
        h.record(reading(20.0), 2_000);
        let latest = h.latest().unwrap();
        assert_eq!(latest.timestamp_ms, 2_000);
        assert!((latest.reading.moisture - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn evicts_oldest_at_capacity() {
        let mut h = HistoryBuffer::new();
        for i in 0..(HISTORY_CAPACITY as i64 + 5) {
            h.record(reading(i as f64), i);
        }
        assert_eq!(h.len(), HISTORY_CAPACITY);
        assert_eq!(h.latest().unwrap().timestamp_ms, HISTORY_CAPACITY as i64 + 4);
        // Oldest surviving record is the one inserted 5 after the first.
        assert_eq!(h.iter().last().unwrap().timestamp_ms, 5);
    }

    #[test]
    fn views_truncate_to_their_own_caps() {
        let mut h = HistoryBuffer::new();
        for i in 0..40 {
            h.record(reading(50.0), i);
        }
        assert_eq!(h.table().count(), TABLE_ROWS);
        assert_eq!(h.window().len(), CHART_WINDOW);
        assert_eq!(h.table().next().unwrap().timestamp_ms, 39);
        assert_eq!(h.window()[0].timestamp_ms, 39);
    }

    #[test]
    fn table_view_shorter_than_cap_when_few_records() {
        let mut h = HistoryBuffer::new();
        h.record(reading(50.0), 1);
        h.record(reading(51.0), 2);
        assert_eq!(h.table().count(), 2);
    }
}
