//! Wall-clock time adapter.
//!
//! History timestamps, alert cooldowns and the export file name all use
//! epoch milliseconds (UTC), so the dashboard reads the wall clock rather
//! than a monotonic one.

use chrono::Utc;

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }

    /// Milliseconds since the Unix epoch.
    pub fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}
