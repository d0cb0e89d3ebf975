//! Sampling timer.
//!
//! The single periodic timer that drives simulated samples while no
//! device link is active.  It is polled from the dispatcher loop rather
//! than running on its own thread, so starting it twice can never create
//! a second timer.
//!
//! ```text
//!  start(t0)        poll(t0+2000)     poll(t0+4000)        stop()
//!     │                  │ fire            │ fire             │
//!     ▼                  ▼                 ▼                  ▼
//!  ───●──────────────────●─────────────────●──────────────────■────
//! ```

use std::time::Duration;

use log::debug;

#[derive(Debug, Clone)]
pub struct SamplingTimer {
    /// Period in ms, clamped to `1..=i64::MAX`.
    interval_ms: i64,
    /// Next fire time (epoch ms); `None` while stopped.
    next_due: Option<i64>,
}

impl SamplingTimer {
    pub fn new(interval_ms: u64) -> Self {
        debug_assert!(interval_ms > 0, "zero sampling interval");
        Self {
            interval_ms: i64::try_from(interval_ms).unwrap_or(i64::MAX).max(1),
            next_due: None,
        }
    }

    /// Arm the timer; the first fire is one interval after `now_ms`.
    /// Starting a running timer keeps its current phase.
    pub fn start(&mut self, now_ms: i64) {
        if self.next_due.is_none() {
            debug!("Sampling timer started ({} ms)", self.interval_ms);
            self.next_due = Some(now_ms.saturating_add(self.interval_ms));
        }
    }

    pub fn stop(&mut self) {
        if self.next_due.take().is_some() {
            debug!("Sampling timer stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// Whether the timer fired at `now_ms`.  Fires at most once per call;
    /// if the caller fell behind by several periods the missed ticks are
    /// skipped rather than replayed.
    pub fn poll(&mut self, now_ms: i64) -> bool {
        let Some(due) = self.next_due else {
            return false;
        };
        if now_ms < due {
            return false;
        }
        let missed = now_ms.saturating_sub(due) / self.interval_ms;
        let step = missed.saturating_add(1).saturating_mul(self.interval_ms);
        self.next_due = Some(due.saturating_add(step));
        true
    }

    /// Time until the next fire, for use as a receive timeout.
    /// `None` while stopped.
    pub fn time_until_due(&self, now_ms: i64) -> Option<Duration> {
        self.next_due
            .map(|due| Duration::from_millis(due.saturating_sub(now_ms).max(0) as u64))
    }
}
