//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing one structured line per
//! application event to the `log` facade.

use log::{info, warn};

use crate::alerts::Direction;
use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { status, theme } => {
                info!("START | status={} theme={}", status, theme);
            }
            AppEvent::StatusChanged { from, to } => {
                info!("STATE | {} -> {}", from, to);
            }
            AppEvent::ReadingRecorded(rec) => {
                let r = &rec.reading;
                info!(
                    "READING | t={} | pH={:.2} | moisture={:.1}% | T={:.1}\u{00b0}C | battery={:.0}%",
                    rec.timestamp_ms, r.ph, r.moisture, r.temperature, r.battery
                );
            }
            AppEvent::AlertRaised(alert) => {
                warn!(
                    "ALERT | {} {:.2} {} {:.2} | \"{}\"",
                    alert.metric,
                    alert.value,
                    if alert.direction == Direction::Below { "<" } else { ">" },
                    alert.threshold,
                    alert.message
                );
            }
            AppEvent::ControlToggled { control, on, command } => {
                info!(
                    "CONTROL | {} {} | cmd={}",
                    control.label(),
                    if *on { "ON" } else { "OFF" },
                    command
                );
            }
            AppEvent::ThemeChanged(theme) => {
                info!("THEME | {}", theme);
            }
            AppEvent::AdviceRequested => {
                info!("ADVICE | requested");
            }
            AppEvent::AdviceAnswered { fallback } => {
                info!("ADVICE | answered{}", if *fallback { " (fallback)" } else { "" });
            }
            AppEvent::DeviceUnavailable => {
                warn!("DEVICE | unavailable");
            }
            AppEvent::Exported { file_name, rows } => {
                info!("EXPORT | {} ({} rows)", file_name, rows);
            }
        }
    }
}
