//! Text rendering of the dashboard.
//!
//! Produces the screen the shell prints after every state change: sensor
//! cards, connection status, actuator toggles, the recent-readings table,
//! a chart summary and the advice panel.

use core::fmt::Write as _;

use crate::app::service::DashboardService;
use crate::chart::{CHARTED_METRICS, ChartProjection, PLACEHOLDER_TEXT, stroke_colour};
use crate::export::iso_timestamp;
use crate::fsm::LinkState;
use crate::reading::{ControlName, DisplayBands, Metric, Reading};

fn card(reading: Option<&Reading>, metric: Metric, bands: &DisplayBands) -> String {
    let Some(r) = reading else {
        return format!("{:<15} --", metric.label());
    };
    let value = metric.format_value(r.value(metric));
    match r.status(metric, bands) {
        Some(status) if status.is_alarming() => {
            format!("{:<15} {:>6}  [{}]", metric.label(), value, status)
        }
        _ => format!("{:<15} {:>6}", metric.label(), value),
    }
}

fn status_line(status: LinkState) -> &'static str {
    match status {
        LinkState::Disconnected => "Disconnected (simulated data)",
        LinkState::Connecting => "Connecting...",
        LinkState::Connected => "Connected",
    }
}

/// One line per charted metric: first value, last value and trend.
pub fn chart_summary(projection: &ChartProjection) -> String {
    if projection.is_placeholder() {
        return PLACEHOLDER_TEXT.to_string();
    }
    let mut out = format!("{} samples", projection.samples);
    for metric in CHARTED_METRICS {
        let Some(line) = projection.series(metric) else {
            continue;
        };
        let points: Vec<(f64, f64)> = line.points().collect();
        let (Some(first), Some(last)) = (points.first(), points.last()) else {
            continue;
        };
        // Screen y grows downwards.
        let trend = if last.1 < first.1 - 0.5 {
            "rising"
        } else if last.1 > first.1 + 0.5 {
            "falling"
        } else {
            "steady"
        };
        let _ = write!(out, "\n  {:<12} {} {}", metric.to_string(), stroke_colour(metric), trend);
    }
    out
}

/// Full dashboard screen.
pub fn render_dashboard(svc: &DashboardService) -> String {
    let mut out = String::new();
    let latest = svc.latest().map(|rec| &rec.reading);

    let _ = writeln!(out, "=== Soil Dashboard ({} theme) ===", svc.theme());
    let _ = writeln!(out, "Status: {}", status_line(svc.status()));
    if let Some(device) = svc.device() {
        let _ = writeln!(out, "Device: {} ({})", device.name, device.id);
    }
    out.push('\n');

    let bands = svc.config().display_bands();
    for metric in Metric::ALL {
        let _ = writeln!(out, "{}", card(latest, metric, &bands));
    }
    out.push('\n');

    let _ = writeln!(out, "Controls:");
    for control in ControlName::ALL {
        let on = svc.controls().is_on(control);
        let _ = writeln!(
            out,
            "  {:<16} {}",
            control.label(),
            if on { "ON" } else { "off" }
        );
    }
    out.push('\n');

    let _ = writeln!(out, "Recent readings:");
    if svc.history().is_empty() {
        let _ = writeln!(out, "  (none yet)");
    } else {
        let _ = writeln!(
            out,
            "  {:<24} {:>5} {:>8} {:>6} {:>7}",
            "Time", "pH", "Moist%", "Temp", "Batt%"
        );
        for rec in svc.history().table() {
            let r = &rec.reading;
            let _ = writeln!(
                out,
                "  {:<24} {:>5.1} {:>8.0} {:>6.0} {:>7.0}",
                iso_timestamp(rec.timestamp_ms),
                r.ph,
                r.moisture,
                r.temperature,
                r.battery
            );
        }
    }
    out.push('\n');

    let _ = writeln!(out, "Chart: {}", chart_summary(&svc.chart()));
    out.push('\n');

    if svc.advice_pending() {
        let _ = writeln!(out, "Advice: Thinking...");
    } else if let Some(advice) = svc.last_advice() {
        let _ = writeln!(out, "Advice: {}", advice);
    } else if !svc.advice_available() {
        let _ = writeln!(out, "Advice: unavailable (set API_KEY)");
    }
    out
}
