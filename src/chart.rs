//! Chart projector.
//!
//! Maps the chart window of the history buffer onto 2-D path commands for
//! the three tracked metrics (pH, moisture, temperature).
//!
//! ```text
//!  history (newest first) ──take(30)──reverse──▶ oldest … newest
//!                                                   │
//!         x = i / (n-1) * plot_width                │
//!         y = plot_height - norm(v) * plot_height   ▼
//!                                          M x0 y0 L x1 y1 …
//! ```
//!
//! The horizontal axis is sample-index based: points are evenly spaced no
//! matter how much wall time passed between samples.  Values outside a
//! metric's range land outside the plot band; nothing is clamped.

use core::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::history::CHART_WINDOW;
use crate::reading::{HistoryRecord, Metric, Theme};

/// Metrics drawn on the chart, in paint order.
pub const CHARTED_METRICS: [Metric; 3] = [Metric::Moisture, Metric::Ph, Metric::Temperature];

/// Placeholder shown when fewer than two samples exist.
pub const PLACEHOLDER_TEXT: &str = "Waiting for data...";

// ---------------------------------------------------------------------------
// Ranges & geometry
// ---------------------------------------------------------------------------

/// Fixed vertical range for one metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricRange {
    pub min: f64,
    pub max: f64,
}

impl MetricRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// `(value - min) / (max - min)`; 0 at `min`, 1 at `max`, unclamped.
    pub fn normalize(&self, value: f64) -> f64 {
        debug_assert!(self.max > self.min, "degenerate chart range");
        (value - self.min) / (self.max - self.min)
    }
}

/// Per-metric chart ranges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartRanges {
    pub ph: MetricRange,
    pub moisture: MetricRange,
    pub temperature: MetricRange,
}

impl Default for ChartRanges {
    fn default() -> Self {
        Self {
            ph: MetricRange::new(4.0, 9.0),
            moisture: MetricRange::new(0.0, 100.0),
            temperature: MetricRange::new(0.0, 50.0),
        }
    }
}

impl ChartRanges {
    /// Range for a charted metric; `None` for battery.
    pub fn for_metric(&self, metric: Metric) -> Option<MetricRange> {
        match metric {
            Metric::Ph => Some(self.ph),
            Metric::Moisture => Some(self.moisture),
            Metric::Temperature => Some(self.temperature),
            Metric::Battery => None,
        }
    }
}

/// SVG viewport and margins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartGeometry {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
}

impl Default for ChartGeometry {
    fn default() -> Self {
        Self {
            width: 500.0,
            height: 150.0,
            margin: 10.0,
        }
    }
}

impl ChartGeometry {
    pub fn plot_width(&self) -> f64 {
        self.width - 2.0 * self.margin
    }

    pub fn plot_height(&self) -> f64 {
        self.height - 2.0 * self.margin
    }
}

// ---------------------------------------------------------------------------
// Path output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
}

impl PathCommand {
    pub fn point(&self) -> (f64, f64) {
        match *self {
            Self::MoveTo { x, y } | Self::LineTo { x, y } => (x, y),
        }
    }
}

/// Line-segment commands for one metric.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub metric: Metric,
    pub commands: Vec<PathCommand>,
}

impl Polyline {
    /// SVG path data, e.g. `M 0.00 84.50 L 480.00 26.00`.
    pub fn to_path_data(&self) -> String {
        let mut out = String::new();
        for (i, cmd) in self.commands.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            let (op, (x, y)) = match cmd {
                PathCommand::MoveTo { .. } => ('M', cmd.point()),
                PathCommand::LineTo { .. } => ('L', cmd.point()),
            };
            let _ = write!(out, "{op} {x:.2} {y:.2}");
        }
        out
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.commands.iter().map(PathCommand::point)
    }
}

/// One projected frame.  Every series is `None` when there is not enough
/// data to draw, in which case the caller shows [`PLACEHOLDER_TEXT`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartProjection {
    pub ph: Option<Polyline>,
    pub moisture: Option<Polyline>,
    pub temperature: Option<Polyline>,
    /// Number of samples in the projected window.
    pub samples: usize,
}

impl ChartProjection {
    pub fn is_placeholder(&self) -> bool {
        self.ph.is_none() && self.moisture.is_none() && self.temperature.is_none()
    }

    pub fn series(&self, metric: Metric) -> Option<&Polyline> {
        match metric {
            Metric::Ph => self.ph.as_ref(),
            Metric::Moisture => self.moisture.as_ref(),
            Metric::Temperature => self.temperature.as_ref(),
            Metric::Battery => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Projector
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub struct ChartProjector {
    ranges: ChartRanges,
    geometry: ChartGeometry,
}

impl ChartProjector {
    pub fn new(ranges: ChartRanges, geometry: ChartGeometry) -> Self {
        Self { ranges, geometry }
    }

    pub fn geometry(&self) -> &ChartGeometry {
        &self.geometry
    }

    /// Project `records` (newest first, as the history buffer yields them).
    ///
    /// Only the newest [`CHART_WINDOW`] records are used.
    pub fn project(&self, records: &[HistoryRecord]) -> ChartProjection {
        let mut window: Vec<&HistoryRecord> = records.iter().take(CHART_WINDOW).collect();
        window.reverse();

        if window.len() < 2 {
            return ChartProjection {
                samples: window.len(),
                ..ChartProjection::default()
            };
        }

        let line = |metric| self.project_metric(metric, &window);
        ChartProjection {
            ph: line(Metric::Ph),
            moisture: line(Metric::Moisture),
            temperature: line(Metric::Temperature),
            samples: window.len(),
        }
    }

    fn project_metric(&self, metric: Metric, window: &[&HistoryRecord]) -> Option<Polyline> {
        let range = self.ranges.for_metric(metric)?;
        let plot_w = self.geometry.plot_width();
        let plot_h = self.geometry.plot_height();
        let last = (window.len() - 1) as f64;

        let commands = window
            .iter()
            .enumerate()
            .map(|(i, rec)| {
                let x = (i as f64 / last) * plot_w;
                let y = plot_h - range.normalize(rec.reading.value(metric)) * plot_h;
                if i == 0 {
                    PathCommand::MoveTo { x, y }
                } else {
                    PathCommand::LineTo { x, y }
                }
            })
            .collect();

        Some(Polyline { metric, commands })
    }

    /// Render a standalone SVG document for `projection`.
    pub fn render_svg(&self, projection: &ChartProjection, theme: Theme) -> String {
        let g = &self.geometry;
        let (background, text) = match theme {
            Theme::Light => ("#ffffff", "#6b7280"),
            Theme::Dark => ("#111827", "#9ca3af"),
        };

        let mut svg = String::new();
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}">"#,
            g.width, g.height
        );
        let _ = writeln!(
            svg,
            r#"  <rect width="100%" height="100%" fill="{background}" />"#
        );

        if projection.is_placeholder() {
            let _ = writeln!(
                svg,
                r#"  <text x="{}" y="{}" fill="{text}" text-anchor="middle">{PLACEHOLDER_TEXT}</text>"#,
                g.width / 2.0,
                g.height / 2.0
            );
        } else {
            let _ = writeln!(
                svg,
                r#"  <g transform="translate({}, {})">"#,
                g.margin, g.margin
            );
            for metric in CHARTED_METRICS {
                if let Some(line) = projection.series(metric) {
                    let _ = writeln!(
                        svg,
                        r#"    <path d="{}" fill="none" stroke="{}" stroke-width="2" stroke-linecap="round" />"#,
                        line.to_path_data(),
                        stroke_colour(metric)
                    );
                }
            }
            svg.push_str("  </g>\n");
        }

        svg.push_str("</svg>\n");
        svg
    }
}

/// Legend colour of a charted metric.
pub fn stroke_colour(metric: Metric) -> &'static str {
    match metric {
        Metric::Moisture => "#3b82f6",
        Metric::Ph => "#16a34a",
        Metric::Temperature => "#ef4444",
        Metric::Battery => "#6b7280",
    }
}
