//! Domain data model.
//!
//! A [`Reading`] is one snapshot of soil measurements plus the device
//! battery level.  Every reading that reaches the dashboard is stamped
//! into a [`HistoryRecord`].  Actuator toggles ([`Controls`]) and the
//! display [`Theme`] are session state that never derive from sensor data.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// One snapshot of soil/environment measurements.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Soil pH (dimensionless, 0–14).
    pub ph: f64,
    /// Volumetric soil moisture (%).
    pub moisture: f64,
    /// Soil temperature (°C).
    pub temperature: f64,
    /// Sensor battery charge (%).
    pub battery: f64,
}

impl Reading {
    pub const fn new(ph: f64, moisture: f64, temperature: f64, battery: f64) -> Self {
        Self {
            ph,
            moisture,
            temperature,
            battery,
        }
    }

    /// Value of a single metric.
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Ph => self.ph,
            Metric::Moisture => self.moisture,
            Metric::Temperature => self.temperature,
            Metric::Battery => self.battery,
        }
    }

    /// Display classification of `metric` against `bands`.
    /// `None` for metrics without a band (battery).
    pub fn status(&self, metric: Metric, bands: &DisplayBands) -> Option<MetricStatus> {
        bands
            .band(metric)
            .map(|(low, high)| MetricStatus::classify(self.value(metric), low, high))
    }
}

/// A reading stamped with its arrival time.  Never mutated once created.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoryRecord {
    /// Arrival time, epoch milliseconds.
    pub timestamp_ms: i64,
    pub reading: Reading,
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// The measurements carried by a [`Reading`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Ph,
    Moisture,
    Temperature,
    Battery,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Moisture,
        Metric::Ph,
        Metric::Temperature,
        Metric::Battery,
    ];

    /// Card label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Ph => "pH Level",
            Self::Moisture => "Moisture",
            Self::Temperature => "Temperature",
            Self::Battery => "Device Battery",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Self::Ph => "",
            Self::Moisture | Self::Battery => "%",
            Self::Temperature => "°C",
        }
    }

    /// Decimal places used on the sensor cards (pH 1, everything else 0).
    pub fn display_decimals(self) -> usize {
        match self {
            Self::Ph => 1,
            _ => 0,
        }
    }

    /// Format a value the way the sensor cards show it, e.g. `6.5` or `42%`.
    pub fn format_value(self, value: f64) -> String {
        format!("{:.*}{}", self.display_decimals(), value, self.unit())
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ph => write!(f, "pH"),
            Self::Moisture => write!(f, "moisture"),
            Self::Temperature => write!(f, "temperature"),
            Self::Battery => write!(f, "battery"),
        }
    }
}

/// `(low, high)` bands used to flag a card as Low / High.
///
/// The moisture floor and both pH edges follow the alert thresholds, so a
/// card reads Low or High whenever the matching alert would fire.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayBands {
    pub moisture: (f64, f64),
    pub ph: (f64, f64),
    pub temperature: (f64, f64),
}

impl Default for DisplayBands {
    fn default() -> Self {
        Self::from_thresholds(30.0, 5.5, 7.5)
    }
}

impl DisplayBands {
    /// Moisture ceiling (80 %) and the temperature band (10–35 °C) are fixed.
    pub const fn from_thresholds(moisture_low: f64, ph_low: f64, ph_high: f64) -> Self {
        Self {
            moisture: (moisture_low, 80.0),
            ph: (ph_low, ph_high),
            temperature: (10.0, 35.0),
        }
    }

    pub fn band(&self, metric: Metric) -> Option<(f64, f64)> {
        match metric {
            Metric::Moisture => Some(self.moisture),
            Metric::Ph => Some(self.ph),
            Metric::Temperature => Some(self.temperature),
            Metric::Battery => None,
        }
    }
}

/// Card status of a metric relative to its display band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricStatus {
    Low,
    Normal,
    High,
}

impl MetricStatus {
    /// Strictly below `low` is Low, strictly above `high` is High.
    pub fn classify(value: f64, low: f64, high: f64) -> Self {
        if value < low {
            Self::Low
        } else if value > high {
            Self::High
        } else {
            Self::Normal
        }
    }

    pub fn is_alarming(self) -> bool {
        self != Self::Normal
    }
}

impl fmt::Display for MetricStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Normal => write!(f, "Normal"),
            Self::High => write!(f, "High"),
        }
    }
}

// ---------------------------------------------------------------------------
// Controls
// ---------------------------------------------------------------------------

/// Simulated actuators exposed on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlName {
    Pump,
    Fan,
    Light,
}

impl ControlName {
    pub const ALL: [ControlName; 3] = [ControlName::Pump, ControlName::Fan, ControlName::Light];

    /// Wire name used in the actuator command string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pump => "pump",
            Self::Fan => "fan",
            Self::Light => "light",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Pump => "Water Pump",
            Self::Fan => "Ventilation Fan",
            Self::Light => "Grow Light",
        }
    }
}

impl fmt::Display for ControlName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ControlName {
    type Err = UnknownControl;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pump" => Ok(Self::Pump),
            "fan" => Ok(Self::Fan),
            "light" => Ok(Self::Light),
            _ => Err(UnknownControl),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownControl;

impl fmt::Display for UnknownControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown control (expected pump, fan or light)")
    }
}

/// On/off flags for every [`ControlName`].  All off at session start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controls {
    pump: bool,
    fan: bool,
    light: bool,
}

impl Controls {
    pub fn is_on(&self, name: ControlName) -> bool {
        match name {
            ControlName::Pump => self.pump,
            ControlName::Fan => self.fan,
            ControlName::Light => self.light,
        }
    }

    /// Flip one control and return its new state.
    pub fn toggle(&mut self, name: ControlName) -> bool {
        let slot = match name {
            ControlName::Pump => &mut self.pump,
            ControlName::Fan => &mut self.fan,
            ControlName::Light => &mut self.light,
        };
        *slot = !*slot;
        *slot
    }

    /// Command string a connected device would receive, e.g. `pump:on`.
    pub fn command_string(&self, name: ControlName) -> String {
        format!("{}:{}", name, if self.is_on(name) { "on" } else { "off" })
    }
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Light => write!(f, "light"),
            Self::Dark => write!(f, "dark"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_uses_strict_bounds() {
        let bands = DisplayBands::default();
        let r = Reading::new(5.5, 80.0, 35.0, 50.0);
        assert_eq!(r.status(Metric::Ph, &bands), Some(MetricStatus::Normal));
        assert_eq!(r.status(Metric::Moisture, &bands), Some(MetricStatus::Normal));
        assert_eq!(r.status(Metric::Temperature, &bands), Some(MetricStatus::Normal));
        assert_eq!(r.status(Metric::Battery, &bands), None);

        let dry = Reading::new(8.1, 12.0, 4.0, 50.0);
        assert_eq!(dry.status(Metric::Ph, &bands), Some(MetricStatus::High));
        assert_eq!(dry.status(Metric::Moisture, &bands), Some(MetricStatus::Low));
        assert_eq!(dry.status(Metric::Temperature, &bands), Some(MetricStatus::Low));
    }

    #[test]
    fn bands_follow_thresholds() {
        let bands = DisplayBands::from_thresholds(50.0, 6.0, 7.0);
        let r = Reading::new(7.2, 45.0, 20.0, 50.0);
        assert_eq!(r.status(Metric::Moisture, &bands), Some(MetricStatus::Low));
        assert_eq!(r.status(Metric::Ph, &bands), Some(MetricStatus::High));
        assert_eq!(
            r.status(Metric::Moisture, &DisplayBands::default()),
            Some(MetricStatus::Normal)
        );
    }

    #[test]
    fn card_formatting() {
        assert_eq!(Metric::Ph.format_value(6.54), "6.5");
        assert_eq!(Metric::Moisture.format_value(41.6), "42%");
        assert_eq!(Metric::Temperature.format_value(24.2), "24°C");
    }

    #[test]
    fn controls_toggle_independently() {
        let mut c = Controls::default();
        assert!(c.toggle(ControlName::Fan));
        assert!(c.is_on(ControlName::Fan));
        assert!(!c.is_on(ControlName::Pump));
        assert!(!c.is_on(ControlName::Light));
        assert_eq!(c.command_string(ControlName::Fan), "fan:on");
        assert!(!c.toggle(ControlName::Fan));
        assert_eq!(c.command_string(ControlName::Fan), "fan:off");
    }

    #[test]
    fn control_names_parse() {
        assert_eq!("Pump".parse::<ControlName>(), Ok(ControlName::Pump));
        assert_eq!(" light ".parse::<ControlName>(), Ok(ControlName::Light));
        assert!("heater".parse::<ControlName>().is_err());
    }

    #[test]
    fn theme_toggles_and_serializes_lowercase() {
        assert_eq!(Theme::default(), Theme::Light);
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(serde_json::to_string(&Theme::Dark).unwrap(), "\"dark\"");
    }
}
