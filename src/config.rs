//! Dashboard configuration parameters
//!
//! All tunable parameters for the soil dashboard.  Defaults reproduce the
//! stock dashboard; any subset can be overridden from a JSON file named by
//! `SOIL_DASHBOARD_CONFIG`.

use std::path::PathBuf;

use log::info;
use serde::{Deserialize, Serialize};

use crate::chart::{ChartGeometry, ChartRanges};
use crate::error::{Error, Result};
use crate::reading::DisplayBands;
use crate::sensors::simulated::SimProfile;

/// Environment variable naming an optional JSON override file.
pub const CONFIG_ENV: &str = "SOIL_DASHBOARD_CONFIG";

/// Longest accepted sampling period (one hour).
pub const MAX_SAMPLE_INTERVAL_MS: u64 = 3_600_000;

/// Core dashboard configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    // --- Timing ---
    /// Simulated sample period (milliseconds)
    pub sample_interval_ms: u64,

    // --- Alerts ---
    /// Minimum gap between two utterances of one alert message (ms)
    pub alert_cooldown_ms: i64,
    /// Moisture (%) below which the low-moisture alert fires
    pub moisture_low_threshold: f64,
    /// pH below which the low-pH alert fires
    pub ph_low_threshold: f64,
    /// pH above which the high-pH alert fires
    pub ph_high_threshold: f64,

    // --- Chart ---
    pub chart_ranges: ChartRanges,
    pub chart_geometry: ChartGeometry,

    // --- Device ---
    /// Advertised name the pairing prompt filters on
    pub device_filter: String,
    /// Whether the stub pairing adapter reports a device as available
    pub device_stub_available: bool,

    // --- Speech ---
    /// External text-to-speech program; `None` logs alerts only
    pub speech_program: Option<String>,

    // --- Advice ---
    pub advice: AdviceConfig,

    // --- Simulation ---
    pub sim_profile: SimProfile,

    // --- Files ---
    /// Preference store location
    pub prefs_path: PathBuf,
    /// Directory CSV exports are written to
    pub export_dir: PathBuf,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            // Timing
            sample_interval_ms: 2_000,

            // Alerts
            alert_cooldown_ms: 30_000,
            moisture_low_threshold: 30.0,
            ph_low_threshold: 5.5,
            ph_high_threshold: 7.5,

            // Chart
            chart_ranges: ChartRanges::default(),
            chart_geometry: ChartGeometry::default(),

            // Device
            device_filter: "SOIL-ESP32".into(),
            device_stub_available: false,

            // Speech
            speech_program: Some("espeak-ng".into()),

            advice: AdviceConfig::default(),
            sim_profile: SimProfile::default(),

            prefs_path: PathBuf::from("soil-dashboard-prefs.json"),
            export_dir: PathBuf::from("."),
        }
    }
}

/// Text-generation service parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdviceConfig {
    pub model: String,
    pub base_url: String,
    /// Sampling temperature
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl Default for AdviceConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".into(),
            base_url: "https://generativelanguage.googleapis.com".into(),
            temperature: 0.5,
            timeout_secs: 30,
        }
    }
}

impl DashboardConfig {
    /// Range-check every field.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_SAMPLE_INTERVAL_MS).contains(&self.sample_interval_ms) {
            return Err(Error::Config("sample_interval_ms must be within 1..=3600000"));
        }
        if self.alert_cooldown_ms < 0 {
            return Err(Error::Config("alert_cooldown_ms must not be negative"));
        }
        if self.ph_low_threshold >= self.ph_high_threshold {
            return Err(Error::Config("ph_low_threshold must be below ph_high_threshold"));
        }
        let r = &self.chart_ranges;
        for range in [r.ph, r.moisture, r.temperature] {
            if range.max <= range.min {
                return Err(Error::Config("chart range max must exceed min"));
            }
        }
        let g = &self.chart_geometry;
        if g.plot_width() <= 0.0 || g.plot_height() <= 0.0 {
            return Err(Error::Config("chart margins leave no plot area"));
        }
        if !(0.0..=2.0).contains(&self.advice.temperature) {
            return Err(Error::Config("advice temperature must be within 0..=2"));
        }
        if self.device_filter.is_empty() {
            return Err(Error::Config("device_filter must not be empty"));
        }
        Ok(())
    }

    /// Card bands whose edges match the alert thresholds.
    pub fn display_bands(&self) -> DisplayBands {
        DisplayBands::from_thresholds(
            self.moisture_low_threshold,
            self.ph_low_threshold,
            self.ph_high_threshold,
        )
    }

    /// Parse a (possibly partial) JSON override and validate it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|_| Error::Config("malformed JSON"))?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults, or the file named by [`CONFIG_ENV`] when set.
    pub fn load() -> Result<Self> {
        let Ok(path) = std::env::var(CONFIG_ENV) else {
            return Ok(Self::default());
        };
        let json =
            std::fs::read_to_string(&path).map_err(|_| Error::Config("config file unreadable"))?;
        let config = Self::from_json_str(&json)?;
        info!("Config loaded from {}", path);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_sane() {
        let c = DashboardConfig::default();
        assert!(c.validate().is_ok());
        assert_eq!(c.sample_interval_ms, 2_000);
        assert_eq!(c.alert_cooldown_ms, 30_000);
        assert!(c.ph_low_threshold < c.ph_high_threshold);
        assert_eq!(c.device_filter, "SOIL-ESP32");
        assert_eq!(c.advice.model, "gemini-2.5-flash");
    }

    #[test]
    fn serde_roundtrip() {
        let c = DashboardConfig::default();
        let json = serde_json::to_string(&c).unwrap();
        let c2: DashboardConfig = serde_json::from_str(&json).unwrap();
        assert!((c.moisture_low_threshold - c2.moisture_low_threshold).abs() < 0.001);
        assert_eq!(c.sample_interval_ms, c2.sample_interval_ms);
        assert_eq!(c.chart_ranges, c2.chart_ranges);
    }

    #[test]
    fn partial_override_keeps_defaults() {
        let c = DashboardConfig::from_json_str(r#"{ "sample_interval_ms": 500 }"#).unwrap();
        assert_eq!(c.sample_interval_ms, 500);
        assert_eq!(c.alert_cooldown_ms, 30_000);
        assert_eq!(c.advice.model, "gemini-2.5-flash");
    }

    #[test]
    fn inverted_ph_band_is_rejected() {
        let err = DashboardConfig::from_json_str(
            r#"{ "ph_low_threshold": 8.0, "ph_high_threshold": 6.0 }"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let c = DashboardConfig {
            sample_interval_ms: 0,
            ..DashboardConfig::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn oversized_interval_is_rejected() {
        assert_eq!(
            DashboardConfig::from_json_str(r#"{ "sample_interval_ms": 18446744073709551615 }"#)
                .unwrap_err(),
            Error::Config("sample_interval_ms must be within 1..=3600000")
        );
        let c = DashboardConfig {
            sample_interval_ms: MAX_SAMPLE_INTERVAL_MS + 1,
            ..DashboardConfig::default()
        };
        assert!(c.validate().is_err());
        let c = DashboardConfig {
            sample_interval_ms: MAX_SAMPLE_INTERVAL_MS,
            ..DashboardConfig::default()
        };
        assert!(c.validate().is_ok());
    }

    #[test]
    fn malformed_json_is_config_error() {
        assert_eq!(
            DashboardConfig::from_json_str("{ nope").unwrap_err(),
            Error::Config("malformed JSON")
        );
    }

    #[test]
    fn postcard_roundtrip() {
        let c = DashboardConfig::default();
        let bytes = postcard::to_allocvec(&c).unwrap();
        let c2: DashboardConfig = postcard::from_bytes(&bytes).unwrap();
        assert_eq!(c.sample_interval_ms, c2.sample_interval_ms);
        assert!((c.ph_high_threshold - c2.ph_high_threshold).abs() < 0.001);
    }
}
