//! Deterministic soil sample generator.
//!
//! Produces smooth, bounded readings from the wall clock so the dashboard
//! has something to show (and to alert on) before a device is paired:
//!
//! ```text
//!   pH          = base_ph       + sin(t / 20 000) · 0.5
//!   moisture    = base_moisture + sin(t / 15 000) · 20
//!   temperature = base_temp     + sin(t / 30 000) · 5
//!   battery     = 85 - (t mod 10 000) / 1 000
//! ```
//!
//! `t` is epoch milliseconds.  The base values come from a [`SimProfile`],
//! selectable via the `SOIL_SIM_PROFILE` env var.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::app::ports::SensorPort;
use crate::reading::Reading;

/// Env var selecting the simulation profile.
pub const PROFILE_ENV: &str = "SOIL_SIM_PROFILE";

/// Waveform centre points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimProfile {
    /// pH 6.5, moisture 60%, 25 °C.  Dips below 30% only rarely, never
    /// trips a pH alert.
    #[default]
    Nominal,
    /// Moisture centred at 25%: the low-moisture alert fires most of
    /// the time.
    Drought,
    /// pH centred at 5.2: the low-pH alert fires.
    Acidic,
    /// pH centred at 7.8: the high-pH alert fires.
    Alkaline,
}

impl SimProfile {
    pub fn from_str_lossy(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "drought" | "dry" => Self::Drought,
            "acidic" => Self::Acidic,
            "alkaline" => Self::Alkaline,
            _ => Self::Nominal,
        }
    }

    /// `(ph, moisture, temperature)` the waveforms oscillate around.
    pub fn centre(self) -> (f64, f64, f64) {
        match self {
            Self::Nominal => (6.5, 60.0, 25.0),
            Self::Drought => (6.5, 25.0, 31.0),
            Self::Acidic => (5.2, 60.0, 25.0),
            Self::Alkaline => (7.8, 60.0, 25.0),
        }
    }
}

impl fmt::Display for SimProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nominal => write!(f, "nominal"),
            Self::Drought => write!(f, "drought"),
            Self::Acidic => write!(f, "acidic"),
            Self::Alkaline => write!(f, "alkaline"),
        }
    }
}

/// Sample source used while no device is connected.
#[derive(Debug, Clone)]
pub struct SimulatedSoilSensor {
    profile: SimProfile,
    samples: u64,
}

impl SimulatedSoilSensor {
    pub fn new(profile: SimProfile) -> Self {
        Self {
            profile,
            samples: 0,
        }
    }

    /// Profile from `SOIL_SIM_PROFILE`, falling back to `default`.
    pub fn from_env(default: SimProfile) -> Self {
        let profile = std::env::var(PROFILE_ENV)
            .map(|s| SimProfile::from_str_lossy(&s))
            .unwrap_or(default);
        Self::new(profile)
    }

    pub fn profile(&self) -> SimProfile {
        self.profile
    }

    pub fn samples(&self) -> u64 {
        self.samples
    }

    /// The reading the generator yields at `now_ms`.  Pure.
    pub fn reading_at(&self, now_ms: i64) -> Reading {
        let (ph, moisture, temperature) = self.profile.centre();
        let t = now_ms as f64;
        Reading {
            ph: ph + (t / 20_000.0).sin() * 0.5,
            moisture: moisture + (t / 15_000.0).sin() * 20.0,
            temperature: temperature + (t / 30_000.0).sin() * 5.0,
            battery: 85.0 - now_ms.rem_euclid(10_000) as f64 / 1_000.0,
        }
    }
}

impl SensorPort for SimulatedSoilSensor {
    fn sample(&mut self, now_ms: i64) -> Reading {
        self.samples += 1;
        self.reading_at(now_ms)
    }
}
