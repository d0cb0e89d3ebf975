//! Fuzz target: dashboard config loader
//!
//! Any JSON document either fails with a config error or yields a config
//! that passes validation.
//!
//! cargo fuzz run fuzz_config_json

#![no_main]

use libfuzzer_sys::fuzz_target;
use soil_dashboard::config::DashboardConfig;

fuzz_target!(|data: &[u8]| {
    let Ok(json) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(cfg) = DashboardConfig::from_json_str(json) {
        assert!(cfg.validate().is_ok());
        assert!(cfg.sample_interval_ms > 0);
    }
});
