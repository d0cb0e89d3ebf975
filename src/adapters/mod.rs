//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter    | Implements    | Connects to                      |
//! |------------|---------------|----------------------------------|
//! | `device`   | DevicePort    | Pairing stub (no radio)          |
//! | `log_sink` | EventSink     | `log` facade                     |
//! | `prefs`    | StoragePort   | JSON file / in-memory map        |
//! | `speech`   | SpeechPort    | External TTS program             |
//! | `time`     | -             | Wall clock (chrono)              |
//!
//! The text-generation adapter lives in [`crate::advice::gemini`] and the
//! sample generator in [`crate::sensors::simulated`].

pub mod device;
pub mod log_sink;
pub mod prefs;
pub mod speech;
pub mod time;
