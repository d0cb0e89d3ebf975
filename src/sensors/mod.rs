//! Sample sources.
//!
//! Every source implements [`SensorPort`](crate::app::ports::SensorPort).
//! Only the simulated generator exists today; a paired device would feed
//! readings in as `AppCommand::ReadingReceived` instead.

pub mod simulated;

pub use simulated::{SimProfile, SimulatedSoilSensor};
