//! Application core: session logic with no direct I/O.
//!
//! This module contains the rules of the soil dashboard: link-state
//! orchestration, history and alert bookkeeping, actuator toggles and the
//! advice slot.  All interaction with the outside world happens through
//! **port traits** defined in [`ports`], keeping this layer fully testable
//! without a network, speaker or device.

pub mod commands;
pub mod effects;
pub mod events;
pub mod ports;
pub mod runtime;
pub mod service;
