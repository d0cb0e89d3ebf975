//! Inbound commands to the dashboard service.
//!
//! These represent actions requested by the outside world (shell input,
//! the pairing adapter, the advice worker) that the
//! [`DashboardService`](super::service::DashboardService) interprets and
//! acts upon.

use crate::error::ServiceError;
use crate::reading::{ControlName, Reading};

use super::ports::DeviceHandle;

/// Commands that adapters can send into the dashboard core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// Pair and connect a sensor device.
    Connect,

    /// Pairing and link setup finished.
    DeviceConnected(DeviceHandle),

    /// Pairing failed or was cancelled.
    DeviceUnavailable,

    /// Drop the current device link (user request).
    Disconnect,

    /// The device link dropped on its own.
    ConnectionLost,

    /// A reading arrived from a connected device.
    ReadingReceived(Reading),

    /// Flip one simulated actuator.
    ToggleControl(ControlName),

    /// Switch between light and dark.
    ToggleTheme,

    /// Ask the advice service a question about the current reading.
    AskAdvice(String),

    /// The advice worker finished.
    AdviceResolved(Result<String, ServiceError>),

    /// Serialize the history to CSV.
    ExportCsv,
}
