//! Outbound application events.
//!
//! The [`DashboardService`](super::service::DashboardService) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  Adapters on
//! the other side decide what to do with them.

use crate::alerts::Alert;
use crate::fsm::LinkState;
use crate::reading::{ControlName, HistoryRecord, Theme};

/// Structured events emitted by the dashboard core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The service has started (carries initial link state and theme).
    Started { status: LinkState, theme: Theme },

    /// The link FSM transitioned between states.
    StatusChanged { from: LinkState, to: LinkState },

    /// A reading was stamped into history.
    ReadingRecorded(HistoryRecord),

    /// A threshold alert fired (after cooldown gating).
    AlertRaised(Alert),

    /// An actuator was toggled.  `command` is what a device would receive.
    ControlToggled {
        control: ControlName,
        on: bool,
        command: String,
    },

    ThemeChanged(Theme),

    /// A question went out to the advice service.
    AdviceRequested,

    /// The advice request finished; `fallback` if it failed.
    AdviceAnswered { fallback: bool },

    /// Pairing was unavailable or cancelled.
    DeviceUnavailable,

    /// History was exported.
    Exported { file_name: String, rows: usize },
}
