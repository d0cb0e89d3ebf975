//! Outbound side effects requested by the dashboard service.
//!
//! The service itself never speaks, pairs, persists or touches the
//! network.  Instead each call returns a list of [`Effect`]s that the
//! [`Runtime`](super::runtime::Runtime) carries out against its ports.

use crate::export::CsvExport;
use crate::reading::{Reading, Theme};

use super::ports::DeviceHandle;

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Arm the sampling timer (no-op if armed).
    StartSampling,
    /// Disarm the sampling timer.
    StopSampling,
    /// Voice a fixed alert string.  Fire-and-forget.
    Speak {
        text: &'static str,
        language: &'static str,
    },
    /// Open the pairing prompt for devices advertising `filter`.
    RequestDevice { filter: String },
    /// Close the link to `device`.
    DisconnectDevice(DeviceHandle),
    /// Run a text-generation request off the dispatcher thread.
    RequestAdvice { reading: Reading, question: String },
    /// Store the theme preference.
    PersistTheme(Theme),
    /// Write an export file.
    SaveExport(CsvExport),
    /// A one-line notice for the user.
    Notice(String),
}

pub type Effects = Vec<Effect>;
