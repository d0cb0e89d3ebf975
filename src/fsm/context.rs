//! Shared mutable context threaded through every link-state handler.
//!
//! Handlers read the pending [`LinkEvent`] from here and queue
//! [`LinkAction`]s for the dashboard service to carry out.  The context
//! also tracks whether the sampling timer is supposed to be running, so
//! start and stop requests stay idempotent.

use heapless::Vec as HVec;

use super::LinkEvent;

/// Most actions a single transition can queue (exit + enter).
pub const MAX_PENDING_ACTIONS: usize = 4;

/// Side effects requested by state handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkAction {
    StartSampling,
    StopSampling,
    /// Open the pairing prompt.
    RequestDevice,
    /// Close the link to the current device, if any.
    ReleaseDevice,
}

#[derive(Debug, Default)]
pub struct LinkContext {
    /// Event being handled; set only for the duration of `Fsm::handle`.
    pub event: Option<LinkEvent>,
    pending: HVec<LinkAction, MAX_PENDING_ACTIONS>,
    sampling_active: bool,
}

impl LinkContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the sampling timer should be running.
    pub fn sampling_active(&self) -> bool {
        self.sampling_active
    }

    /// Request the sampling timer.  No-op if already running.
    pub fn start_sampling(&mut self) {
        if !self.sampling_active {
            self.sampling_active = true;
            self.push(LinkAction::StartSampling);
        }
    }

    /// Stop the sampling timer.  No-op if not running.
    pub fn stop_sampling(&mut self) {
        if self.sampling_active {
            self.sampling_active = false;
            self.push(LinkAction::StopSampling);
        }
    }

    pub fn push(&mut self, action: LinkAction) {
        debug_assert!(!self.pending.is_full(), "link action queue overflow");
        let _ = self.pending.push(action);
    }

    /// Drain the queued actions in order.
    pub fn take_actions(&mut self) -> HVec<LinkAction, MAX_PENDING_ACTIONS> {
        core::mem::take(&mut self.pending)
    }
}
