//! Function-pointer finite state machine for the device link.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  StateTable                                                  │
//! │  ┌──────────────┬───────────┬──────────┬───────────────────┐ │
//! │  │ LinkState    │ on_enter  │ on_exit  │ on_event          │ │
//! │  ├──────────────┼───────────┼──────────┼───────────────────┤ │
//! │  │ Disconnected │ fn(ctx)   │ -        │ fn(ctx)->Option<> │ │
//! │  │ Connecting   │ fn(ctx)   │ -        │ fn(ctx)->Option<> │ │
//! │  │ Connected    │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Option<> │ │
//! │  └──────────────┴───────────┴──────────┴───────────────────┘ │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine is event driven: [`Fsm::handle`] posts a [`LinkEvent`] into
//! the context and calls `on_event` for the **current** state.  If it
//! returns `Some(next)`, the engine runs `on_exit` for the current state,
//! then `on_enter` for the next.  Enter/exit actions queue
//! [`LinkAction`](context::LinkAction)s that the dashboard service turns
//! into effects.

pub mod context;
pub mod states;

use core::fmt;

use context::LinkContext;
use log::{debug, info};

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Connection status of the dashboard.
/// Must stay in sync with the table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LinkState {
    Disconnected = 0,
    Connecting = 1,
    Connected = 2,
}

impl LinkState {
    /// Total number of states: used to size the table array.
    pub const COUNT: usize = 3;

    /// Convert an index back to `LinkState`.  Panics on out-of-range in
    /// debug builds; returns `Disconnected` in release.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Disconnected,
            1 => Self::Connecting,
            2 => Self::Connected,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::Disconnected
            }
        }
    }
}

impl fmt::Display for LinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "disconnected"),
            Self::Connecting => write!(f, "connecting"),
            Self::Connected => write!(f, "connected"),
        }
    }
}

/// Inputs to the link state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkEvent {
    /// The user asked to pair a device.
    ConnectRequested,
    /// Pairing and link setup succeeded.
    Connected,
    /// No pairing capability, the user cancelled, or the link failed.
    PairingFailed,
    /// The user asked to drop the link.
    DisconnectRequested,
    /// The device went away on its own.
    ConnectionLost,
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
pub type StateActionFn = fn(&mut LinkContext);

/// Signature for the event handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type StateEventFn = fn(&mut LinkContext) -> Option<LinkState>;

/// Static descriptor for a single link state.
pub struct StateDescriptor {
    pub id: LinkState,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_event: StateEventFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

pub struct Fsm {
    /// Fixed-size table indexed by `LinkState as usize`.
    table: [StateDescriptor; LinkState::COUNT],
    current: usize,
}

impl Fsm {
    pub fn new(table: [StateDescriptor; LinkState::COUNT], initial: LinkState) -> Self {
        Self {
            table,
            current: initial as usize,
        }
    }

    /// Run the initial `on_enter` for the starting state.
    /// Call once after construction, before the first `handle()`.
    pub fn start(&mut self, ctx: &mut LinkContext) {
        info!("Link FSM starting in state: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Deliver one event.  Returns `(from, to)` if a transition happened.
    pub fn handle(
        &mut self,
        event: LinkEvent,
        ctx: &mut LinkContext,
    ) -> Option<(LinkState, LinkState)> {
        ctx.event = Some(event);
        let next = (self.table[self.current].on_event)(ctx);
        ctx.event = None;

        let Some(next) = next else {
            debug!(
                "Link FSM: {:?} ignored in {}",
                event, self.table[self.current].name
            );
            return None;
        };
        let from = self.current_state();
        self.transition(next, ctx);
        Some((from, next))
    }

    pub fn current_state(&self) -> LinkState {
        LinkState::from_index(self.current)
    }

    fn transition(&mut self, next: LinkState, ctx: &mut LinkContext) {
        let next_idx = next as usize;

        info!(
            "Link FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
