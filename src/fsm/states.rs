//! Concrete link-state handlers and table builder.
//!
//! ```text
//!  DISCONNECTED ──[connect]──▶ CONNECTING ──[paired]──▶ CONNECTED
//!       ▲  (sampling on)          │ (sampling on)          │ (sampling off)
//!       │                  [failed / cancel]               │
//!       └─────────────────────────┴──[disconnect / lost]───┘
//! ```

use log::{info, warn};

use super::context::{LinkAction, LinkContext};
use super::{LinkEvent, LinkState, StateDescriptor};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; LinkState::COUNT] {
    [
        // Index 0: Disconnected
        StateDescriptor {
            id: LinkState::Disconnected,
            name: "Disconnected",
            on_enter: Some(disconnected_enter),
            on_exit: None,
            on_event: disconnected_event,
        },
        // Index 1: Connecting
        StateDescriptor {
            id: LinkState::Connecting,
            name: "Connecting",
            on_enter: Some(connecting_enter),
            on_exit: None,
            on_event: connecting_event,
        },
        // Index 2: Connected
        StateDescriptor {
            id: LinkState::Connected,
            name: "Connected",
            on_enter: Some(connected_enter),
            on_exit: Some(connected_exit),
            on_event: connected_event,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  DISCONNECTED
// ═══════════════════════════════════════════════════════════════════════════

fn disconnected_enter(ctx: &mut LinkContext) {
    ctx.start_sampling();
}

fn disconnected_event(ctx: &mut LinkContext) -> Option<LinkState> {
    match ctx.event? {
        LinkEvent::ConnectRequested => Some(LinkState::Connecting),
        _ => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  CONNECTING
// ═══════════════════════════════════════════════════════════════════════════

fn connecting_enter(ctx: &mut LinkContext) {
    // Simulated samples keep flowing until a link is actually up.
    ctx.push(LinkAction::RequestDevice);
}

fn connecting_event(ctx: &mut LinkContext) -> Option<LinkState> {
    match ctx.event? {
        LinkEvent::Connected => Some(LinkState::Connected),
        LinkEvent::PairingFailed => {
            warn!("Pairing failed, staying on simulated data");
            Some(LinkState::Disconnected)
        }
        LinkEvent::DisconnectRequested | LinkEvent::ConnectionLost => {
            Some(LinkState::Disconnected)
        }
        LinkEvent::ConnectRequested => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  CONNECTED
// ═══════════════════════════════════════════════════════════════════════════

fn connected_enter(ctx: &mut LinkContext) {
    ctx.stop_sampling();
}

fn connected_exit(ctx: &mut LinkContext) {
    ctx.push(LinkAction::ReleaseDevice);
}

fn connected_event(ctx: &mut LinkContext) -> Option<LinkState> {
    match ctx.event? {
        LinkEvent::DisconnectRequested => Some(LinkState::Disconnected),
        LinkEvent::ConnectionLost => {
            info!("Device link lost, resuming simulated data");
            Some(LinkState::Disconnected)
        }
        _ => None,
    }
}
