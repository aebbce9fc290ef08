//! Gate transition events.
//!
//! Hosts and diagnostics subscribe to observe the gate without touching its state.

use lockgate_core::gate::{EventKind, GateState};

/// Emitted after every event that changed the gate state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateTransition {
    pub event: EventKind,
    pub from: GateState,
    pub to: GateState,
}
