//! Point-in-time view of the gate for diagnostics and host UI.

use lockgate_core::gate::{AuthError, EventKind, FlightId, GateState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateStatus {
    pub name: String,
    pub state: GateState,
    pub label: &'static str,
    pub flight: Option<FlightId>,
    pub flights_issued: u64,
    pub last_failure: Option<AuthError>,
    pub curtain_up: bool,
    pub available_events: Vec<EventKind>,
}
