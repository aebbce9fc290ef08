use crate::error::Result;

use super::{
    available_events, step, AuthError, EventKind, FlightCounter, FlightId, GateEvent, GateState,
    LifecycleEvent, StateKind, ALL_STATE_KINDS,
};

/// Gate transition table derived from the transition functions.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TransitionTable {
    pub states: Vec<StateKind>,
    pub transitions: Vec<TransitionEdge>,
}

/// One row of the table.
///
/// `lock_enabled` is `None` for events whose handling does not read the preference.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TransitionEdge {
    pub start: StateKind,
    pub event: EventKind,
    pub lock_enabled: Option<bool>,
    pub goal: StateKind,
    pub starts_flight: bool,
}

/// Build the canonical gate transition table.
pub fn transition_table() -> Result<TransitionTable> {
    let mut transitions = Vec::new();

    for start in ALL_STATE_KINDS {
        for event in available_events(start) {
            let prefs: &[Option<bool>] = if reads_preference(*event) {
                &[Some(false), Some(true)]
            } else {
                &[None]
            };

            for lock_enabled in prefs {
                let mut flights = FlightCounter::new();
                let state = sample_state(start, &mut flights);
                let gate_event = sample_event(*event, state);
                let s = step(state, gate_event, lock_enabled.unwrap_or(true), &mut flights)?;
                transitions.push(TransitionEdge {
                    start,
                    event: *event,
                    lock_enabled: *lock_enabled,
                    goal: s.next.kind(),
                    starts_flight: s.started_flight().is_some(),
                });
            }
        }
    }

    Ok(TransitionTable {
        states: ALL_STATE_KINDS.to_vec(),
        transitions,
    })
}

fn reads_preference(event: EventKind) -> bool {
    matches!(
        event,
        EventKind::LaunchCompleted | EventKind::EnteredBackground | EventKind::EnteredForeground
    )
}

fn sample_state(kind: StateKind, flights: &mut FlightCounter) -> GateState {
    match kind {
        StateKind::Unlocked => GateState::Unlocked,
        StateKind::Locked => GateState::Locked,
        StateKind::Authenticating => GateState::Authenticating(flights.issue()),
        StateKind::AuthFailed => GateState::AuthFailed,
    }
}

fn sample_event(kind: EventKind, state: GateState) -> GateEvent {
    let flight = || state.flight().unwrap_or(FlightId::new(0));
    match kind {
        EventKind::LaunchCompleted => LifecycleEvent::LaunchCompleted.into(),
        EventKind::EnteredBackground => LifecycleEvent::EnteredBackground.into(),
        EventKind::EnteredForeground => LifecycleEvent::EnteredForeground.into(),
        EventKind::UserRequestedUnlock => GateEvent::UserRequestedUnlock,
        EventKind::AuthSucceeded => GateEvent::AuthenticationResult {
            flight: flight(),
            outcome: Ok(()),
        },
        EventKind::AuthFailed => GateEvent::AuthenticationResult {
            flight: flight(),
            outcome: Err(AuthError::Denied),
        },
    }
}
