use crate::error::{CoreError, Result};

use super::{AuthOutcome, EventKind, FlightCounter, FlightId, GateEvent, GateState, LifecycleEvent, StateKind};

/// How the curtain leaves the screen.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CurtainTransition {
    /// Gone in the same frame (preference turned off).
    Immediate,
    /// Brief cross-dissolve after a successful authentication.
    CrossDissolve,
}

/// Side effect requested by a transition, in the order it must be performed.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Effect {
    /// Raise the curtain. Always emitted before any flight is started.
    ShowCurtain,
    HideCurtain(CurtainTransition),
    /// Invoke the authenticator for this flight.
    StartAuthentication(FlightId),
    /// A result arrived for a flight that is no longer current; nothing changed.
    DiscardStale(FlightId),
}

/// Result of processing one event.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Step {
    pub next: GateState,
    pub effects: Vec<Effect>,
}

impl Step {
    fn stay(state: GateState) -> Self {
        Self {
            next: state,
            effects: Vec::new(),
        }
    }

    /// The flight this step starts, if any.
    pub fn started_flight(&self) -> Option<FlightId> {
        self.effects.iter().find_map(|effect| match effect {
            Effect::StartAuthentication(id) => Some(*id),
            _ => None,
        })
    }
}

/// Process one event against the current state.
///
/// `lock_enabled` is the preference value read by the caller while handling *this*
/// event; it is never cached across events.
///
/// Rejected events return `InvalidEvent` and leave the state untouched.
pub fn step(
    state: GateState,
    event: GateEvent,
    lock_enabled: bool,
    flights: &mut FlightCounter,
) -> Result<Step> {
    match event {
        GateEvent::Lifecycle(LifecycleEvent::LaunchCompleted) => {
            if state != GateState::Unlocked {
                return Err(rejected(state, event));
            }
            if lock_enabled {
                lock_and_authenticate(state, flights)
            } else {
                Ok(Step::stay(state))
            }
        }
        GateEvent::Lifecycle(LifecycleEvent::EnteredBackground) => {
            if lock_enabled {
                // The OS call may still complete; retiring the flight turns it into a no-op.
                flights.retire();
                Ok(Step {
                    next: GateState::Locked,
                    effects: vec![Effect::ShowCurtain],
                })
            } else {
                Ok(unlock_immediately(state, flights))
            }
        }
        GateEvent::Lifecycle(LifecycleEvent::EnteredForeground) => {
            if lock_enabled {
                lock_and_authenticate(state, flights)
            } else {
                Ok(unlock_immediately(state, flights))
            }
        }
        GateEvent::UserRequestedUnlock => begin_authentication(state, flights),
        GateEvent::AuthenticationResult { flight, outcome } => {
            Ok(apply_result(state, flight, outcome, flights))
        }
    }
}

/// Start a new flight from `Locked` or `AuthFailed`.
///
/// Already `Authenticating`: returns an empty step, the outstanding flight is kept.
pub fn begin_authentication(state: GateState, flights: &mut FlightCounter) -> Result<Step> {
    match state {
        GateState::Locked | GateState::AuthFailed => {
            let id = flights.issue();
            Ok(Step {
                next: GateState::Authenticating(id),
                effects: vec![Effect::StartAuthentication(id)],
            })
        }
        GateState::Authenticating(_) => Ok(Step::stay(state)),
        GateState::Unlocked => Err(rejected(state, GateEvent::UserRequestedUnlock)),
    }
}

/// Apply the outcome of `flight`.
///
/// Only applied while the gate is `Authenticating(flight)`; anything else is stale and
/// produces a single `DiscardStale` effect.
pub fn apply_result(
    state: GateState,
    flight: FlightId,
    outcome: AuthOutcome,
    flights: &mut FlightCounter,
) -> Step {
    if state != GateState::Authenticating(flight) || !flights.is_current(flight) {
        return Step {
            next: state,
            effects: vec![Effect::DiscardStale(flight)],
        };
    }

    flights.retire();
    match outcome {
        Ok(()) => Step {
            next: GateState::Unlocked,
            effects: vec![Effect::HideCurtain(CurtainTransition::CrossDissolve)],
        },
        // No automatic retry for either failure kind; the curtain stays up.
        Err(_) => Step::stay(GateState::AuthFailed),
    }
}

/// Events a state accepts and may act on.
///
/// Results for flights that are not outstanding are accepted everywhere but only ever
/// discarded, so they are listed for `Authenticating` alone.
pub fn available_events(kind: StateKind) -> &'static [EventKind] {
    use EventKind::*;

    match kind {
        StateKind::Unlocked => &[LaunchCompleted, EnteredBackground, EnteredForeground],
        StateKind::Locked | StateKind::AuthFailed => {
            &[EnteredBackground, EnteredForeground, UserRequestedUnlock]
        }
        StateKind::Authenticating => &[
            EnteredBackground,
            EnteredForeground,
            UserRequestedUnlock,
            AuthSucceeded,
            EventKind::AuthFailed,
        ],
    }
}

fn lock_and_authenticate(state: GateState, flights: &mut FlightCounter) -> Result<Step> {
    // A flight that is still outstanding is reused; never two at once.
    if let GateState::Authenticating(_) = state {
        return Ok(Step {
            next: state,
            effects: vec![Effect::ShowCurtain],
        });
    }

    let mut step = begin_authentication(GateState::Locked, flights)?;
    step.effects.insert(0, Effect::ShowCurtain);
    Ok(step)
}

fn unlock_immediately(state: GateState, flights: &mut FlightCounter) -> Step {
    flights.retire();
    let effects = if state.curtain_required() {
        vec![Effect::HideCurtain(CurtainTransition::Immediate)]
    } else {
        Vec::new()
    };
    Step {
        next: GateState::Unlocked,
        effects,
    }
}

fn rejected(state: GateState, event: GateEvent) -> CoreError {
    CoreError::invalid_gate_event(state.id(), event.kind().id())
}

//
// Tests
//

/// Unit tests for the gate transition functions.
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Domain, ErrorKind, Payload};
    use crate::gate::AuthError;

    const BACKGROUND: GateEvent = GateEvent::Lifecycle(LifecycleEvent::EnteredBackground);
    const FOREGROUND: GateEvent = GateEvent::Lifecycle(LifecycleEvent::EnteredForeground);
    const LAUNCH: GateEvent = GateEvent::Lifecycle(LifecycleEvent::LaunchCompleted);

    fn result(flight: FlightId, outcome: AuthOutcome) -> GateEvent {
        GateEvent::AuthenticationResult { flight, outcome }
    }

    #[test]
    fn launch_with_lock_raises_curtain_before_first_flight() {
        let mut flights = FlightCounter::new();
        let s = step(GateState::Unlocked, LAUNCH, true, &mut flights).unwrap();

        assert_eq!(s.next, GateState::Authenticating(FlightId::new(1)));
        assert_eq!(
            s.effects,
            vec![
                Effect::ShowCurtain,
                Effect::StartAuthentication(FlightId::new(1))
            ]
        );
    }

    #[test]
    fn launch_without_lock_stays_unlocked() {
        let mut flights = FlightCounter::new();
        let s = step(GateState::Unlocked, LAUNCH, false, &mut flights).unwrap();
        assert_eq!(s.next, GateState::Unlocked);
        assert!(s.effects.is_empty());
        assert_eq!(flights.issued(), 0);
    }

    #[test]
    fn second_launch_is_rejected_with_payload() {
        let mut flights = FlightCounter::new();
        let e = step(GateState::Locked, LAUNCH, true, &mut flights).unwrap_err();
        assert_eq!(e.kind, ErrorKind::InvalidEvent);
        assert_eq!(e.domain, Domain::Gate);
        assert_eq!(
            e.payload,
            Payload::GateEvent {
                from_state: GateState::Locked.id(),
                event: EventKind::LaunchCompleted.id(),
            }
        );
    }

    #[test]
    fn background_retires_outstanding_flight() {
        let mut flights = FlightCounter::new();
        let first = flights.issue();

        let s = step(GateState::Authenticating(first), BACKGROUND, true, &mut flights).unwrap();
        assert_eq!(s.next, GateState::Locked);
        assert_eq!(s.effects, vec![Effect::ShowCurtain]);
        assert!(flights.current().is_none());

        let late = apply_result(s.next, first, Ok(()), &mut flights);
        assert_eq!(late.next, GateState::Locked);
        assert_eq!(late.effects, vec![Effect::DiscardStale(first)]);
    }

    #[test]
    fn background_without_lock_hides_curtain_immediately() {
        let mut flights = FlightCounter::new();
        let s = step(GateState::AuthFailed, BACKGROUND, false, &mut flights).unwrap();
        assert_eq!(s.next, GateState::Unlocked);
        assert_eq!(
            s.effects,
            vec![Effect::HideCurtain(CurtainTransition::Immediate)]
        );
    }

    #[test]
    fn foreground_while_authenticating_keeps_the_flight() {
        let mut flights = FlightCounter::new();
        let first = flights.issue();

        let s = step(GateState::Authenticating(first), FOREGROUND, true, &mut flights).unwrap();
        assert_eq!(s.next, GateState::Authenticating(first));
        assert_eq!(s.started_flight(), None);
        assert_eq!(flights.issued(), 1);
    }

    #[test]
    fn unlock_request_is_idempotent_while_authenticating() {
        let mut flights = FlightCounter::new();
        let first = flights.issue();
        let state = GateState::Authenticating(first);

        for _ in 0..2 {
            let s = step(state, GateEvent::UserRequestedUnlock, true, &mut flights).unwrap();
            assert_eq!(s.next, state);
            assert!(s.effects.is_empty());
        }
        assert_eq!(flights.issued(), 1);
    }

    #[test]
    fn unlock_request_while_unlocked_is_rejected() {
        let mut flights = FlightCounter::new();
        let e = step(GateState::Unlocked, GateEvent::UserRequestedUnlock, true, &mut flights)
            .unwrap_err();
        assert_eq!(e.kind, ErrorKind::InvalidEvent);
    }

    #[test]
    fn success_dissolves_curtain() {
        let mut flights = FlightCounter::new();
        let id = flights.issue();
        let s = step(GateState::Authenticating(id), result(id, Ok(())), true, &mut flights).unwrap();
        assert_eq!(s.next, GateState::Unlocked);
        assert_eq!(
            s.effects,
            vec![Effect::HideCurtain(CurtainTransition::CrossDissolve)]
        );
    }

    #[test]
    fn failures_keep_curtain_and_never_retry() {
        for err in [AuthError::Denied, AuthError::Unavailable] {
            let mut flights = FlightCounter::new();
            let id = flights.issue();
            let s = apply_result(GateState::Authenticating(id), id, Err(err), &mut flights);
            assert_eq!(s.next, GateState::AuthFailed);
            assert!(s.effects.is_empty());
            assert!(flights.current().is_none());
        }
    }

    #[test]
    fn available_events_test() {
        let events = available_events(StateKind::Locked);

        assert_eq!(events.len(), 3);
        assert!(events.contains(&EventKind::UserRequestedUnlock));
        assert!(!events.contains(&EventKind::LaunchCompleted));
        assert!(!events.contains(&EventKind::AuthSucceeded));
    }
}
