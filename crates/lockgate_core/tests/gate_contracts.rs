use lockgate_core::error::ErrorKind;
use lockgate_core::gate::{
    apply_result, available_events, begin_authentication, step, AuthError, Effect, FlightCounter,
    FlightId, GateEvent, GateState, LifecycleEvent, ALL_STATE_KINDS,
};

/// Minimal driver: applies steps and tracks curtain visibility from effects.
struct Harness {
    state: GateState,
    flights: FlightCounter,
    curtain_up: bool,
    started: Vec<FlightId>,
}

impl Harness {
    fn new() -> Self {
        Self {
            state: GateState::Unlocked,
            flights: FlightCounter::new(),
            curtain_up: false,
            started: Vec::new(),
        }
    }

    fn feed(&mut self, event: GateEvent, lock_enabled: bool) {
        let s = step(self.state, event, lock_enabled, &mut self.flights).expect("event accepted");
        for effect in &s.effects {
            match effect {
                Effect::ShowCurtain => self.curtain_up = true,
                Effect::HideCurtain(_) => self.curtain_up = false,
                Effect::StartAuthentication(id) => {
                    assert!(self.curtain_up, "flight started with curtain down");
                    self.started.push(*id);
                }
                Effect::DiscardStale(_) => {}
            }
        }
        self.state = s.next;
        assert_eq!(self.curtain_up, self.state.curtain_required());
    }

    fn result(&mut self, flight: u64, outcome: Result<(), AuthError>) {
        self.feed(
            GateEvent::AuthenticationResult {
                flight: FlightId::new(flight),
                outcome,
            },
            true,
        );
    }
}

const LAUNCH: GateEvent = GateEvent::Lifecycle(LifecycleEvent::LaunchCompleted);
const BACKGROUND: GateEvent = GateEvent::Lifecycle(LifecycleEvent::EnteredBackground);
const FOREGROUND: GateEvent = GateEvent::Lifecycle(LifecycleEvent::EnteredForeground);

#[test]
fn launch_then_success_unlocks() {
    let mut h = Harness::new();
    h.feed(LAUNCH, true);
    assert_eq!(h.state, GateState::Authenticating(FlightId::new(1)));

    h.result(1, Ok(()));
    assert_eq!(h.state, GateState::Unlocked);
}

#[test]
fn background_before_result_keeps_gate_locked() {
    let mut h = Harness::new();
    h.feed(LAUNCH, true);
    h.feed(BACKGROUND, true);
    h.result(1, Ok(()));
    assert_eq!(h.state, GateState::Locked);
}

#[test]
fn stale_success_after_relock_is_ignored() {
    let mut h = Harness::new();
    h.feed(LAUNCH, true);
    h.feed(BACKGROUND, true);
    h.feed(FOREGROUND, true);
    assert_eq!(h.state, GateState::Authenticating(FlightId::new(2)));

    h.result(1, Ok(()));
    assert_eq!(h.state, GateState::Authenticating(FlightId::new(2)));

    h.result(2, Ok(()));
    assert_eq!(h.state, GateState::Unlocked);
}

#[test]
fn preference_off_unlocks_on_foreground_without_authentication() {
    let mut h = Harness::new();
    h.feed(LAUNCH, true);
    h.feed(BACKGROUND, true);
    assert_eq!(h.state, GateState::Locked);

    h.feed(FOREGROUND, false);
    assert_eq!(h.state, GateState::Unlocked);
    assert_eq!(h.started, vec![FlightId::new(1)]);
}

#[test]
fn repeated_unlock_requests_share_one_flight() {
    let mut h = Harness::new();
    h.feed(LAUNCH, true);
    h.feed(GateEvent::UserRequestedUnlock, true);
    h.feed(GateEvent::UserRequestedUnlock, true);
    assert_eq!(h.started.len(), 1);
}

#[test]
fn failure_then_retry_starts_next_flight() {
    let mut h = Harness::new();
    h.feed(LAUNCH, true);
    h.result(1, Err(AuthError::Denied));
    assert_eq!(h.state, GateState::AuthFailed);

    h.feed(GateEvent::UserRequestedUnlock, true);
    assert_eq!(h.state, GateState::Authenticating(FlightId::new(2)));
}

#[test]
fn lock_disabled_never_shows_curtain_or_authenticates() {
    let mut h = Harness::new();
    for event in [LAUNCH, BACKGROUND, FOREGROUND, BACKGROUND, FOREGROUND] {
        h.feed(event, false);
        assert!(!h.curtain_up);
    }
    assert!(h.started.is_empty());
    assert_eq!(h.state, GateState::Unlocked);
}

#[test]
fn results_outside_authenticating_are_discarded() {
    let mut flights = FlightCounter::new();
    for state in [GateState::Unlocked, GateState::Locked, GateState::AuthFailed] {
        let s = apply_result(state, FlightId::new(9), Ok(()), &mut flights);
        assert_eq!(s.next, state);
        assert_eq!(s.effects, vec![Effect::DiscardStale(FlightId::new(9))]);
    }
}

#[test]
fn begin_authentication_rejects_unlocked() {
    let mut flights = FlightCounter::new();
    let err = begin_authentication(GateState::Unlocked, &mut flights).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidEvent);
    assert_eq!(flights.issued(), 0);
}

#[test]
fn every_state_accepts_lifecycle_transitions() {
    for kind in ALL_STATE_KINDS {
        let events = available_events(kind);
        assert!(!events.is_empty());
        assert!(events.contains(&lockgate_core::gate::EventKind::EnteredBackground));
        assert!(events.contains(&lockgate_core::gate::EventKind::EnteredForeground));
    }
}
