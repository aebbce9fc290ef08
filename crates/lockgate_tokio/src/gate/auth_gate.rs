use std::sync::{Arc, Weak};

use lockgate_core::error::{CoreError, Domain, ErrorKind, Result};
use lockgate_core::gate::{
    available_events, step, AuthError, Effect, EventKind, FlightCounter, FlightId, GateEvent,
    GateState, LifecycleEvent, RevealLatch, Step,
};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::handle::HandleGuard;
use super::relay::{FlightRelay, Inbound};
use super::{
    AuthResult, Authenticator, Curtain, GateConfig, GateHandle, GateInput, GateStatus,
    GateTransition, LockPreference,
};
use crate::error::log_core_error;

/// Foreground authentication gate.
///
/// Responsibilities:
/// - Hold the gate state and the flight generation
/// - Raise/lower the curtain and the reveal latch on the transition path
/// - Start authenticator flights and apply their results on the owner's task
/// - Publish a transition stream for diagnostics
///
/// All methods take `&mut self`: the gate has exactly one owner. Authenticator
/// completions and inputs posted through a [`GateHandle`] land in one inbox and reach
/// the gate, in queue order, only through [`AuthGate::next_result`],
/// [`AuthGate::drain_results`] or [`AuthGate::run`].
pub struct AuthGate {
    config: GateConfig,
    state: GateState,
    flights: FlightCounter,
    last_failure: Option<AuthError>,

    curtain: Arc<dyn Curtain>,
    authenticator: Arc<dyn Authenticator>,
    preference: Arc<dyn LockPreference>,
    latch: Arc<RevealLatch>,

    relay: FlightRelay,
    handles: Weak<HandleGuard>,

    // broadcast so transitions never block on a slow subscriber; lagging receivers
    // drop old events.
    transitions: broadcast::Sender<GateTransition>,
}

/// Public API (host facing).
impl AuthGate {
    /// Create the gate for one root window.
    ///
    /// Starts `Unlocked` with the curtain down; nothing is shown until the host reports
    /// a lifecycle event. Must be called inside a tokio runtime.
    pub fn new(
        curtain: Arc<dyn Curtain>,
        authenticator: Arc<dyn Authenticator>,
        preference: Arc<dyn LockPreference>,
        config: GateConfig,
    ) -> Result<Self> {
        if config.name.is_empty() {
            return Err(CoreError::error()
                .domain(Domain::Config)
                .kind(ErrorKind::InvalidArgument)
                .msg("gate name must not be empty")
                .build());
        }
        if config.transition_buffer == 0 {
            return Err(CoreError::error()
                .domain(Domain::Config)
                .kind(ErrorKind::InvalidArgument)
                .msg("transition buffer must be non-zero")
                .build());
        }

        let (transitions, _rx) = broadcast::channel(config.transition_buffer);

        Ok(Self {
            config,
            state: GateState::Unlocked,
            flights: FlightCounter::new(),
            last_failure: None,
            curtain,
            authenticator,
            preference,
            latch: Arc::new(RevealLatch::new()),
            relay: FlightRelay::new(),
            handles: Weak::new(),
            transitions,
        })
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Failure of the last completed flight; cleared when a new flight starts or the
    /// gate unlocks.
    pub fn last_failure(&self) -> Option<AuthError> {
        self.last_failure
    }

    /// Shared latch that is revealed exactly while the gate is `Unlocked`.
    pub fn reveal_latch(&self) -> Arc<RevealLatch> {
        Arc::clone(&self.latch)
    }

    /// Handle for posting inputs from other tasks. All clones, and every handle
    /// obtained while one is still alive, count as one group for [`AuthGate::run`].
    pub fn input_handle(&mut self) -> GateHandle {
        let guard = match self.handles.upgrade() {
            Some(guard) => guard,
            None => {
                let guard = GateHandle::guard(self.relay.inbox());
                self.handles = Arc::downgrade(&guard);
                guard
            }
        };
        GateHandle::new(self.relay.inbox(), guard)
    }

    pub fn subscribe_transitions(&self) -> broadcast::Receiver<GateTransition> {
        self.transitions.subscribe()
    }

    pub fn status(&self) -> GateStatus {
        GateStatus {
            name: self.config.name.clone(),
            state: self.state,
            label: self.state.label(),
            flight: self.state.flight(),
            flights_issued: self.flights.issued(),
            last_failure: self.last_failure,
            curtain_up: self.state.curtain_required(),
            available_events: available_events(self.state.kind()).to_vec(),
        }
    }

    /// Report an application lifecycle transition.
    pub fn on_lifecycle(&mut self, event: LifecycleEvent) -> Result<GateState> {
        self.handle(event.into())
    }

    /// Report a tap on the curtain's unlock affordance.
    pub fn request_unlock(&mut self) -> Result<GateState> {
        self.handle(GateEvent::UserRequestedUnlock)
    }

    /// Apply a relayed authenticator result. Stale results change nothing.
    pub fn apply_auth_result(&mut self, result: AuthResult) -> GateState {
        let event = GateEvent::AuthenticationResult {
            flight: result.flight,
            outcome: result.outcome,
        };
        match self.handle(event) {
            Ok(state) => state,
            Err(err) => {
                // Results are never rejected by the transition table.
                log_core_error(err);
                self.state
            }
        }
    }

    /// Process one event to completion.
    pub fn handle(&mut self, event: GateEvent) -> Result<GateState> {
        // Preference is read per event, only for events whose handling depends on it.
        let lock_enabled = match event {
            GateEvent::Lifecycle(_) => self.preference.get(),
            _ => true,
        };

        let from = self.state;
        let step = step(from, event, lock_enabled, &mut self.flights)?;
        self.apply(event, from, step);
        Ok(self.state)
    }

    /// Wait for the next relayed authenticator result and apply it.
    ///
    /// Host inputs queued ahead of the result are applied first, in order. Pends
    /// forever while no flight completes.
    pub async fn next_result(&mut self) -> GateState {
        while let Some(inbound) = self.relay.recv().await {
            if let Dispatch::Result(state) = self.dispatch(inbound) {
                return state;
            }
        }
        // The relay holds a sender of the inbox, so it never closes.
        std::future::pending().await
    }

    /// Apply everything already queued, without waiting. Returns how many
    /// authenticator results were applied (stale ones included).
    pub fn drain_results(&mut self) -> usize {
        let mut applied = 0;
        while let Some(inbound) = self.relay.try_recv() {
            if let Dispatch::Result(_) = self.dispatch(inbound) {
                applied += 1;
            }
        }
        applied
    }

    /// Single-task event loop over the inbox: host inputs and relayed results, in
    /// arrival order.
    ///
    /// Returns the gate when the host posts `Shutdown` or drops every handle.
    pub async fn run(mut self) -> Self {
        info!(gate = %self.config.name, "gate event loop started");

        while let Some(inbound) = self.relay.recv().await {
            if let Dispatch::Stop = self.dispatch(inbound) {
                break;
            }
        }

        info!(gate = %self.config.name, state = self.state.label(), "gate event loop stopped");
        self
    }
}

/// What one inbox entry did.
enum Dispatch {
    Input,
    Result(GateState),
    Stop,
}

/// Inbox dispatch.
impl AuthGate {
    fn dispatch(&mut self, inbound: Inbound) -> Dispatch {
        let outcome = match inbound {
            Inbound::Result(result) => return Dispatch::Result(self.apply_auth_result(result)),
            Inbound::Input(GateInput::Shutdown) => return Dispatch::Stop,
            Inbound::HandlesDropped => {
                // A newer handle may have been handed out since.
                return match self.handles.upgrade() {
                    Some(_) => Dispatch::Input,
                    None => Dispatch::Stop,
                };
            }
            Inbound::Input(GateInput::Lifecycle(event)) => self.on_lifecycle(event),
            Inbound::Input(GateInput::UnlockRequested) => self.request_unlock(),
        };
        if let Err(err) = outcome {
            log_core_error(err);
        }
        Dispatch::Input
    }
}

/// Effect application.
impl AuthGate {
    fn apply(&mut self, event: GateEvent, from: GateState, step: Step) {
        let mut start = None;

        for effect in &step.effects {
            match *effect {
                Effect::ShowCurtain => {
                    // Latch first: nothing may export content once hiding has begun.
                    self.latch.conceal();
                    self.curtain.show();
                }
                Effect::HideCurtain(transition) => {
                    self.curtain.hide(transition);
                    self.latch.reveal();
                }
                Effect::StartAuthentication(flight) => start = Some(flight),
                Effect::DiscardStale(flight) => {
                    log_core_error(CoreError::stale_result(flight.get()));
                }
            }
        }

        let to = step.next;
        self.state = to;

        if let GateEvent::AuthenticationResult { flight, outcome } = event {
            if from == GateState::Authenticating(flight) {
                self.relay.settle(flight);
                self.last_failure = outcome.err();
            }
        }

        // Any flight retired by this step loses its relay.
        if self.relay.inflight().is_some() && self.relay.inflight() != self.flights.current() {
            self.relay.cancel();
        }

        if from != to {
            self.record_transition(event.kind(), from, to);
        }

        if let Some(flight) = start {
            self.start_flight(flight);
        }
    }

    fn record_transition(&mut self, event: EventKind, from: GateState, to: GateState) {
        let gate = self.config.name.as_str();

        match (from, to) {
            (_, GateState::Unlocked) => {
                self.last_failure = None;
                info!(gate, event = event.label(), from = from.label(), "gate unlocked");
            }
            (GateState::Unlocked, _) => {
                info!(gate, event = event.label(), to = to.label(), "gate locked");
            }
            (GateState::Authenticating(flight), GateState::AuthFailed) => {
                if let Some(failure) = self.last_failure {
                    log_core_error(CoreError::authentication_failed(flight.get(), failure));
                }
            }
            _ => {
                debug!(gate, event = event.label(), from = from.label(), to = to.label(), "gate transition");
            }
        }

        if to.curtain_required() {
            self.curtain
                .set_unlock_enabled(matches!(to, GateState::Locked | GateState::AuthFailed));
        }

        // Ignore errors (no receivers) to keep transitions non-blocking.
        let _ = self.transitions.send(GateTransition { event, from, to });
    }

    fn start_flight(&mut self, flight: FlightId) {
        let gate = self.config.name.as_str();

        match self.authenticator.availability() {
            Ok(()) => {
                self.last_failure = None;
                debug!(gate, %flight, "authentication flight started");
                self.relay.launch(flight, self.authenticator.authenticate());
            }
            Err(err) => {
                warn!(gate, %flight, error = %err, "authenticator not usable");
                self.relay.cancel();
                // Applied now so the host never observes a flight that cannot complete.
                self.apply_auth_result(AuthResult {
                    flight,
                    outcome: Err(err),
                });
            }
        }
    }
}
