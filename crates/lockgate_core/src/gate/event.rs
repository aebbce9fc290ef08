use thiserror::Error;

use super::FlightId;

/// Application lifecycle transitions reported by the host.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LifecycleEvent {
    LaunchCompleted,
    EnteredBackground,
    EnteredForeground,
}

/// Why an authentication flight did not succeed.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Error)]
pub enum AuthError {
    /// Challenge failed: wrong biometric, wrong passcode, or the user cancelled.
    #[error("authentication denied")]
    Denied,
    /// No authentication method is configured on the device.
    #[error("no authentication method available")]
    Unavailable,
}

/// Outcome of one authentication flight.
pub type AuthOutcome = Result<(), AuthError>;

/// Everything the gate reacts to.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum GateEvent {
    Lifecycle(LifecycleEvent),
    UserRequestedUnlock,
    AuthenticationResult { flight: FlightId, outcome: AuthOutcome },
}

/// Data-free mirror of [`GateEvent`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum EventKind {
    LaunchCompleted,
    EnteredBackground,
    EnteredForeground,
    UserRequestedUnlock,
    AuthSucceeded,
    AuthFailed,
}

impl From<LifecycleEvent> for GateEvent {
    fn from(ev: LifecycleEvent) -> Self {
        GateEvent::Lifecycle(ev)
    }
}

impl GateEvent {
    pub const fn kind(self) -> EventKind {
        match self {
            GateEvent::Lifecycle(LifecycleEvent::LaunchCompleted) => EventKind::LaunchCompleted,
            GateEvent::Lifecycle(LifecycleEvent::EnteredBackground) => EventKind::EnteredBackground,
            GateEvent::Lifecycle(LifecycleEvent::EnteredForeground) => EventKind::EnteredForeground,
            GateEvent::UserRequestedUnlock => EventKind::UserRequestedUnlock,
            GateEvent::AuthenticationResult { outcome: Ok(()), .. } => EventKind::AuthSucceeded,
            GateEvent::AuthenticationResult { outcome: Err(_), .. } => EventKind::AuthFailed,
        }
    }
}

impl EventKind {
    /// Internal, compact id used in error payloads.
    pub const fn id(self) -> u8 {
        match self {
            EventKind::LaunchCompleted => 1,
            EventKind::EnteredBackground => 2,
            EventKind::EnteredForeground => 3,
            EventKind::UserRequestedUnlock => 4,
            EventKind::AuthSucceeded => 5,
            EventKind::AuthFailed => 6,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            EventKind::LaunchCompleted => "launch_completed",
            EventKind::EnteredBackground => "entered_background",
            EventKind::EnteredForeground => "entered_foreground",
            EventKind::UserRequestedUnlock => "user_requested_unlock",
            EventKind::AuthSucceeded => "auth_succeeded",
            EventKind::AuthFailed => "auth_failed",
        }
    }
}
