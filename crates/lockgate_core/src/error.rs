use std::borrow::Cow;
use std::fmt;
use thiserror::Error;

use crate::gate::AuthError;

/// Convenient result alias for lockgate_core.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Log/handling importance. Maps onto logging levels in the adapter layer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub enum Severity {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

/// Where an error came from (helps triage and routing).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Domain {
    Gate,
    Authentication,
    Config,
    Other,
}

/// Stable error "kind" for matching/branching.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ErrorKind {
    InvalidArgument,
    InvalidEvent,
    AuthDenied,
    AuthUnavailable,
    StaleResult,
    /// The gate behind a handle is gone.
    Closed,
    Other,
}

/// Optional structured payload for rich context without forcing allocation.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Payload {
    None,

    /// Gate-specific context: the state an event was rejected in.
    GateEvent { from_state: u8, event: u8 },

    /// Authentication flight the error refers to.
    Flight(u64),
}

/// The one error type that crosses module boundaries in lockgate_core.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
#[error("{severity:?}: {message}")]
pub struct CoreError {
    pub domain: Domain,
    pub kind: ErrorKind,
    pub severity: Severity,
    pub message: Cow<'static, str>,
    pub payload: Payload,
}

impl CoreError {
    // ---------------- Fluent entry points ----------------

    #[inline]
    pub fn trace() -> ErrB {
        ErrB::new(Severity::Trace)
    }
    #[inline]
    pub fn debug() -> ErrB {
        ErrB::new(Severity::Debug)
    }
    #[inline]
    pub fn info() -> ErrB {
        ErrB::new(Severity::Info)
    }
    #[inline]
    pub fn warn() -> ErrB {
        ErrB::new(Severity::Warn)
    }
    #[inline]
    pub fn error() -> ErrB {
        ErrB::new(Severity::Error)
    }

    /// An event that the current gate state does not accept.
    pub fn invalid_gate_event(from_state: u8, event: u8) -> Self {
        CoreError::debug()
            .domain(Domain::Gate)
            .kind(ErrorKind::InvalidEvent)
            .msg("event not accepted in current gate state")
            .payload(Payload::GateEvent { from_state, event })
            .build()
    }

    /// A flight that completed with a failure.
    ///
    /// Denial is routine (wrong finger, user cancel); unavailability needs the user to
    /// change device settings, so it is louder.
    pub fn authentication_failed(flight: u64, failure: AuthError) -> Self {
        let b = match failure {
            AuthError::Denied => CoreError::info().kind(ErrorKind::AuthDenied),
            AuthError::Unavailable => CoreError::warn().kind(ErrorKind::AuthUnavailable),
        };
        b.domain(Domain::Authentication)
            .msgf(format_args!("authentication failed: {failure}"))
            .payload(Payload::Flight(flight))
            .build()
    }

    /// A completion for a flight that is no longer current.
    ///
    /// Never surfaced to the user; produced for diagnostics only.
    pub fn stale_result(flight: u64) -> Self {
        CoreError::trace()
            .domain(Domain::Authentication)
            .kind(ErrorKind::StaleResult)
            .msg("discarded authentication result for superseded flight")
            .payload(Payload::Flight(flight))
            .build()
    }
}

/// Fluent builder that behaves like iterator chains (takes self, returns Self).
/// Defaults:
/// - domain = Other
/// - kind = Other
/// - message = ""
/// - payload = None
#[derive(Debug, Clone)]
pub struct ErrB {
    domain: Domain,
    kind: ErrorKind,
    severity: Severity,
    message: Cow<'static, str>,
    payload: Payload,
}

impl ErrB {
    #[inline]
    fn new(severity: Severity) -> Self {
        Self {
            domain: Domain::Other,
            kind: ErrorKind::Other,
            severity,
            message: Cow::Borrowed(""),
            payload: Payload::None,
        }
    }

    #[inline]
    pub fn domain(mut self, d: Domain) -> Self {
        self.domain = d;
        self
    }

    #[inline]
    pub fn kind(mut self, k: ErrorKind) -> Self {
        self.kind = k;
        self
    }

    #[inline]
    pub fn msg(mut self, m: impl Into<Cow<'static, str>>) -> Self {
        self.message = m.into();
        self
    }

    /// Formatting-friendly message setter.
    #[inline]
    pub fn msgf(mut self, args: fmt::Arguments<'_>) -> Self {
        self.message = Cow::Owned(args.to_string());
        self
    }

    /// Only one payload: this replaces any previous payload.
    #[inline]
    pub fn payload(mut self, p: Payload) -> Self {
        self.payload = p;
        self
    }

    #[inline]
    pub fn build(self) -> CoreError {
        CoreError {
            domain: self.domain,
            kind: self.kind,
            severity: self.severity,
            message: self.message,
            payload: self.payload,
        }
    }
}

impl From<ErrB> for CoreError {
    fn from(b: ErrB) -> Self {
        b.build()
    }
}
