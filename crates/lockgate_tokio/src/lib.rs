//! lockgate_tokio
//!
//! Tokio adapter for the foreground authentication gate.
//! Owns the gate state, drives the curtain and authenticator ports, and relays
//! authenticator completions back onto the owning task, while keeping transition
//! semantics in `lockgate_core`.

// Public modules
pub mod error;

pub mod gate;

// Re-export core types that gate users will commonly need
pub use lockgate_core::error::{CoreError, Result};
pub use lockgate_core::gate::{
    AuthError, AuthOutcome, CurtainTransition, FlightId, GateState, LifecycleEvent, RevealLatch,
};
