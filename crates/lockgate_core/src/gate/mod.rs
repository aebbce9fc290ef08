//! lockgate_core::gate
//!
//! Pure semantics of the foreground authentication gate.
//! This module intentionally contains **no** runtime, UI or platform code.
//!
//! Key ideas:
//! - Four states; the curtain is up in every state but `Unlocked`
//! - Every authentication attempt is a *flight* tagged with a monotonic id
//! - A result is applied only while its flight is still the current one
//! - Transitions return ordered `Effect`s; the adapter layer performs them

mod engine;
mod event;
mod flight;
mod graph;
mod latch;
mod state;

pub use engine::{
    apply_result, available_events, begin_authentication, step, CurtainTransition, Effect, Step,
};
pub use event::{AuthError, AuthOutcome, EventKind, GateEvent, LifecycleEvent};
pub use flight::{FlightCounter, FlightId};
pub use graph::{transition_table, TransitionEdge, TransitionTable};
pub use latch::RevealLatch;
pub use state::{GateState, StateKind, ALL_STATE_KINDS};
