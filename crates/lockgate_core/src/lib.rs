//! lockgate_core: runtime-agnostic semantics of the foreground authentication gate.
//!
//! Design goals:
//! - Pure, testable logic (no async runtime, no UI toolkit).
//! - Explicit types; every transition is a value the caller applies.
//! - Small, stable public API surface.

pub mod error;

/// Gate state machine, flight generations and transition table.
pub mod gate;
