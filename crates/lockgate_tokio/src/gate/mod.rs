//! lockgate_tokio::gate
//!
//! Application-facing gate API.
//!
//! The host injects lifecycle events and unlock requests; the gate performs curtain and
//! authenticator effects and applies authenticator results on its own task.

/// Re-export core gate types
pub use lockgate_core::gate::{EventKind, GateEvent, StateKind};

// Collaborator ports (curtain, authenticator, lock preference).
mod ports;
pub use ports::{AuthFuture, Authenticator, Curtain, LockPreference, SharedPreference};

// Gate configuration.
mod config;
pub use config::GateConfig;

// Flight relay: authenticator completions redelivered to the gate's owner.
mod relay;
pub use relay::AuthResult;

// Transition event stream.
mod events;
pub use events::GateTransition;

// Host-side input channel.
mod handle;
pub use handle::{GateHandle, GateInput};

// Introspection snapshot.
mod status;
pub use status::GateStatus;

// The gate itself.
mod auth_gate;
pub use auth_gate::AuthGate;
