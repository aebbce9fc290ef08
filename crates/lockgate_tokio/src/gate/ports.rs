//! Collaborators the gate drives but does not implement.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use lockgate_core::gate::{AuthOutcome, CurtainTransition};

/// Pending platform authentication.
///
/// May complete on any thread, or never.
pub type AuthFuture = Pin<Box<dyn Future<Output = AuthOutcome> + Send + 'static>>;

/// Opaque full-window overlay.
///
/// Calls are synchronous from the gate's perspective and must be idempotent; any
/// animation runs inside the implementation and is not awaited.
pub trait Curtain: Send + Sync + 'static {
    /// Raise the curtain as the frontmost, full-bounds, opaque surface.
    fn show(&self);

    fn hide(&self, transition: CurtainTransition);

    /// Toggle the "tap to unlock" affordance drawn on the curtain.
    fn set_unlock_enabled(&self, _enabled: bool) {}
}

/// Platform biometric / passcode verification.
pub trait Authenticator: Send + Sync + 'static {
    /// Synchronous probe: `Err(Unavailable)` when no method is configured.
    fn availability(&self) -> AuthOutcome {
        Ok(())
    }

    /// Start one verification. The gate never has two of its own flights pending.
    fn authenticate(&self) -> AuthFuture;
}

/// Persisted "lock when backgrounded" switch. Read once per event, never cached.
pub trait LockPreference: Send + Sync + 'static {
    fn get(&self) -> bool;
}

impl LockPreference for AtomicBool {
    fn get(&self) -> bool {
        self.load(Ordering::Acquire)
    }
}

impl<T: LockPreference + ?Sized> LockPreference for Arc<T> {
    fn get(&self) -> bool {
        (**self).get()
    }
}

/// Cloneable in-memory preference shared between the host and the gate.
#[derive(Debug, Clone, Default)]
pub struct SharedPreference(Arc<AtomicBool>);

impl SharedPreference {
    pub fn new(enabled: bool) -> Self {
        Self(Arc::new(AtomicBool::new(enabled)))
    }

    pub fn set(&self, enabled: bool) {
        self.0.store(enabled, Ordering::Release);
    }
}

impl LockPreference for SharedPreference {
    fn get(&self) -> bool {
        self.0.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_preference_is_read_through() {
        let pref = SharedPreference::new(true);
        let gate_side: Arc<dyn LockPreference> = Arc::new(pref.clone());

        assert!(gate_side.get());
        pref.set(false);
        assert!(!gate_side.get());
    }
}
