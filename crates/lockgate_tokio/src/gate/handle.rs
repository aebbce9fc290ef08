use std::sync::Arc;

use lockgate_core::error::{CoreError, Domain, ErrorKind, Result};
use lockgate_core::gate::LifecycleEvent;
use tokio::sync::mpsc;

use super::relay::Inbound;

/// Inputs the host posts to a running gate.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum GateInput {
    Lifecycle(LifecycleEvent),
    UnlockRequested,
    /// Stop the event loop; the gate is handed back to the caller.
    Shutdown,
}

/// Cloneable, non-blocking sender used from the host's UI thread.
///
/// Created by [`super::AuthGate::input_handle`]. Inputs share the gate's inbox with
/// authenticator results, so everything is applied in the order it was queued.
#[derive(Debug, Clone)]
pub struct GateHandle {
    tx: mpsc::UnboundedSender<Inbound>,
    _guard: Arc<HandleGuard>,
}

/// Shared by every clone of one handle; tells the event loop when the last one goes.
#[derive(Debug)]
pub(crate) struct HandleGuard {
    tx: mpsc::UnboundedSender<Inbound>,
}

impl Drop for HandleGuard {
    fn drop(&mut self) {
        let _ = self.tx.send(Inbound::HandlesDropped);
    }
}

impl GateHandle {
    pub(crate) fn new(tx: mpsc::UnboundedSender<Inbound>, guard: Arc<HandleGuard>) -> Self {
        Self { tx, _guard: guard }
    }

    pub(crate) fn guard(tx: mpsc::UnboundedSender<Inbound>) -> Arc<HandleGuard> {
        Arc::new(HandleGuard { tx })
    }

    pub fn post(&self, input: GateInput) -> Result<()> {
        self.tx.send(Inbound::Input(input)).map_err(|_| {
            CoreError::warn()
                .domain(Domain::Gate)
                .kind(ErrorKind::Closed)
                .msg("gate was dropped")
                .build()
        })
    }

    pub fn lifecycle(&self, event: LifecycleEvent) -> Result<()> {
        self.post(GateInput::Lifecycle(event))
    }

    pub fn request_unlock(&self) -> Result<()> {
        self.post(GateInput::UnlockRequested)
    }

    pub fn shutdown(&self) -> Result<()> {
        self.post(GateInput::Shutdown)
    }
}
