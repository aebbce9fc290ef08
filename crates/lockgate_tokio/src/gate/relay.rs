use lockgate_core::gate::{AuthOutcome, FlightId};
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

use super::{AuthFuture, GateInput};

/// Authenticator completion tagged with the flight that produced it.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct AuthResult {
    pub flight: FlightId,
    pub outcome: AuthOutcome,
}

/// One entry of the gate's inbox.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum Inbound {
    Input(GateInput),
    Result(AuthResult),
    /// The last host handle was dropped.
    HandlesDropped,
}

/// Runs authenticator futures off the gate's task and queues their results.
///
/// Results share one inbox with host inputs, so the gate's owner consumes both in the
/// order they were queued, on one task, regardless of where the platform call
/// completes.
///
/// At most one relay task is alive: launching or cancelling drops the previous
/// future. The platform call behind it may keep running; only its result is lost,
/// and that result would be stale anyway.
pub(crate) struct FlightRelay {
    tx: mpsc::UnboundedSender<Inbound>,
    rx: mpsc::UnboundedReceiver<Inbound>,
    inflight: Option<(FlightId, AbortHandle)>,
}

impl FlightRelay {
    pub(crate) fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx,
            inflight: None,
        }
    }

    /// Sender for host handles feeding the same inbox.
    pub(crate) fn inbox(&self) -> mpsc::UnboundedSender<Inbound> {
        self.tx.clone()
    }

    pub(crate) fn launch(&mut self, flight: FlightId, fut: AuthFuture) {
        self.cancel();

        let tx = self.tx.clone();
        let task = tokio::spawn(async move {
            let outcome = fut.await;
            // Receiver gone means the gate was dropped.
            let _ = tx.send(Inbound::Result(AuthResult { flight, outcome }));
        });
        self.inflight = Some((flight, task.abort_handle()));
    }

    pub(crate) fn cancel(&mut self) {
        if let Some((flight, task)) = self.inflight.take() {
            task.abort();
            tracing::trace!(%flight, "flight relay released");
        }
    }

    /// Flight whose relay task is still alive.
    pub(crate) fn inflight(&self) -> Option<FlightId> {
        self.inflight.as_ref().map(|(flight, _)| *flight)
    }

    /// Forget the relay for `flight` once its result was applied.
    pub(crate) fn settle(&mut self, flight: FlightId) {
        if self.inflight() == Some(flight) {
            self.inflight = None;
        }
    }

    pub(crate) async fn recv(&mut self) -> Option<Inbound> {
        self.rx.recv().await
    }

    pub(crate) fn try_recv(&mut self) -> Option<Inbound> {
        self.rx.try_recv().ok()
    }
}
