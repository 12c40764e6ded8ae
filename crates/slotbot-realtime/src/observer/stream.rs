//! Receiving side of an observer registration.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;

use slotbot_core::events::HubEvent;

use super::handle::ObserverId;
use super::pool::ObserverPool;

/// Stream of hub events for one observer. Dropping it unregisters the
/// observer.
#[derive(Debug)]
pub struct ObserverStream {
    id: ObserverId,
    receiver: mpsc::Receiver<HubEvent>,
    pool: Arc<ObserverPool>,
}

impl ObserverStream {
    pub(crate) fn new(
        id: ObserverId,
        receiver: mpsc::Receiver<HubEvent>,
        pool: Arc<ObserverPool>,
    ) -> Self {
        Self { id, receiver, pool }
    }

    /// Observer ID.
    pub fn id(&self) -> ObserverId {
        self.id
    }

    /// Receive the next event.
    pub async fn recv(&mut self) -> Option<HubEvent> {
        self.receiver.recv().await
    }

    /// Receive without waiting.
    pub fn try_recv(&mut self) -> Option<HubEvent> {
        self.receiver.try_recv().ok()
    }
}

impl Stream for ObserverStream {
    type Item = HubEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

impl Drop for ObserverStream {
    fn drop(&mut self) {
        if self.pool.remove(&self.id).is_some() {
            tracing::debug!(observer_id = %self.id, "Observer disconnected");
        }
    }
}
