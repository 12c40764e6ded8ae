//! Broadcast hub.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info};

use slotbot_core::config::RealtimeConfig;
use slotbot_core::events::{EventKind, HubEvent};

use crate::observer::{Delivery, ObserverHandle, ObserverPool, ObserverStream};

/// Per-publish delivery counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishReport {
    /// Observers that received the event.
    pub delivered: usize,
    /// Observers whose buffer was full.
    pub dropped: usize,
    /// Observers found closed and removed.
    pub removed: usize,
}

/// Fan-out of change events to registered observers.
///
/// Delivery is at most once with no replay: an observer only sees events
/// published while it is registered.
#[derive(Debug, Clone)]
pub struct BroadcastHub {
    pool: Arc<ObserverPool>,
    buffer_size: usize,
}

impl BroadcastHub {
    /// Create a hub whose observers buffer `buffer_size` events.
    pub fn new(buffer_size: usize) -> Self {
        Self {
            pool: Arc::new(ObserverPool::new()),
            buffer_size: buffer_size.max(1),
        }
    }

    /// Create a hub from configuration.
    pub fn from_config(config: &RealtimeConfig) -> Self {
        Self::new(config.observer_buffer_size)
    }

    /// Register a new observer.
    pub fn register(&self) -> ObserverStream {
        let (tx, rx) = mpsc::channel(self.buffer_size);
        let handle = Arc::new(ObserverHandle::new(tx));
        let id = handle.id;
        self.pool.add(handle);
        info!(observer_id = %id, observers = self.pool.len(), "Observer connected");
        ObserverStream::new(id, rx, Arc::clone(&self.pool))
    }

    /// Remove an observer explicitly. Dropping its stream has the same effect.
    pub fn unregister(&self, stream: ObserverStream) {
        drop(stream);
    }

    /// Publish an event to every observer.
    pub fn publish(&self, event: HubEvent) -> PublishReport {
        let mut report = PublishReport::default();
        for handle in self.pool.snapshot() {
            match handle.deliver(&event) {
                Delivery::Sent => report.delivered += 1,
                Delivery::Dropped => report.dropped += 1,
                Delivery::Closed => {
                    self.pool.remove(&handle.id);
                    report.removed += 1;
                }
            }
        }
        debug!(
            event = %event.kind,
            delivered = report.delivered,
            dropped = report.dropped,
            removed = report.removed,
            "Published hub event"
        );
        report
    }

    /// Serialize `payload` and publish it under `kind`.
    pub fn publish_json<T: Serialize>(&self, kind: EventKind, payload: &T) -> PublishReport {
        match HubEvent::from_payload(kind, payload) {
            Ok(event) => self.publish(event),
            Err(e) => {
                tracing::error!(event = %kind, error = %e, "Failed to serialize hub event");
                PublishReport::default()
            }
        }
    }

    /// Number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.pool.len()
    }
}

impl Default for BroadcastHub {
    fn default() -> Self {
        Self::from_config(&RealtimeConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_publish_reaches_all_observers() {
        let hub = BroadcastHub::new(8);
        let mut a = hub.register();
        let mut b = hub.register();
        let report = hub.publish_json(EventKind::Slot, &json!({ "message": "X" }));
        assert_eq!(report.delivered, 2);
        assert_eq!(a.recv().await.unwrap().kind, EventKind::Slot);
        assert_eq!(b.recv().await.unwrap().payload["message"], "X");
    }

    #[tokio::test]
    async fn test_dropped_stream_unregisters() {
        let hub = BroadcastHub::new(8);
        let a = hub.register();
        let _b = hub.register();
        assert_eq!(hub.observer_count(), 2);
        drop(a);
        assert_eq!(hub.observer_count(), 1);
        let report = hub.publish_json(EventKind::Delete, &json!({ "id": "1" }));
        assert_eq!(report.delivered, 1);
    }

    #[tokio::test]
    async fn test_full_buffer_drops_for_that_observer_only() {
        let hub = BroadcastHub::new(1);
        let mut slow = hub.register();
        let mut fast = hub.register();

        hub.publish_json(EventKind::Update, &json!({ "n": 1 }));
        assert_eq!(fast.recv().await.unwrap().payload["n"], 1);

        let report = hub.publish_json(EventKind::Update, &json!({ "n": 2 }));
        assert_eq!(report.dropped, 1);
        assert_eq!(report.delivered, 1);

        assert_eq!(slow.recv().await.unwrap().payload["n"], 1);
        assert!(slow.try_recv().is_none());
        assert_eq!(fast.recv().await.unwrap().payload["n"], 2);
    }

    #[tokio::test]
    async fn test_no_replay_for_late_observers() {
        let hub = BroadcastHub::new(4);
        hub.publish_json(EventKind::Settings, &json!({}));
        let mut late = hub.register();
        assert!(late.try_recv().is_none());
    }
}
