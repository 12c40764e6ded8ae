//! Individual observer handle.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use uuid::Uuid;

use slotbot_core::events::HubEvent;

/// Unique observer identifier
pub type ObserverId = Uuid;

/// Outcome of pushing one event to one observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Queued in the observer's buffer.
    Sent,
    /// Buffer full; this event is lost for this observer.
    Dropped,
    /// The observer went away.
    Closed,
}

/// A handle to a single connected observer.
#[derive(Debug)]
pub struct ObserverHandle {
    /// Unique observer ID
    pub id: ObserverId,
    /// Sender feeding the observer's stream
    sender: mpsc::Sender<HubEvent>,
    /// When the observer connected
    pub connected_at: DateTime<Utc>,
    /// Whether the observer is still reachable
    alive: AtomicBool,
}

impl ObserverHandle {
    /// Create a new observer handle
    pub fn new(sender: mpsc::Sender<HubEvent>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender,
            connected_at: Utc::now(),
            alive: AtomicBool::new(true),
        }
    }

    /// Push an event without waiting.
    pub fn deliver(&self, event: &HubEvent) -> Delivery {
        if !self.is_alive() {
            return Delivery::Closed;
        }
        match self.sender.try_send(event.clone()) {
            Ok(()) => Delivery::Sent,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(observer_id = %self.id, event = %event.kind, "Observer buffer full, dropping event");
                Delivery::Dropped
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.mark_dead();
                Delivery::Closed
            }
        }
    }

    /// Check if the observer is alive
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst) && !self.sender.is_closed()
    }

    /// Mark the observer as dead
    pub fn mark_dead(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }

    /// Serializable snapshot
    pub fn info(&self) -> ObserverInfo {
        ObserverInfo {
            id: self.id,
            connected_at: self.connected_at,
            alive: self.is_alive(),
        }
    }
}

/// Snapshot of observer info (serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObserverInfo {
    /// Observer ID
    pub id: ObserverId,
    /// Connected at
    pub connected_at: DateTime<Utc>,
    /// Is alive
    pub alive: bool,
}
