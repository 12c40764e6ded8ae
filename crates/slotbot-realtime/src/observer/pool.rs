//! Observer pool, keyed by observer ID.

use std::sync::Arc;

use dashmap::DashMap;

use super::handle::{ObserverHandle, ObserverId, ObserverInfo};

/// Thread-safe set of connected observers.
#[derive(Debug, Default)]
pub struct ObserverPool {
    by_id: DashMap<ObserverId, Arc<ObserverHandle>>,
}

impl ObserverPool {
    /// Creates a new empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an observer.
    pub fn add(&self, handle: Arc<ObserverHandle>) {
        self.by_id.insert(handle.id, handle);
    }

    /// Removes an observer.
    pub fn remove(&self, id: &ObserverId) -> Option<Arc<ObserverHandle>> {
        self.by_id.remove(id).map(|(_, handle)| handle)
    }

    /// Snapshot of current handles. Iterating a snapshot lets publishers run
    /// while observers come and go.
    pub fn snapshot(&self) -> Vec<Arc<ObserverHandle>> {
        self.by_id.iter().map(|entry| entry.value().clone()).collect()
    }

    /// Number of observers.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether the pool is empty.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Info for every observer.
    pub fn list(&self) -> Vec<ObserverInfo> {
        self.by_id.iter().map(|entry| entry.value().info()).collect()
    }
}
