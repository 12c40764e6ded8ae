//! Immutable settings snapshot, swapped atomically on write.

use std::sync::{Arc, RwLock};

use slotbot_entity::settings::Settings;

/// Holds the current settings snapshot. Readers clone the `Arc` and never
/// see a partially applied write.
#[derive(Debug)]
pub struct SettingsCache {
    current: RwLock<Arc<Settings>>,
}

impl SettingsCache {
    /// Create a cache holding `initial`.
    pub fn new(initial: Settings) -> Self {
        Self {
            current: RwLock::new(Arc::new(initial)),
        }
    }

    /// Current snapshot.
    pub fn get(&self) -> Arc<Settings> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Replace the snapshot.
    pub fn replace(&self, next: Settings) -> Arc<Settings> {
        let next = Arc::new(next);
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        *guard = Arc::clone(&next);
        next
    }
}
