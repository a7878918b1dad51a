// Copyright 2026 The wakelock Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

use log::warn;

/// Storage scoped to the browsing session.
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> Result<(), String>;
}

/// Counts page loads in session storage. Independent of the wake lock itself.
#[derive(Clone, Debug)]
pub struct LoadCounter<S> {
    store: S,
    key: String,
}

impl<S: SessionStore> LoadCounter<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Returns the stored count, treating a missing or invalid value as 0.
    pub fn get(&self) -> u32 {
        self.store
            .get(&self.key)
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or_default()
    }

    /// Increments the stored count and returns the new value.
    ///
    /// A failure to store the count is logged rather than returned.
    pub fn increment(&self) -> u32 {
        let count = self.get().saturating_add(1);
        if let Err(e) = self.store.set(&self.key, &count.to_string()) {
            warn!("Failed to store load count: {e}");
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemorySessionStore;

    #[test]
    fn increments() {
        let store = MemorySessionStore::default();
        let counter = LoadCounter::new(store.clone(), "redirectCount");
        assert_eq!(counter.get(), 0);
        assert_eq!(counter.increment(), 1);
        assert_eq!(counter.increment(), 2);
        assert_eq!(store.get("redirectCount"), Some("2".to_string()));
    }

    #[test]
    fn invalid_value_counts_as_zero() {
        let store = MemorySessionStore::default();
        store.set("redirectCount", "lots").unwrap();
        let counter = LoadCounter::new(store.clone(), "redirectCount");
        assert_eq!(counter.increment(), 1);
        assert_eq!(store.get("redirectCount"), Some("1".to_string()));
    }
}
