//! High score persistence
//!
//! A single integer behind the storage backend: read at session start,
//! written only when a finished session beats the stored record.

use crate::platform::StorageBackend;

/// Storage key, shared with the dashboard's reset control
pub const STORAGE_KEY: &str = "fynix_expense_drop_hs";

/// Persistent best score
#[derive(Debug, Clone)]
pub struct HighScore<S: StorageBackend> {
    store: S,
    best: u32,
}

impl<S: StorageBackend> HighScore<S> {
    /// Load the stored record; a missing or unparsable value degrades to zero
    pub fn load(store: S) -> Self {
        let best = match store.get(STORAGE_KEY) {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                log::warn!("Stored high score {raw:?} is not a number, starting fresh");
                0
            }),
            None => 0,
        };
        Self { store, best }
    }

    /// Best score seen so far
    pub fn best(&self) -> u32 {
        self.best
    }

    /// Record a finished session. Persists only on a new record; replaying a
    /// lower-scoring session leaves the stored value untouched.
    /// Returns true when the record was beaten.
    pub fn record(&mut self, score: u32) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;
        self.store.set(STORAGE_KEY, &score.to_string());
        log::info!("New high score: {score}");
        true
    }

    /// Clear the stored record (the dashboard's reset control)
    pub fn reset(&mut self) {
        self.best = 0;
        self.store.remove(STORAGE_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStore;

    #[test]
    fn test_record_persists_only_new_best() {
        let mut hs = HighScore::load(MemoryStore::new());
        assert_eq!(hs.best(), 0);

        assert!(hs.record(150));
        assert_eq!(hs.best(), 150);

        // Lower-scoring replay leaves the record unchanged
        assert!(!hs.record(90));
        assert_eq!(hs.best(), 150);

        // Equal score is not a new record
        assert!(!hs.record(150));
        assert_eq!(hs.best(), 150);
    }

    #[test]
    fn test_lower_score_leaves_storage_untouched() {
        let mut store = MemoryStore::new();
        store.set(STORAGE_KEY, "300");

        let mut hs = HighScore::load(store);
        assert_eq!(hs.best(), 300);
        assert!(!hs.record(100));

        // Reload from the same backing value
        let reloaded = HighScore::load(hs.store.clone());
        assert_eq!(reloaded.best(), 300);
    }

    #[test]
    fn test_unparsable_value_degrades_to_zero() {
        let mut store = MemoryStore::new();
        store.set(STORAGE_KEY, "not-a-number");
        let hs = HighScore::load(store);
        assert_eq!(hs.best(), 0);
    }

    #[test]
    fn test_reset_clears_storage() {
        let mut hs = HighScore::load(MemoryStore::new());
        hs.record(40);
        hs.reset();
        assert_eq!(hs.best(), 0);
        assert_eq!(hs.store.get(STORAGE_KEY), None);
    }
}
