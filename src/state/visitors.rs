//! Visitor counter.
//!
//! The count lives in session storage under `visitorsCount`. Mounting a view
//! increments it and unmounting decrements it; the read-modify-write is not
//! atomic across processes.

use crate::storage::{KeyValueStore, VISITORS_KEY};
use crate::Result;
use tokio::sync::watch;

/// Visitor count held for the current session.
pub struct VisitorCounter<S: KeyValueStore> {
    storage: S,
    current: u64,
    changes: watch::Sender<u64>,
}

impl<S: KeyValueStore> VisitorCounter<S> {
    pub fn new(storage: S) -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            storage,
            current: 0,
            changes,
        }
    }

    /// Count as of the last update.
    pub fn current(&self) -> u64 {
        self.current
    }

    /// Register a visitor.
    pub fn update_visitors_count(&mut self) -> Result<u64> {
        let count = self.stored_count()?.saturating_add(1);
        self.storage.set(VISITORS_KEY, &count.to_string())?;
        self.set_current(count);
        Ok(count)
    }

    /// Unregister a visitor. Does nothing once the count is zero.
    pub fn decrease_visitors_count(&mut self) -> Result<u64> {
        let stored = self.stored_count()?;
        if stored > 0 {
            let count = stored - 1;
            self.storage.set(VISITORS_KEY, &count.to_string())?;
            self.set_current(count);
        }
        Ok(self.current)
    }

    /// Increment now and decrement when the guard is dropped.
    pub fn mount(&mut self) -> Result<VisitorGuard<'_, S>> {
        self.update_visitors_count()?;
        Ok(VisitorGuard { counter: self })
    }

    /// Watch the count. Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }

    fn stored_count(&self) -> Result<u64> {
        let Some(raw) = self.storage.get(VISITORS_KEY)? else {
            return Ok(0);
        };
        match raw.trim().parse() {
            Ok(count) => Ok(count),
            Err(_) => {
                tracing::warn!("Ignoring unparsable visitor count {:?}", raw);
                Ok(0)
            }
        }
    }

    fn set_current(&mut self, count: u64) {
        self.current = count;
        self.changes.send_replace(count);
    }
}

/// Mounted view. Decrements the counter on drop.
pub struct VisitorGuard<'a, S: KeyValueStore> {
    counter: &'a mut VisitorCounter<S>,
}

impl<S: KeyValueStore> VisitorGuard<'_, S> {
    pub fn current(&self) -> u64 {
        self.counter.current()
    }
}

impl<S: KeyValueStore> Drop for VisitorGuard<'_, S> {
    fn drop(&mut self) {
        if let Err(e) = self.counter.decrease_visitors_count() {
            tracing::warn!("Failed to decrease visitor count: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_increment_from_empty_session() {
        let mut counter = VisitorCounter::new(MemoryStore::new());
        assert_eq!(counter.update_visitors_count().unwrap(), 1);
        assert_eq!(counter.update_visitors_count().unwrap(), 2);
        assert_eq!(counter.current(), 2);
    }

    #[test]
    fn test_decrement_floors_at_zero() {
        let mut counter = VisitorCounter::new(MemoryStore::new());
        assert_eq!(counter.decrease_visitors_count().unwrap(), 0);

        counter.update_visitors_count().unwrap();
        assert_eq!(counter.decrease_visitors_count().unwrap(), 0);
        assert_eq!(counter.decrease_visitors_count().unwrap(), 0);
    }

    #[test]
    fn test_seeded_from_storage() {
        let mut storage = MemoryStore::new();
        storage.set(VISITORS_KEY, "4").unwrap();

        let mut counter = VisitorCounter::new(storage);
        assert_eq!(counter.update_visitors_count().unwrap(), 5);
    }

    #[test]
    fn test_garbage_count_treated_as_zero() {
        let mut storage = MemoryStore::new();
        storage.set(VISITORS_KEY, "lots").unwrap();

        let mut counter = VisitorCounter::new(storage);
        assert_eq!(counter.update_visitors_count().unwrap(), 1);
    }

    #[test]
    fn test_increment_saturates_at_max() {
        let mut storage = MemoryStore::new();
        storage.set(VISITORS_KEY, &u64::MAX.to_string()).unwrap();

        let mut counter = VisitorCounter::new(storage);
        assert_eq!(counter.update_visitors_count().unwrap(), u64::MAX);
        assert_eq!(counter.current(), u64::MAX);
    }

    #[test]
    fn test_subscriber_sees_latest_count() {
        let mut counter = VisitorCounter::new(MemoryStore::new());
        let mut count = counter.subscribe();

        counter.update_visitors_count().unwrap();
        counter.update_visitors_count().unwrap();
        assert!(count.has_changed().unwrap());
        assert_eq!(*count.borrow_and_update(), 2);

        counter.decrease_visitors_count().unwrap();
        assert_eq!(*count.borrow_and_update(), 1);
    }

    #[test]
    fn test_guard_decrements_on_drop() {
        let mut counter = VisitorCounter::new(MemoryStore::new());
        {
            let guard = counter.mount().unwrap();
            assert_eq!(guard.current(), 1);
        }
        assert_eq!(counter.current(), 0);
    }
}
