//! Favorites state.
//!
//! The list is seeded from persistent storage and written back as a whole
//! JSON array after every mutation.

use crate::models::catalog::CatalogEntry;
use crate::state::EVENT_CAPACITY;
use crate::storage::{KeyValueStore, FAVORITES_KEY};
use crate::Result;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Change notifications, carrying the entry id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavoritesEvent {
    Added(String),
    Removed(String),
}

/// Favorites backed by a key-value store.
pub struct FavoritesStore<S: KeyValueStore> {
    storage: S,
    favorites: Vec<Arc<CatalogEntry>>,
    changes: broadcast::Sender<FavoritesEvent>,
}

impl<S: KeyValueStore> FavoritesStore<S> {
    /// Load favorites from storage.
    ///
    /// A missing key yields an empty list. A malformed value is an error.
    pub fn load(storage: S) -> Result<Self> {
        let favorites: Vec<Arc<CatalogEntry>> = match storage.get(FAVORITES_KEY)? {
            Some(json) => serde_json::from_str(&json).map_err(|e| crate::Error::StorageCorrupt {
                key: FAVORITES_KEY.to_string(),
                reason: e.to_string(),
            })?,
            None => Vec::new(),
        };

        let (changes, _) = broadcast::channel(EVENT_CAPACITY);
        Ok(Self {
            storage,
            favorites,
            changes,
        })
    }

    /// All favorites in insertion order.
    pub fn favorites(&self) -> &[Arc<CatalogEntry>] {
        &self.favorites
    }

    pub fn len(&self) -> usize {
        self.favorites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.favorites.is_empty()
    }

    /// Whether an entry with this id is a favorite.
    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.iter().any(|fav| fav.id == id)
    }

    /// Add an entry unless one with the same id is already present.
    ///
    /// Returns whether the list changed.
    pub fn add_favorite(&mut self, entry: Arc<CatalogEntry>) -> Result<bool> {
        if self.is_favorite(&entry.id) {
            return Ok(false);
        }

        let id = entry.id.clone();
        self.favorites.push(entry);
        self.save()?;
        tracing::debug!("Added favorite '{}'", id);
        let _ = self.changes.send(FavoritesEvent::Added(id));
        Ok(true)
    }

    /// Remove every entry with this id.
    pub fn remove_favorite(&mut self, id: &str) -> Result<()> {
        let before = self.favorites.len();
        self.favorites.retain(|fav| fav.id != id);
        self.save()?;

        if self.favorites.len() != before {
            tracing::debug!("Removed favorite '{}'", id);
            let _ = self.changes.send(FavoritesEvent::Removed(id.to_string()));
        }
        Ok(())
    }

    /// Add the entry if absent, remove it otherwise. Returns the new state.
    pub fn toggle_favorite(&mut self, entry: Arc<CatalogEntry>) -> Result<bool> {
        if self.is_favorite(&entry.id) {
            self.remove_favorite(&entry.id)?;
            Ok(false)
        } else {
            self.add_favorite(entry)?;
            Ok(true)
        }
    }

    /// Observe changes. Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> broadcast::Receiver<FavoritesEvent> {
        self.changes.subscribe()
    }

    /// Give back the underlying storage.
    pub fn into_storage(self) -> S {
        self.storage
    }

    fn save(&mut self) -> Result<()> {
        let json = serde_json::to_string(&self.favorites)?;
        self.storage.set(FAVORITES_KEY, &json)
    }
}
