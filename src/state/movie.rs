//! Movie detail and episode navigation state.
//!
//! Holds the entry being viewed, the expanded season and the episode being
//! played. Every operation is a plain synchronous mutation except
//! [`MovieStore::fetch_details`], which awaits the catalog.
//!
//! Fetches are sequenced: each one takes a [`FetchTicket`] and only the most
//! recently issued ticket may apply its result. A slow response that arrives
//! after a newer request was started is dropped.

use crate::models::catalog::{same_episode, Catalog, CatalogEntry, EpisodeRef, Season};
use crate::services::catalog::CatalogSource;
use crate::state::EVENT_CAPACITY;
use crate::Result;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Loading state of the detail view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DetailStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    NotFound,
    Failed(String),
}

/// What a fetch did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The entry was found and selected.
    Found,
    /// The catalog has no such entry; the selection was cleared.
    NotFound,
    /// The catalog could not be loaded; the selection was left as is.
    Failed,
    /// A newer fetch was started before this one finished.
    Superseded,
}

/// Token for one in-flight fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    seq: u64,
    id: String,
}

/// Change notifications.
#[derive(Debug, Clone)]
pub enum MovieEvent {
    EntryChanged(Option<Arc<CatalogEntry>>),
    SeasonChanged(Option<u32>),
    EpisodeChanged(Option<EpisodeRef>),
    StatusChanged(DetailStatus),
}

/// Movie detail / episode navigation state.
#[derive(Debug)]
pub struct MovieStore {
    selected_entry: Option<Arc<CatalogEntry>>,
    selected_season: Option<u32>,
    current_episode: Option<EpisodeRef>,
    status: DetailStatus,
    latest_seq: u64,
    changes: broadcast::Sender<MovieEvent>,
}

impl Default for MovieStore {
    fn default() -> Self {
        let (changes, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            selected_entry: None,
            selected_season: None,
            current_episode: None,
            status: DetailStatus::default(),
            latest_seq: 0,
            changes,
        }
    }
}

impl MovieStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_entry(&self) -> Option<&Arc<CatalogEntry>> {
        self.selected_entry.as_ref()
    }

    pub fn selected_season(&self) -> Option<u32> {
        self.selected_season
    }

    pub fn current_episode(&self) -> Option<&EpisodeRef> {
        self.current_episode.as_ref()
    }

    pub fn status(&self) -> &DetailStatus {
        &self.status
    }

    /// The selected season resolved against the selected entry.
    pub fn expanded_season(&self) -> Option<&Season> {
        let ordinal = self.selected_season?;
        self.selected_entry.as_ref()?.season(ordinal)
    }

    /// Look up a season of the selected entry.
    pub fn season(&self, ordinal: u32) -> Option<&Season> {
        self.selected_entry.as_ref()?.season(ordinal)
    }

    /// Observe state changes. Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> broadcast::Receiver<MovieEvent> {
        self.changes.subscribe()
    }

    /// Load the entry with `id` from the catalog.
    ///
    /// On success the entry (or `None` when absent) replaces the selection
    /// and the current episode is cleared. The selected season is kept.
    /// On failure the error is logged and the selection is untouched.
    pub async fn fetch_details<S: CatalogSource>(&mut self, source: &S, id: &str) -> FetchOutcome {
        let ticket = self.begin_fetch(id);
        let result = source.fetch_catalog().await;
        self.complete_fetch(&ticket, result)
    }

    /// Start a fetch. Any earlier ticket becomes stale.
    pub fn begin_fetch(&mut self, id: &str) -> FetchTicket {
        self.latest_seq += 1;
        self.set_status(DetailStatus::Loading);
        FetchTicket {
            seq: self.latest_seq,
            id: id.to_string(),
        }
    }

    /// Apply the result of a fetch started with [`MovieStore::begin_fetch`].
    pub fn complete_fetch(&mut self, ticket: &FetchTicket, result: Result<Catalog>) -> FetchOutcome {
        if ticket.seq != self.latest_seq {
            match result {
                Err(e) => tracing::error!(
                    "Error fetching movie details for '{}' (superseded): {}",
                    ticket.id,
                    e
                ),
                Ok(_) => tracing::debug!("Dropping stale fetch for '{}'", ticket.id),
            }
            return FetchOutcome::Superseded;
        }

        match result {
            Ok(catalog) => {
                let entry = catalog.find(&ticket.id);
                let outcome = if entry.is_some() {
                    FetchOutcome::Found
                } else {
                    tracing::debug!("No catalog entry with id '{}'", ticket.id);
                    FetchOutcome::NotFound
                };

                self.selected_entry = entry;
                self.publish(MovieEvent::EntryChanged(self.selected_entry.clone()));
                self.set_episode(None);
                self.set_status(match outcome {
                    FetchOutcome::Found => DetailStatus::Loaded,
                    _ => DetailStatus::NotFound,
                });
                outcome
            }
            Err(e) => {
                tracing::error!("Error fetching movie details for '{}': {}", ticket.id, e);
                self.set_status(DetailStatus::Failed(e.to_string()));
                FetchOutcome::Failed
            }
        }
    }

    /// Expand a season, or collapse it if it is already expanded.
    pub fn toggle_season(&mut self, ordinal: u32) {
        let next = if self.selected_season == Some(ordinal) {
            None
        } else {
            Some(ordinal)
        };
        self.selected_season = next;
        self.publish(MovieEvent::SeasonChanged(next));
    }

    /// Select an episode, or deselect it if it is already current.
    pub fn select_episode(&mut self, episode: &EpisodeRef) {
        let already = self
            .current_episode
            .as_ref()
            .is_some_and(|current| same_episode(current, episode));

        if already {
            self.set_episode(None);
        } else {
            self.set_episode(Some(Arc::clone(episode)));
        }
    }

    /// Move to the following episode of `season`.
    ///
    /// No-op when the current episode is not in `season` or is the last one.
    pub fn play_next_episode(&mut self, season: &Season) -> bool {
        let Some(index) = self.current_index_in(season) else {
            return false;
        };
        match season.episode(index + 1) {
            Some(next) => {
                self.set_episode(Some(Arc::clone(next)));
                true
            }
            None => false,
        }
    }

    /// Move to the preceding episode of `season`.
    ///
    /// No-op when the current episode is not in `season` or is the first one.
    pub fn play_previous_episode(&mut self, season: &Season) -> bool {
        match self.current_index_in(season) {
            Some(index) if index > 0 => {
                let prev = Arc::clone(&season.episodes[index - 1]);
                self.set_episode(Some(prev));
                true
            }
            _ => false,
        }
    }

    /// Clear the current episode.
    pub fn reset_current_episode(&mut self) {
        self.set_episode(None);
    }

    fn current_index_in(&self, season: &Season) -> Option<usize> {
        season.position_of(self.current_episode.as_ref()?)
    }

    fn set_episode(&mut self, episode: Option<EpisodeRef>) {
        self.current_episode = episode;
        self.publish(MovieEvent::EpisodeChanged(self.current_episode.clone()));
    }

    fn set_status(&mut self, status: DetailStatus) {
        if self.status != status {
            self.status = status;
            self.publish(MovieEvent::StatusChanged(self.status.clone()));
        }
    }

    fn publish(&self, event: MovieEvent) {
        // No receivers is fine.
        let _ = self.changes.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::Episode;
    use tokio::sync::broadcast::error::TryRecvError;

    fn sample_catalog() -> Catalog {
        Catalog::new(vec![
            CatalogEntry::new(
                "a",
                "A",
                vec![Season::new(
                    1,
                    vec![Episode::new("e0"), Episode::new("e1"), Episode::new("e2")],
                )],
            ),
            CatalogEntry::new("b", "B", vec![Season::new(1, vec![Episode::new("b0")])]),
        ])
    }

    fn failed() -> Result<Catalog> {
        Err(crate::Error::CatalogUnavailable("offline".to_string()))
    }

    #[tokio::test]
    async fn test_fetch_selects_entry_and_clears_episode() {
        let catalog = sample_catalog();
        let mut store = MovieStore::new();

        store.fetch_details(&catalog, "a").await;
        let season = store.season(1).unwrap().clone();
        store.select_episode(&season.episodes[0]);

        let outcome = store.fetch_details(&catalog, "b").await;
        assert_eq!(outcome, FetchOutcome::Found);
        assert_eq!(store.selected_entry().unwrap().id, "b");
        assert!(store.current_episode().is_none());
        assert_eq!(store.status(), &DetailStatus::Loaded);
    }

    #[tokio::test]
    async fn test_fetch_missing_id_clears_selection() {
        let catalog = sample_catalog();
        let mut store = MovieStore::new();
        store.fetch_details(&catalog, "a").await;

        let outcome = store.fetch_details(&catalog, "zzz").await;
        assert_eq!(outcome, FetchOutcome::NotFound);
        assert!(store.selected_entry().is_none());
        assert_eq!(store.status(), &DetailStatus::NotFound);
    }

    #[tokio::test]
    async fn test_fetch_keeps_selected_season() {
        let catalog = sample_catalog();
        let mut store = MovieStore::new();
        store.toggle_season(3);

        store.fetch_details(&catalog, "a").await;
        assert_eq!(store.selected_season(), Some(3));
        assert!(store.expanded_season().is_none());
    }

    #[test]
    fn test_failed_fetch_leaves_selection() {
        let catalog = sample_catalog();
        let mut store = MovieStore::new();
        let ticket = store.begin_fetch("a");
        store.complete_fetch(&ticket, Ok(catalog.clone()));
        let episode = Arc::clone(&store.season(1).unwrap().episodes[1]);
        store.select_episode(&episode);

        let ticket = store.begin_fetch("b");
        let outcome = store.complete_fetch(&ticket, failed());

        assert_eq!(outcome, FetchOutcome::Failed);
        assert_eq!(store.selected_entry().unwrap().id, "a");
        assert!(same_episode(store.current_episode().unwrap(), &episode));
        assert!(matches!(store.status(), DetailStatus::Failed(_)));
    }

    #[test]
    fn test_stale_ticket_is_dropped() {
        let catalog = sample_catalog();
        let mut store = MovieStore::new();

        let first = store.begin_fetch("a");
        let second = store.begin_fetch("b");

        assert_eq!(store.complete_fetch(&second, Ok(catalog.clone())), FetchOutcome::Found);
        assert_eq!(store.complete_fetch(&first, Ok(catalog)), FetchOutcome::Superseded);
        assert_eq!(store.selected_entry().unwrap().id, "b");
    }

    #[test]
    fn test_toggle_season_is_involution() {
        let mut store = MovieStore::new();
        store.toggle_season(2);
        assert_eq!(store.selected_season(), Some(2));
        store.toggle_season(2);
        assert_eq!(store.selected_season(), None);

        store.toggle_season(1);
        store.toggle_season(4);
        assert_eq!(store.selected_season(), Some(4));
    }

    #[test]
    fn test_select_episode_is_involution() {
        let season = Season::new(1, vec![Episode::new("e0"), Episode::new("e1")]);
        let mut store = MovieStore::new();

        store.select_episode(&season.episodes[0]);
        store.select_episode(&season.episodes[1]);
        assert!(same_episode(store.current_episode().unwrap(), &season.episodes[1]));

        store.select_episode(&season.episodes[0]);
        store.select_episode(&season.episodes[0]);
        assert!(same_episode(store.current_episode().unwrap(), &season.episodes[1]));
    }

    #[test]
    fn test_next_and_previous_stop_at_bounds() {
        let season = Season::new(
            1,
            vec![Episode::new("e0"), Episode::new("e1"), Episode::new("e2")],
        );
        let mut store = MovieStore::new();

        store.select_episode(&season.episodes[1]);
        assert!(store.play_next_episode(&season));
        assert!(same_episode(store.current_episode().unwrap(), &season.episodes[2]));
        assert!(!store.play_next_episode(&season));
        assert!(same_episode(store.current_episode().unwrap(), &season.episodes[2]));

        store.select_episode(&season.episodes[0]);
        assert!(!store.play_previous_episode(&season));
        assert!(same_episode(store.current_episode().unwrap(), &season.episodes[0]));
    }

    #[test]
    fn test_navigation_outside_season_is_noop() {
        let season = Season::new(1, vec![Episode::new("e0"), Episode::new("e1")]);
        let other = Season::new(1, vec![Episode::new("e0"), Episode::new("e1")]);
        let mut store = MovieStore::new();

        assert!(!store.play_next_episode(&season));

        store.select_episode(&other.episodes[0]);
        assert!(!store.play_next_episode(&season));
        assert!(same_episode(store.current_episode().unwrap(), &other.episodes[0]));
    }

    #[test]
    fn test_stale_failure_is_dropped() {
        let catalog = sample_catalog();
        let mut store = MovieStore::new();

        let first = store.begin_fetch("a");
        let second = store.begin_fetch("b");
        assert_eq!(store.complete_fetch(&second, Ok(catalog)), FetchOutcome::Found);

        assert_eq!(store.complete_fetch(&first, failed()), FetchOutcome::Superseded);
        assert_eq!(store.selected_entry().unwrap().id, "b");
        assert_eq!(store.status(), &DetailStatus::Loaded);
    }

    fn tag(event: &MovieEvent) -> &'static str {
        match event {
            MovieEvent::EntryChanged(_) => "entry",
            MovieEvent::SeasonChanged(_) => "season",
            MovieEvent::EpisodeChanged(_) => "episode",
            MovieEvent::StatusChanged(_) => "status",
        }
    }

    #[test]
    fn test_events_are_published() {
        let mut store = MovieStore::new();
        let mut events = store.subscribe();

        store.toggle_season(1);
        store.reset_current_episode();

        let mut seen = Vec::new();
        while let Ok(event) = events.try_recv() {
            seen.push(tag(&event));
        }
        assert_eq!(seen, vec!["season", "episode"]);
    }

    #[test]
    fn test_dropped_receiver_stops_delivery() {
        let mut store = MovieStore::new();
        let events = store.subscribe();
        drop(events);

        store.toggle_season(1);
        assert_eq!(store.selected_season(), Some(1));

        let mut late = store.subscribe();
        assert!(matches!(late.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn test_fetch_publishes_entry_then_status() {
        let catalog = sample_catalog();
        let mut store = MovieStore::new();
        let mut events = store.subscribe();

        store.fetch_details(&catalog, "a").await;

        let mut seen = Vec::new();
        while let Ok(event) = events.try_recv() {
            seen.push(tag(&event));
        }
        assert_eq!(seen, vec!["status", "entry", "episode", "status"]);
    }
}
