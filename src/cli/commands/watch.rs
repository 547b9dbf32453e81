//! Interactive watch session.
//!
//! Drives the movie store from stdin:
//! `s N` toggle season, `e N` select episode, `n`/`p` next/previous,
//! `r` reset, `f` toggle favorite, `q` quit.

use super::browse::{movie_path, print_season, print_unavailable};
use super::spinner;
use crate::models::config::Config;
use crate::router::Router;
use crate::services::catalog::CatalogClient;
use crate::state::favorites::FavoritesStore;
use crate::state::movie::{MovieEvent, MovieStore};
use crate::state::visitors::VisitorCounter;
use crate::storage::{FileStore, MemoryStore};
use crate::Result;
use colored::Colorize;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchCommand {
    ToggleSeason(u32),
    /// 1-based position in the expanded season.
    SelectEpisode(usize),
    Next,
    Previous,
    Reset,
    Favorite,
    Help,
    Quit,
    Unknown(String),
}

/// Parse one input line.
pub fn parse_command(line: &str) -> WatchCommand {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return WatchCommand::Help;
    };
    let arg = words.next();

    match (head, arg) {
        ("s" | "season", Some(n)) => n
            .parse()
            .map(WatchCommand::ToggleSeason)
            .unwrap_or_else(|_| WatchCommand::Unknown(line.to_string())),
        ("e" | "episode", Some(n)) => match n.parse::<usize>() {
            Ok(n) if n > 0 => WatchCommand::SelectEpisode(n),
            _ => WatchCommand::Unknown(line.to_string()),
        },
        ("n" | "next", None) => WatchCommand::Next,
        ("p" | "prev", None) => WatchCommand::Previous,
        ("r" | "reset", None) => WatchCommand::Reset,
        ("f" | "fav", None) => WatchCommand::Favorite,
        ("h" | "help" | "?", None) => WatchCommand::Help,
        ("q" | "quit" | "exit", None) => WatchCommand::Quit,
        _ => WatchCommand::Unknown(line.to_string()),
    }
}

/// Watch a title interactively.
pub async fn watch(config: &Config, id: &str) -> Result<()> {
    let client = CatalogClient::from_config(&config.catalog)?;
    let mut router = Router::with_default_routes()?;
    let mut movies = MovieStore::new();
    let mut events = movies.subscribe();

    let pb = spinner("Loading details...");
    router
        .navigate(&movie_path(id), &mut movies, &client)
        .await?;
    pb.finish_and_clear();
    drain_events(&mut events);

    println!("{} {}", "🎬".bold(), router.document_title().bold().cyan());
    let Some(entry) = movies.selected_entry().cloned() else {
        print_unavailable(movies.status());
        return Ok(());
    };

    let mut favorites = FavoritesStore::load(FileStore::open(&config.storage_dir)?)?;
    let mut visitors = VisitorCounter::new(MemoryStore::new());
    let guard = visitors.mount()?;

    println!("👀 {} watching now", guard.current());
    for season in &entry.seasons {
        print_season(season, false);
    }
    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        drain_events(&mut events);
        print!("{} ", ">".green());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_command(&line) {
            WatchCommand::ToggleSeason(n) => {
                if entry.season(n).is_none() {
                    println!("{}", format!("No season {}", n).yellow());
                }
                movies.toggle_season(n);
                if let Some(season) = movies.expanded_season() {
                    print_season(season, true);
                }
            }
            WatchCommand::SelectEpisode(n) => {
                let episode = movies
                    .expanded_season()
                    .and_then(|s| s.episode(n - 1))
                    .cloned();
                match episode {
                    Some(episode) => movies.select_episode(&episode),
                    None => println!("{}", "Expand a season with that episode first".yellow()),
                }
            }
            command @ (WatchCommand::Next | WatchCommand::Previous) => {
                let Some(season) = movies.expanded_season().cloned() else {
                    println!("{}", "Expand a season first".yellow());
                    continue;
                };
                let moved = if command == WatchCommand::Next {
                    movies.play_next_episode(&season)
                } else {
                    movies.play_previous_episode(&season)
                };
                if !moved {
                    println!("{}", "No episode there".dimmed());
                }
            }
            WatchCommand::Reset => movies.reset_current_episode(),
            WatchCommand::Favorite => {
                if favorites.toggle_favorite(entry.clone())? {
                    println!("{} Added to favorites", "★".yellow());
                } else {
                    println!("☆ Removed from favorites");
                }
            }
            WatchCommand::Help => print_help(),
            WatchCommand::Quit => break,
            WatchCommand::Unknown(input) => {
                println!("{} {}", "Unknown command:".red(), input);
            }
        }
    }

    drop(guard);
    println!("👋 {} watching now", visitors.current());
    Ok(())
}

/// Print everything published since the last drain.
fn drain_events(events: &mut broadcast::Receiver<MovieEvent>) {
    loop {
        match events.try_recv() {
            Ok(event) => print_event(&event),
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                tracing::debug!("Skipped {} state changes", skipped);
            }
            Err(_) => break,
        }
    }
}

fn print_event(event: &MovieEvent) {
    match event {
        MovieEvent::EpisodeChanged(Some(episode)) => match episode.url {
            Some(ref url) => println!("▶ Now playing: {} ({})", episode.label.bold(), url),
            None => println!("▶ Now playing: {}", episode.label.bold()),
        },
        MovieEvent::EpisodeChanged(None) => println!("■ Stopped"),
        MovieEvent::SeasonChanged(None) => println!("Seasons collapsed"),
        MovieEvent::SeasonChanged(Some(_)) | MovieEvent::EntryChanged(_) => {}
        MovieEvent::StatusChanged(status) => tracing::debug!("Detail status: {:?}", status),
    }
}

fn print_help() {
    println!();
    println!(
        "{}",
        "s N: season  e N: episode  n/p: next/previous  r: stop  f: favorite  q: quit".dimmed()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("s 2"), WatchCommand::ToggleSeason(2));
        assert_eq!(parse_command("episode 3"), WatchCommand::SelectEpisode(3));
        assert_eq!(parse_command(" n "), WatchCommand::Next);
        assert_eq!(parse_command("p"), WatchCommand::Previous);
        assert_eq!(parse_command("q"), WatchCommand::Quit);
        assert_eq!(parse_command(""), WatchCommand::Help);
    }

    #[test]
    fn test_drain_empties_receiver() {
        let mut movies = MovieStore::new();
        let mut events = movies.subscribe();
        movies.toggle_season(1);
        movies.reset_current_episode();

        drain_events(&mut events);
        assert!(matches!(
            events.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[test]
    fn test_parse_rejects_bad_arguments() {
        assert!(matches!(parse_command("e 0"), WatchCommand::Unknown(_)));
        assert!(matches!(parse_command("s two"), WatchCommand::Unknown(_)));
        assert!(matches!(parse_command("n 1"), WatchCommand::Unknown(_)));
    }
}
