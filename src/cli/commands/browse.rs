//! Browse commands: catalog listing and title details.

use super::{load_catalog, spinner};
use crate::models::catalog::{CatalogEntry, Season};
use crate::models::config::Config;
use crate::router::Router;
use crate::services::catalog::CatalogClient;
use crate::state::favorites::FavoritesStore;
use crate::state::movie::{DetailStatus, MovieStore};
use crate::storage::FileStore;
use crate::Result;
use colored::Colorize;

/// List every title in the catalog.
pub async fn list(config: &Config) -> Result<()> {
    let client = CatalogClient::from_config(&config.catalog)?;
    let catalog = load_catalog(&client).await?;
    let favorites = FavoritesStore::load(FileStore::open(&config.storage_dir)?)?;

    println!("{}", "📺 Catalog".bold().cyan());
    println!();

    if catalog.is_empty() {
        println!("The catalog is empty.");
        return Ok(());
    }

    println!(
        "{:<3} {:<20} {:<40} {:<8} {}",
        "",
        "ID".bold(),
        "Title".bold(),
        "Seasons".bold(),
        "Episodes".bold()
    );
    println!("{}", "-".repeat(80));

    for entry in &catalog.entries {
        let star = if favorites.is_favorite(&entry.id) {
            "★".yellow().to_string()
        } else {
            " ".to_string()
        };
        println!(
            "{:<3} {:<20} {:<40} {:<8} {}",
            star,
            entry.id,
            entry.title,
            entry.seasons.len(),
            entry.episode_count()
        );
    }

    println!();
    println!("{} titles, {} favorites", catalog.len(), favorites.len());
    Ok(())
}

/// Show one title through the movie detail route.
pub async fn show(config: &Config, id: &str, season: Option<u32>) -> Result<()> {
    let client = CatalogClient::from_config(&config.catalog)?;
    let mut router = Router::with_default_routes()?;
    let mut movies = MovieStore::new();

    let pb = spinner("Loading details...");
    router
        .navigate(&movie_path(id), &mut movies, &client)
        .await?;
    pb.finish_and_clear();

    println!("{} {}", "🎬".bold(), router.document_title().bold().cyan());
    println!();

    let Some(entry) = movies.selected_entry() else {
        print_unavailable(movies.status());
        return Ok(());
    };

    print_entry(entry, season);
    Ok(())
}

/// Route path for a catalog entry.
pub(crate) fn movie_path(id: &str) -> String {
    format!("/movie/{}", urlencoding::encode(id))
}

pub(crate) fn print_unavailable(status: &DetailStatus) {
    match status {
        DetailStatus::Failed(reason) => {
            println!("{} ({})", "Details unavailable".red(), reason);
        }
        _ => println!("{}", "Details unavailable".yellow()),
    }
}

pub(crate) fn print_entry(entry: &CatalogEntry, only_season: Option<u32>) {
    if let Some(year) = entry.year {
        println!("  {} {}", "Year:".bold(), year);
    }
    if !entry.genres.is_empty() {
        println!("  {} {}", "Genres:".bold(), entry.genres.join(", "));
    }
    if let Some(ref description) = entry.description {
        println!("  {}", description);
    }
    println!();

    if entry.seasons.is_empty() {
        println!("No episodes yet.");
        return;
    }

    for season in &entry.seasons {
        let expanded = only_season.map_or(true, |n| n == season.ordinal);
        print_season(season, expanded);
    }
}

pub(crate) fn print_season(season: &Season, expanded: bool) {
    let marker = if expanded { "▼" } else { "▶" };
    println!(
        "{} {} ({} episodes)",
        marker,
        format!("Season {}", season.ordinal).bold(),
        season.episodes.len()
    );
    if !expanded {
        return;
    }
    for (i, episode) in season.episodes.iter().enumerate() {
        match episode.url {
            Some(ref url) => println!("  {}. {} {}", i + 1, episode.label, url.dimmed()),
            None => println!("  {}. {}", i + 1, episode.label),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_path_encodes_id() {
        assert_eq!(movie_path("42"), "/movie/42");
        assert_eq!(movie_path("a b/c"), "/movie/a%20b%2Fc");
    }
}
