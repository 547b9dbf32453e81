//! Favorites command implementation.
//!
//! Favorites are stored in ~/.local/share/toon_catalog/storage.json

use super::load_catalog;
use crate::models::config::Config;
use crate::services::catalog::CatalogClient;
use crate::state::favorites::FavoritesStore;
use crate::storage::FileStore;
use crate::Result;
use colored::Colorize;

fn open(config: &Config) -> Result<FavoritesStore<FileStore>> {
    FavoritesStore::load(FileStore::open(&config.storage_dir)?)
}

/// List favorites.
pub async fn list(config: &Config) -> Result<()> {
    let store = open(config)?;

    println!("{}", "★ Favorites".bold().yellow());
    println!();

    if store.is_empty() {
        println!("No favorites yet.");
        return Ok(());
    }

    for fav in store.favorites() {
        println!("  {:<20} {}", fav.id, fav.title);
    }
    Ok(())
}

/// Add a catalog entry to favorites.
pub async fn add(config: &Config, id: &str) -> Result<()> {
    let client = CatalogClient::from_config(&config.catalog)?;
    let catalog = load_catalog(&client).await?;

    let Some(entry) = catalog.find(id) else {
        println!("{} {}", "Not in catalog:".red(), id);
        return Ok(());
    };

    let mut store = open(config)?;
    if store.add_favorite(entry.clone())? {
        println!("{} Added {}", "★".yellow(), entry.title.bold());
    } else {
        println!("{} is already a favorite", entry.title.bold());
    }
    Ok(())
}

/// Remove an entry from favorites.
pub async fn remove(config: &Config, id: &str) -> Result<()> {
    let mut store = open(config)?;
    let was_favorite = store.is_favorite(id);
    store.remove_favorite(id)?;

    if was_favorite {
        println!("☆ Removed {}", id);
    } else {
        println!("{} is not a favorite", id);
    }
    Ok(())
}
