//! Route command implementation.

use super::spinner;
use crate::models::config::Config;
use crate::router::Router;
use crate::services::catalog::CatalogClient;
use crate::state::movie::MovieStore;
use crate::Result;
use colored::Colorize;

/// Resolve a path and navigate to it.
pub async fn route(config: &Config, path: &str) -> Result<()> {
    let client = CatalogClient::from_config(&config.catalog)?;
    let mut router = Router::with_default_routes()?;
    let mut movies = MovieStore::new();

    let pb = spinner(&format!("Navigating to {}", path));
    let result = router.navigate(path, &mut movies, &client).await;
    pb.finish_and_clear();
    let nav = result?;

    println!("{} {}", "Route:".bold(), nav.route_name);
    println!("{} {:?}", "View:".bold(), nav.view);
    println!("{} {}", "Title:".bold(), nav.title);

    let mut params: Vec<_> = nav.params.iter().collect();
    params.sort();
    for (name, value) in params {
        println!("  {} = {}", name.cyan(), value);
    }
    if let Some(outcome) = nav.fetch {
        println!("{} {:?}", "Fetch:".bold(), outcome);
    }

    Ok(())
}
