//! CLI command implementations.

pub mod auth;
pub mod browse;
pub mod chat;
pub mod favorites;
pub mod release;
pub mod route;
pub mod watch;

use crate::models::catalog::Catalog;
use crate::services::catalog::{CatalogClient, CatalogSource};
use crate::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner shown while the catalog loads.
pub(crate) fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Fetch the whole catalog with a spinner.
pub(crate) async fn load_catalog(client: &CatalogClient) -> Result<Catalog> {
    let pb = spinner(&format!("Loading catalog from {}", client.location()));
    let result = client.fetch_catalog().await;
    pb.finish_and_clear();
    result
}
