//! Catalog preflight check.

use super::CheckResult;
use crate::models::config::CatalogConfig;
use crate::services::catalog::{CatalogClient, CatalogSource};

/// Check that the catalog document loads.
pub async fn check(config: &CatalogConfig) -> CheckResult {
    let client = match CatalogClient::from_config(config) {
        Ok(client) => client,
        Err(e) => {
            return CheckResult::fail(
                "Catalog",
                &format!("client setup failed: {}", e),
                "Check the catalog settings in config.toml",
            )
        }
    };

    match client.fetch_catalog().await {
        Ok(catalog) => CheckResult::ok(
            "Catalog",
            &format!("{} entries from {}", catalog.len(), client.location()),
        ),
        Err(e) => CheckResult::fail(
            "Catalog",
            &format!("cannot load {}: {}", client.location(), e),
            "Set TOON_CATALOG_URL to a reachable URL or a local JSON file",
        ),
    }
}
