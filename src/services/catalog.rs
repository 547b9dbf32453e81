//! Catalog fetch client.
//!
//! The catalog is one static JSON document listing every entry. It is served
//! over HTTP in production and can be read from disk for local use.

use crate::models::catalog::Catalog;
use crate::models::config::CatalogConfig;
use crate::{Error, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Anything that can produce the full catalog.
#[allow(async_fn_in_trait)]
pub trait CatalogSource {
    /// Fetch and parse the whole catalog document.
    async fn fetch_catalog(&self) -> Result<Catalog>;
}

/// Catalog served over HTTP.
pub struct HttpCatalog {
    url: String,
    client: reqwest::Client,
}

impl HttpCatalog {
    /// Create a client for a catalog URL.
    pub fn new(url: &str, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            url: url.to_string(),
            client,
        })
    }
}

impl CatalogSource for HttpCatalog {
    async fn fetch_catalog(&self) -> Result<Catalog> {
        tracing::debug!("Fetching catalog from {}", self.url);
        let response = self.client.get(&self.url).send().await?;
        check_status(&self.url, response.status())?;
        let catalog: Catalog = response.json().await?;
        tracing::debug!("Catalog loaded: {} entries", catalog.len());
        Ok(catalog)
    }
}

/// Reject non-success responses so they surface as an unavailable catalog.
fn check_status(url: &str, status: reqwest::StatusCode) -> Result<()> {
    if status.is_success() {
        Ok(())
    } else {
        Err(Error::CatalogUnavailable(format!("{} returned {}", url, status)))
    }
}

/// Catalog stored in a local file.
pub struct FileCatalog {
    path: PathBuf,
}

impl FileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogSource for FileCatalog {
    async fn fetch_catalog(&self) -> Result<Catalog> {
        tracing::debug!("Reading catalog from {:?}", self.path);
        let content = tokio::fs::read_to_string(&self.path).await?;
        Catalog::from_json(&content)
    }
}

/// Catalog client chosen from the configured location.
pub enum CatalogClient {
    Http(HttpCatalog),
    File(FileCatalog),
}

impl CatalogClient {
    /// `http://` and `https://` locations are fetched, anything else is a path.
    pub fn from_config(config: &CatalogConfig) -> Result<Self> {
        let url = config.url.trim();
        if url.starts_with("http://") || url.starts_with("https://") {
            Ok(CatalogClient::Http(HttpCatalog::new(url, config.timeout_secs)?))
        } else {
            let path = url.strip_prefix("file://").unwrap_or(url);
            Ok(CatalogClient::File(FileCatalog::new(path)))
        }
    }

    /// Human-readable location.
    pub fn location(&self) -> String {
        match self {
            CatalogClient::Http(http) => http.url.clone(),
            CatalogClient::File(file) => file.path.display().to_string(),
        }
    }
}

impl CatalogSource for CatalogClient {
    async fn fetch_catalog(&self) -> Result<Catalog> {
        match self {
            CatalogClient::Http(http) => http.fetch_catalog().await,
            CatalogClient::File(file) => file.fetch_catalog().await,
        }
    }
}

/// A catalog already held in memory.
impl CatalogSource for Catalog {
    async fn fetch_catalog(&self) -> Result<Catalog> {
        Ok(self.clone())
    }
}
