//! Error types for the catalog browser.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the catalog browser.
#[derive(Error, Debug)]
pub enum Error {
    // Catalog errors
    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(String),

    // Storage errors
    #[error("Stored value for '{key}' is corrupt: {reason}")]
    StorageCorrupt { key: String, reason: String },

    // Identity errors
    #[error("Identity service not configured. Set FIREBASE_API_KEY environment variable")]
    IdentityNotConfigured,

    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    // Chat errors
    #[error("Chat request rejected: {0}")]
    ChatRejected(String),

    // Routing errors
    #[error("No route matches path: {0}")]
    InvalidRoute(String),

    // Automation errors
    #[error("Invalid version string: {0}")]
    InvalidVersion(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Config errors
    #[error("Config error: {0}")]
    TomlDe(#[from] toml::de::Error),
}
