//! Auth command implementation.
//!
//! The signed-in session is kept in persistent storage so later chat
//! commands can post under the account.

use crate::models::config::Config;
use crate::services::identity::{IdentityClient, Session};
use crate::storage::{FileStore, KeyValueStore, SESSION_KEY};
use crate::Result;
use colored::Colorize;

/// Sign in to an existing account.
pub async fn sign_in(config: &Config, email: &str, password: &str) -> Result<()> {
    let client = IdentityClient::new(config.identity.clone());
    let session = client.sign_in(email, password).await?;
    remember(config, &session)?;

    println!("{} {}", "Signed in as".green(), session.display_name_or_email().bold());
    Ok(())
}

/// Create an account, optionally setting its display name.
pub async fn sign_up(config: &Config, email: &str, password: &str, name: Option<&str>) -> Result<()> {
    let client = IdentityClient::new(config.identity.clone());
    let mut session = client.sign_up(email, password).await?;

    if let Some(name) = name {
        client.update_profile(&mut session, name).await?;
    }
    remember(config, &session)?;

    println!("{} {}", "Account created for".green(), session.display_name_or_email().bold());
    Ok(())
}

/// Load the stored session, if any.
pub fn stored_session(config: &Config) -> Result<Option<Session>> {
    let store = FileStore::open(&config.storage_dir)?;
    match store.get(SESSION_KEY)? {
        Some(json) => match serde_json::from_str(&json) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                tracing::warn!("Ignoring stored session: {}", e);
                Ok(None)
            }
        },
        None => Ok(None),
    }
}

fn remember(config: &Config, session: &Session) -> Result<()> {
    let mut store = FileStore::open(&config.storage_dir)?;
    store.set(SESSION_KEY, &serde_json::to_string(session)?)
}
