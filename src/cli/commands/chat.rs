//! Chat command implementation.

use super::auth::stored_session;
use super::spinner;
use crate::models::config::Config;
use crate::services::chat::{default_author, ChatClient};
use crate::Result;
use colored::Colorize;

fn client(config: &Config) -> Result<ChatClient> {
    let database_url = config
        .identity
        .database_url
        .as_deref()
        .ok_or(crate::Error::IdentityNotConfigured)?;
    Ok(ChatClient::new(database_url, config.chat_clear_password.clone()))
}

/// Print every message.
pub async fn list(config: &Config) -> Result<()> {
    let client = client(config)?;

    let pb = spinner("Loading messages...");
    let result = client.list_messages().await;
    pb.finish_and_clear();
    let messages = result?;

    println!("{}", "💬 Chat".bold().cyan());
    println!();

    if messages.is_empty() {
        println!("No messages yet.");
        return Ok(());
    }

    for message in &messages {
        println!(
            "{} {}: {}",
            message.sent_at.format("%Y-%m-%d %H:%M").to_string().dimmed(),
            message.author.bold(),
            message.text
        );
    }
    Ok(())
}

/// Send a message.
pub async fn send(config: &Config, text: &str, author: Option<&str>) -> Result<()> {
    let client = client(config)?;
    let session = stored_session(config)?;

    let author = match (author, session.as_ref()) {
        (Some(name), _) => name.to_string(),
        (None, Some(session)) => session.display_name_or_email().to_string(),
        (None, None) => default_author(),
    };

    let message = client.post_message(session.as_ref(), &author, text).await?;
    println!("{} {}", "Sent as".green(), message.author.bold());
    Ok(())
}

/// Delete every message.
pub async fn clear(config: &Config, password: &str) -> Result<()> {
    client(config)?.clear_messages(password).await?;
    println!("{}", "Chat cleared".green());
    Ok(())
}
