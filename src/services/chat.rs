//! Chat client backed by the hosted realtime database.
//!
//! Messages live under `<database>/messages/<id>.json`.

use crate::models::chat::ChatMessage;
use crate::services::identity::Session;
use crate::Result;
use std::collections::HashMap;

/// Chat client.
pub struct ChatClient {
    database_url: String,
    clear_password: Option<String>,
    client: reqwest::Client,
}

impl ChatClient {
    /// Create a client for a database URL.
    pub fn new(database_url: &str, clear_password: Option<String>) -> Self {
        Self {
            database_url: database_url.trim_end_matches('/').to_string(),
            clear_password,
            client: reqwest::Client::new(),
        }
    }

    fn messages_url(&self, suffix: &str, session: Option<&Session>) -> String {
        let mut url = format!("{}/messages{}.json", self.database_url, suffix);
        if let Some(session) = session {
            url.push_str(&format!("?auth={}", urlencoding::encode(&session.id_token)));
        }
        url
    }

    /// Fetch all messages, oldest first.
    pub async fn list_messages(&self) -> Result<Vec<ChatMessage>> {
        let url = self.messages_url("", None);
        let resp: Option<HashMap<String, ChatMessage>> = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(sort_messages(resp.unwrap_or_default()))
    }

    /// Post a message as `author`.
    pub async fn post_message(
        &self,
        session: Option<&Session>,
        author: &str,
        text: &str,
    ) -> Result<ChatMessage> {
        let text = text.trim();
        if text.is_empty() {
            return Err(crate::Error::ChatRejected("empty message".to_string()));
        }

        let message = ChatMessage::new(author, session.map(|s| s.local_id.as_str()), text);
        let url = self.messages_url(&format!("/{}", message.id), session);

        self.client
            .put(&url)
            .json(&message)
            .send()
            .await?
            .error_for_status()?;

        tracing::debug!("Posted chat message {}", message.id);
        Ok(message)
    }

    /// Delete every message. Requires the configured clear password.
    pub async fn clear_messages(&self, password: &str) -> Result<()> {
        self.check_clear_password(password)?;

        let url = self.messages_url("", None);
        self.client.delete(&url).send().await?.error_for_status()?;

        tracing::info!("Chat history cleared");
        Ok(())
    }

    fn check_clear_password(&self, password: &str) -> Result<()> {
        match self.clear_password.as_deref() {
            Some(expected) if !expected.is_empty() && expected == password => Ok(()),
            Some(expected) if !expected.is_empty() => {
                Err(crate::Error::ChatRejected("wrong clear password".to_string()))
            }
            _ => Err(crate::Error::ChatRejected(
                "clearing is disabled: CHAT_CLEAR_PASSWORD not set".to_string(),
            )),
        }
    }
}

/// Default author name for anonymous messages.
pub fn default_author() -> String {
    whoami::username()
}

fn sort_messages(messages: HashMap<String, ChatMessage>) -> Vec<ChatMessage> {
    let mut list: Vec<ChatMessage> = messages
        .into_iter()
        .map(|(key, mut message)| {
            if message.id.is_empty() {
                message.id = key;
            }
            message
        })
        .collect();
    list.sort_by(|a, b| a.sent_at.cmp(&b.sent_at).then_with(|| a.id.cmp(&b.id)));
    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[tokio::test]
    async fn test_clear_rejects_wrong_password() {
        let client = ChatClient::new("http://127.0.0.1:9", Some("letmein".to_string()));
        let result = client.clear_messages("nope").await;
        assert!(matches!(result, Err(crate::Error::ChatRejected(_))));
    }

    #[tokio::test]
    async fn test_clear_disabled_without_password() {
        let client = ChatClient::new("http://127.0.0.1:9", None);
        let result = client.clear_messages("").await;
        assert!(matches!(result, Err(crate::Error::ChatRejected(_))));
    }

    #[tokio::test]
    async fn test_empty_message_rejected() {
        let client = ChatClient::new("http://127.0.0.1:9/", None);
        let result = client.post_message(None, "me", "   ").await;
        assert!(matches!(result, Err(crate::Error::ChatRejected(_))));
    }

    #[test]
    fn test_messages_sorted_and_keyed() {
        let mut messages = HashMap::new();
        let mut late = ChatMessage::new("b", None, "second");
        late.sent_at = chrono::Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let mut early = ChatMessage::new("a", None, "first");
        early.id = String::new();
        early.sent_at = chrono::Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        messages.insert(late.id.clone(), late);
        messages.insert("k1".to_string(), early);

        let sorted = sort_messages(messages);
        assert_eq!(sorted[0].text, "first");
        assert_eq!(sorted[0].id, "k1");
        assert_eq!(sorted[1].text, "second");
    }

    #[test]
    fn test_messages_url_trims_slash() {
        let client = ChatClient::new("https://db.example.com/", None);
        assert_eq!(client.messages_url("", None), "https://db.example.com/messages.json");
    }
}
