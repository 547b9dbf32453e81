//! Chat data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A chat message as stored under `messages/<id>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message id (also the database key).
    #[serde(default)]
    pub id: String,
    /// Display name of the author.
    pub author: String,
    /// Account id of the author, when signed in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    /// Message body.
    pub text: String,
    /// When the message was sent.
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a new message stamped with the current time.
    pub fn new(author: &str, uid: Option<&str>, text: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            author: author.to_string(),
            uid: uid.map(|s| s.to_string()),
            text: text.to_string(),
            sent_at: Utc::now(),
        }
    }
}
