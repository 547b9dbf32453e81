//! Identity service client.
//!
//! Thin wrapper over the hosted identity REST API. Account management and
//! password checks happen on the service; this client only forwards requests
//! and hands back the resulting session.

use crate::models::config::FirebaseConfig;
use crate::Result;
use serde::{Deserialize, Serialize};

const IDENTITY_BASE_URL: &str = "https://identitytoolkit.googleapis.com/v1";

/// A signed-in account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id_token: String,
    pub local_id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl Session {
    /// Name to show next to chat messages.
    pub fn display_name_or_email(&self) -> &str {
        match self.display_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.email,
        }
    }
}

/// Credentials request payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CredentialsRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

/// Profile update payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProfileRequest<'a> {
    id_token: &'a str,
    display_name: &'a str,
    return_secure_token: bool,
}

/// Profile update response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileResponse {
    #[serde(default)]
    display_name: Option<String>,
}

/// Error envelope returned by the service.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Identity service client.
pub struct IdentityClient {
    config: FirebaseConfig,
    client: reqwest::Client,
}

impl IdentityClient {
    /// Initialize the identity service from configuration.
    pub fn new(config: FirebaseConfig) -> Self {
        if config.api_key.is_none() {
            tracing::warn!("Identity service has no API key; sign-in is disabled");
        }
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Whether an API key is available.
    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    fn endpoint(&self, action: &str) -> Result<String> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(crate::Error::IdentityNotConfigured)?;
        Ok(format!(
            "{}/accounts:{}?key={}",
            IDENTITY_BASE_URL,
            action,
            urlencoding::encode(api_key)
        ))
    }

    /// Create a new account.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<Session> {
        self.credentials("signUp", email, password).await
    }

    /// Sign in with email and password.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        self.credentials("signInWithPassword", email, password).await
    }

    async fn credentials(&self, action: &str, email: &str, password: &str) -> Result<Session> {
        let url = self.endpoint(action)?;
        let request = CredentialsRequest {
            email,
            password,
            return_secure_token: true,
        };

        let resp = self.client.post(&url).json(&request).send().await?;
        if !resp.status().is_success() {
            return Err(auth_error(resp).await);
        }

        let session: Session = resp.json().await?;
        tracing::info!("Signed in as {}", session.email);
        Ok(session)
    }

    /// Set the display name on the signed-in profile.
    pub async fn update_profile(&self, session: &mut Session, display_name: &str) -> Result<()> {
        let url = self.endpoint("update")?;
        let request = ProfileRequest {
            id_token: &session.id_token,
            display_name,
            return_secure_token: false,
        };

        let resp = self.client.post(&url).json(&request).send().await?;
        if !resp.status().is_success() {
            return Err(auth_error(resp).await);
        }

        let profile: ProfileResponse = resp.json().await?;
        session.display_name = profile.display_name.or_else(|| Some(display_name.to_string()));
        Ok(())
    }
}

/// Turn an error response into an auth error with the service's message.
async fn auth_error(resp: reqwest::Response) -> crate::Error {
    let status = resp.status();
    let message = match resp.json::<ErrorEnvelope>().await {
        Ok(envelope) => envelope.error.message,
        Err(_) => status.to_string(),
    };
    crate::Error::AuthFailed(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sign_in_without_api_key() {
        let client = IdentityClient::new(FirebaseConfig::default());
        assert!(!client.is_configured());

        let result = client.sign_in("a@b.c", "secret").await;
        assert!(matches!(result, Err(crate::Error::IdentityNotConfigured)));
    }

    #[test]
    fn test_session_from_service_response() {
        let session: Session = serde_json::from_str(
            r#"{"idToken":"tok","localId":"uid1","email":"a@b.c","refreshToken":"r","expiresIn":"3600"}"#,
        )
        .unwrap();
        assert_eq!(session.local_id, "uid1");
        assert_eq!(session.display_name_or_email(), "a@b.c");
    }
}
