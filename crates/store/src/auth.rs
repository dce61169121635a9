//! Password sign-in, sign-out and user lookup against the store's auth API.

use chrono::{TimeZone, Utc};
use dishbook_core::types::Timestamp;
use serde::Deserialize;
use uuid::Uuid;

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::rest;

/// The signed-in user as reported by the auth API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

/// Token grant returned by a successful sign-in.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    /// Lifetime of `access_token` in seconds.
    pub expires_in: i64,
    /// Absolute expiry (Unix seconds), when the server includes it.
    #[serde(default)]
    pub expires_at: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: AuthUser,
}

impl AuthSession {
    /// When the access token stops being valid, relative to `issued_at`
    /// if the server did not send an absolute expiry.
    pub fn expiry(&self, issued_at: Timestamp) -> Timestamp {
        self.expires_at
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
            .unwrap_or_else(|| issued_at + chrono::Duration::seconds(self.expires_in))
    }
}

/// HTTP client for the auth endpoints under `/auth/v1`.
#[derive(Debug, Clone)]
pub struct AuthApi {
    client: reqwest::Client,
    config: StoreConfig,
}

impl AuthApi {
    pub fn new(config: StoreConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: StoreConfig) -> Self {
        Self { client, config }
    }

    /// Exchange an email and password for a session.
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, StoreError> {
        let response = self
            .client
            .post(self.config.endpoint("/auth/v1/token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.config.api_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        let session: AuthSession = rest::parse_response(response).await?;
        tracing::info!(user_id = %session.user.id, "Signed in");
        Ok(session)
    }

    /// Revoke the session behind `access_token`.
    pub async fn sign_out(&self, access_token: &str) -> Result<(), StoreError> {
        let request = self.client.post(self.config.endpoint("/auth/v1/logout"));
        let response = rest::authorize(request, &self.config, Some(access_token))
            .send()
            .await?;
        rest::check_status(response).await
    }

    /// The user behind `access_token`. A 401 means the session has expired.
    pub async fn get_user(&self, access_token: &str) -> Result<AuthUser, StoreError> {
        let request = self.client.get(self.config.endpoint("/auth/v1/user"));
        let response = rest::authorize(request, &self.config, Some(access_token))
            .send()
            .await?;
        rest::parse_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(expires_at: Option<i64>) -> AuthSession {
        AuthSession {
            access_token: "t".into(),
            token_type: Some("bearer".into()),
            expires_in: 3600,
            expires_at,
            refresh_token: None,
            user: AuthUser {
                id: Uuid::nil(),
                email: None,
            },
        }
    }

    #[test]
    fn absolute_expiry_preferred() {
        let issued = Utc.timestamp_opt(1_000, 0).unwrap();
        assert_eq!(session(Some(5_000)).expiry(issued).timestamp(), 5_000);
    }

    #[test]
    fn relative_expiry_used_as_fallback() {
        let issued = Utc.timestamp_opt(1_000, 0).unwrap();
        assert_eq!(session(None).expiry(issued).timestamp(), 4_600);
    }
}
