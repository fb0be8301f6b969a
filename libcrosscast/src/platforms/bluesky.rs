//! Bluesky platform implementation
//!
//! Speaks AT Protocol XRPC directly over HTTP: an app-password login
//! against `com.atproto.server.createSession`, then
//! `com.atproto.repo.createRecord` with the session's bearer token.
//! Sessions are not cached; each post logs in fresh, which keeps the
//! poster stateless at the cost of one extra round trip.

use async_trait::async_trait;
use chrono::SecondsFormat;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{PlatformError, Result};
use crate::platforms::{
    extract_error_message, map_provider_status, map_provider_transport, PlatformPoster,
};
use crate::types::Platform;

pub const DEFAULT_SERVICE_URL: &str = "https://bsky.social";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// App-password credentials for an AT Protocol account
#[derive(Debug, Clone)]
pub struct BlueskyCredentials {
    /// PDS base URL, usually `https://bsky.social`
    pub service: String,
    /// Handle or DID, e.g. "user.bsky.social"
    pub identifier: String,
    /// App password created in Bluesky settings
    pub password: String,
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    #[serde(rename = "accessJwt")]
    access_jwt: String,
    did: String,
}

pub struct BlueskyPoster {
    client: reqwest::Client,
    credentials: BlueskyCredentials,
}

impl BlueskyPoster {
    /// Create a new Bluesky poster
    ///
    /// # Arguments
    ///
    /// * `credentials` - Service URL, handle, and app password
    pub fn new(credentials: BlueskyCredentials) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                PlatformError::Network(format!("Failed to build Bluesky HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            credentials,
        })
    }

    /// Point the poster at a different PDS
    ///
    /// Tests use this to aim at a local mock server.
    pub fn with_base_url(mut self, service: impl Into<String>) -> Self {
        self.credentials.service = service.into().trim_end_matches('/').to_string();
        self
    }

    fn xrpc_url(&self, method: &str) -> String {
        format!(
            "{}/xrpc/{}",
            self.credentials.service.trim_end_matches('/'),
            method
        )
    }

    /// Log in with the app password, yielding the bearer token and DID
    async fn create_session(&self) -> Result<SessionResponse> {
        tracing::debug!(
            "Creating Bluesky session for {}",
            self.credentials.identifier
        );

        let response = self
            .client
            .post(self.xrpc_url("com.atproto.server.createSession"))
            .json(&json!({
                "identifier": self.credentials.identifier,
                "password": self.credentials.password,
            }))
            .send()
            .await
            .map_err(|e| map_provider_transport(Platform::Bluesky, "session creation", &e))?;

        let status = response.status();
        if !status.is_success() {
            let body: Value = response.json().await.unwrap_or(Value::Null);
            let detail =
                extract_error_message(&body).unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
            return Err(map_provider_status(
                Platform::Bluesky,
                "session creation",
                status.as_u16(),
                &detail,
            )
            .into());
        }

        let session = response.json::<SessionResponse>().await.map_err(|e| {
            PlatformError::Posting(format!("Unreadable session response from Bluesky: {}", e))
        })?;

        tracing::debug!("Bluesky session created for {}", session.did);
        Ok(session)
    }
}

#[async_trait]
impl PlatformPoster for BlueskyPoster {
    fn platform(&self) -> Platform {
        Platform::Bluesky
    }

    async fn post(&self, content: &str) -> Result<Value> {
        let session = self.create_session().await?;

        tracing::debug!("Posting to Bluesky: {} characters", content.chars().count());

        let response = self
            .client
            .post(self.xrpc_url("com.atproto.repo.createRecord"))
            .bearer_auth(&session.access_jwt)
            .json(&json!({
                "repo": session.did,
                "collection": "app.bsky.feed.post",
                "record": {
                    "$type": "app.bsky.feed.post",
                    "text": content,
                    "createdAt": chrono::Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                },
            }))
            .send()
            .await
            .map_err(|e| map_provider_transport(Platform::Bluesky, "record creation", &e))?;

        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);

        if status.is_success() {
            tracing::debug!(
                "Posted to Bluesky: {}",
                body.get("uri").and_then(serde_json::Value::as_str).unwrap_or("<no uri>")
            );
            return Ok(body);
        }

        let detail =
            extract_error_message(&body).unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
        Err(map_provider_status(Platform::Bluesky, "record creation", status.as_u16(), &detail).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_credentials() -> BlueskyCredentials {
        BlueskyCredentials {
            service: DEFAULT_SERVICE_URL.to_string(),
            identifier: "user.bsky.social".to_string(),
            password: "app-password".to_string(),
        }
    }

    #[test]
    fn test_xrpc_url_join() {
        let poster = BlueskyPoster::new(test_credentials()).unwrap();
        assert_eq!(
            poster.xrpc_url("com.atproto.server.createSession"),
            "https://bsky.social/xrpc/com.atproto.server.createSession"
        );
    }

    #[test]
    fn test_with_base_url_trims_trailing_slash() {
        let poster = BlueskyPoster::new(test_credentials())
            .unwrap()
            .with_base_url("http://127.0.0.1:9000/");
        assert_eq!(
            poster.xrpc_url("com.atproto.repo.createRecord"),
            "http://127.0.0.1:9000/xrpc/com.atproto.repo.createRecord"
        );
    }

    #[test]
    fn test_platform_is_bluesky() {
        let poster = BlueskyPoster::new(test_credentials()).unwrap();
        assert_eq!(poster.platform(), Platform::Bluesky);
    }

    #[test]
    fn test_session_response_field_names() {
        let parsed: SessionResponse = serde_json::from_value(json!({
            "accessJwt": "jwt-token",
            "did": "did:plc:abc123",
            "handle": "user.bsky.social",
        }))
        .unwrap();

        assert_eq!(parsed.access_jwt, "jwt-token");
        assert_eq!(parsed.did, "did:plc:abc123");
    }
}
