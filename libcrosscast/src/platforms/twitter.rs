//! Twitter/X platform implementation
//!
//! Posts through the v2 `/2/tweets` endpoint, authenticated with
//! OAuth 1.0a user context. The JSON body stays out of the signature,
//! so the header is computed over the URL and oauth parameters alone.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::{PlatformError, Result};
use crate::platforms::oauth1::{self, OAuth1Keys};
use crate::platforms::{
    extract_error_message, map_provider_status, map_provider_transport, PlatformPoster,
};
use crate::types::Platform;

const DEFAULT_BASE_URL: &str = "https://api.twitter.com";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// OAuth 1.0a user-context credentials (app keys plus access tokens)
#[derive(Debug, Clone)]
pub struct TwitterCredentials {
    pub api_key: String,
    pub api_secret: String,
    pub access_token: String,
    pub access_secret: String,
}

pub struct TwitterPoster {
    client: reqwest::Client,
    credentials: TwitterCredentials,
    base_url: String,
}

impl TwitterPoster {
    /// Create a new Twitter poster
    ///
    /// # Arguments
    ///
    /// * `credentials` - Consumer keys and access tokens from the
    ///   developer portal
    pub fn new(credentials: TwitterCredentials) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                PlatformError::Network(format!("Failed to build Twitter HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            credentials,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Point the poster at a different API host
    ///
    /// Tests use this to aim at a local mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn tweets_url(&self) -> String {
        format!("{}/2/tweets", self.base_url)
    }

    fn signing_keys(&self) -> OAuth1Keys {
        OAuth1Keys {
            consumer_key: self.credentials.api_key.clone(),
            consumer_secret: self.credentials.api_secret.clone(),
            token: self.credentials.access_token.clone(),
            token_secret: self.credentials.access_secret.clone(),
        }
    }
}

#[async_trait]
impl PlatformPoster for TwitterPoster {
    fn platform(&self) -> Platform {
        Platform::Twitter
    }

    async fn post(&self, content: &str) -> Result<Value> {
        let url = self.tweets_url();
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let authorization = oauth1::authorization_header(
            &self.signing_keys(),
            "POST",
            &url,
            &[],
            &oauth1::nonce(),
            &timestamp,
        );

        tracing::debug!("Posting tweet: {} characters", content.chars().count());

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, authorization)
            .json(&json!({ "text": content }))
            .send()
            .await
            .map_err(|e| map_provider_transport(Platform::Twitter, "tweet creation", &e))?;

        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);

        if status.is_success() {
            // v2 wraps the created tweet in a "data" object
            let data = body.get("data").cloned().unwrap_or(body);
            tracing::debug!(
                "Tweet created: {}",
                data.get("id").and_then(serde_json::Value::as_str).unwrap_or("<no id>")
            );
            return Ok(data);
        }

        let detail =
            extract_error_message(&body).unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
        Err(map_provider_status(Platform::Twitter, "tweet creation", status.as_u16(), &detail).into())
    }
}
