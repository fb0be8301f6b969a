//! Threads platform implementation
//!
//! Meta's Graph API publishes in two steps: create a media container,
//! then publish it by id. Both steps carry the parameters as query
//! strings, access token included, which is how the Graph API wants
//! them even on POST.
//!
//! The Graph API reports expired or revoked tokens as HTTP 400 with an
//! `OAuthException` error body, so token problems are sniffed out of
//! the body before the status code is consulted.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::{PlatformError, Result};
use crate::platforms::{
    extract_error_message, map_provider_status, map_provider_transport, PlatformPoster,
};
use crate::types::Platform;

const DEFAULT_BASE_URL: &str = "https://graph.threads.net/v1.0";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Long-lived Graph API access for one Threads account
#[derive(Debug, Clone)]
pub struct ThreadsCredentials {
    pub user_id: String,
    pub access_token: String,
}

pub struct ThreadsPoster {
    client: reqwest::Client,
    credentials: ThreadsCredentials,
    base_url: String,
}

impl ThreadsPoster {
    /// Create a new Threads poster
    ///
    /// # Arguments
    ///
    /// * `credentials` - Threads user id and long-lived access token
    pub fn new(credentials: ThreadsCredentials) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                PlatformError::Network(format!("Failed to build Threads HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            credentials,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Point the poster at a different Graph API host
    ///
    /// Tests use this to aim at a local mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn containers_url(&self) -> String {
        format!("{}/{}/threads", self.base_url, self.credentials.user_id)
    }

    fn publish_url(&self) -> String {
        format!(
            "{}/{}/threads_publish",
            self.base_url, self.credentials.user_id
        )
    }

    /// One Graph API POST, with OAuthException promoted to an
    /// authentication error regardless of HTTP status
    async fn graph_post(&self, url: &str, params: &[(&str, &str)], context: &str) -> Result<Value> {
        let response = self
            .client
            .post(url)
            .query(params)
            .send()
            .await
            .map_err(|e| map_provider_transport(Platform::Threads, context, &e))?;

        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);

        if status.is_success() {
            return Ok(body);
        }

        let detail =
            extract_error_message(&body).unwrap_or_else(|| format!("HTTP {}", status.as_u16()));

        let error_type = body
            .pointer("/error/type")
            .and_then(Value::as_str)
            .unwrap_or("");
        if error_type == "OAuthException" {
            return Err(PlatformError::Authentication(format!(
                "Threads authentication failed ({}): {}",
                context, detail
            ))
            .into());
        }

        Err(map_provider_status(Platform::Threads, context, status.as_u16(), &detail).into())
    }
}

#[async_trait]
impl PlatformPoster for ThreadsPoster {
    fn platform(&self) -> Platform {
        Platform::Threads
    }

    async fn post(&self, content: &str) -> Result<Value> {
        tracing::debug!(
            "Creating Threads container: {} characters",
            content.chars().count()
        );

        let creation = self
            .graph_post(
                &self.containers_url(),
                &[
                    ("media_type", "TEXT"),
                    ("text", content),
                    ("access_token", &self.credentials.access_token),
                ],
                "container creation",
            )
            .await?;

        let creation_id = creation
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                PlatformError::Posting(
                    "Threads container response did not include an id".to_string(),
                )
            })?
            .to_string();

        tracing::debug!("Publishing Threads container {}", creation_id);

        let publication = self
            .graph_post(
                &self.publish_url(),
                &[
                    ("creation_id", &creation_id),
                    ("access_token", &self.credentials.access_token),
                ],
                "publication",
            )
            .await?;

        Ok(json!({
            "creation": creation,
            "publication": publication,
        }))
    }
}
