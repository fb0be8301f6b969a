//! HTTP client for the gateway proxy endpoints.
//!
//! This is the composer side of the wire contract: one `POST
//! /api/{platform}` with `{"content": text}` per platform, answered by
//! a `{success, data?, error?}` envelope. Any non-2xx status,
//! `success: false`, or unreadable body counts as a platform failure.

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::json;
use tracing::debug;

use crate::config::Config;
use crate::error::{PlatformError, Result};
use crate::types::{Platform, PostEnvelope};

/// Map a gateway response status to a PlatformError
///
/// The gateway mirrors provider failures onto HTTP statuses, so the
/// status carries the classification and the envelope `error` carries
/// the human-readable detail.
fn map_status_error(platform: Platform, status: StatusCode, detail: String) -> PlatformError {
    match status.as_u16() {
        401 | 403 => PlatformError::Authentication(format!(
            "{} rejected the credentials: {}",
            platform.display_name(),
            detail
        )),
        400 | 422 => PlatformError::Validation(format!(
            "{} rejected the content: {}",
            platform.display_name(),
            detail
        )),
        429 => PlatformError::RateLimit(format!(
            "{} rate limit hit: {}",
            platform.display_name(),
            detail
        )),
        _ => PlatformError::Posting(format!(
            "{} publish failed: {}",
            platform.display_name(),
            detail
        )),
    }
}

/// Map a reqwest transport failure to a PlatformError
fn map_transport_error(platform: Platform, error: &reqwest::Error) -> PlatformError {
    if error.is_timeout() || error.is_connect() {
        PlatformError::Network(format!(
            "Could not reach the gateway for {}: {}",
            platform.display_name(),
            error
        ))
    } else {
        PlatformError::Posting(format!(
            "Gateway request for {} failed: {}",
            platform.display_name(),
            error
        ))
    }
}

/// Client for the crosscast-gateway HTTP service
#[derive(Clone)]
pub struct GatewayClient {
    http: reqwest::Client,
    base_url: String,
}

impl GatewayClient {
    /// Create a client for the gateway at `base_url`
    ///
    /// The timeout is the only timeout in the system; the publish
    /// orchestrator imposes none of its own.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PlatformError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create a client from the loaded client configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.gateway.url.clone(),
            Duration::from_secs(config.gateway.timeout_secs),
        )
    }

    /// The proxy endpoint URL for one platform
    pub fn endpoint(&self, platform: Platform) -> String {
        format!("{}/api/{}", self.base_url, platform.name())
    }

    /// Submit trimmed text to one platform's proxy endpoint
    ///
    /// Returns the envelope `data` on success. Errors never cancel or
    /// delay sibling requests; the fan-out catches them per platform.
    pub async fn post(&self, platform: Platform, content: &str) -> Result<serde_json::Value> {
        let url = self.endpoint(platform);
        debug!(platform = platform.name(), %url, "submitting post to gateway");

        let response = self
            .http
            .post(&url)
            .json(&json!({ "content": content }))
            .send()
            .await
            .map_err(|e| map_transport_error(platform, &e))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| map_transport_error(platform, &e))?;

        match serde_json::from_slice::<PostEnvelope>(&body) {
            Ok(envelope) if status.is_success() && envelope.success => {
                Ok(envelope.data.unwrap_or(serde_json::Value::Null))
            }
            Ok(envelope) => {
                let detail = envelope.error.unwrap_or_else(|| format!("HTTP {}", status));
                Err(map_status_error(platform, status, detail).into())
            }
            Err(_) if status.is_success() => Err(PlatformError::Posting(format!(
                "{} gateway returned an unreadable response",
                platform.display_name()
            ))
            .into()),
            Err(_) => Err(map_status_error(platform, status, format!("HTTP {}", status)).into()),
        }
    }
}
