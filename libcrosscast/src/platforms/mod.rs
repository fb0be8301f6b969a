//! Upstream platform posters
//!
//! Each poster translates a generic "post this text" request into one
//! platform's native API call. The gateway holds one poster per
//! configured platform; everything credential-shaped stays here so the
//! composer side of the system never sees it.
//!
//! # Examples
//!
//! ```no_run
//! use libcrosscast::platforms::{BlueskyCredentials, BlueskyPoster, PlatformPoster};
//!
//! # async fn example() -> libcrosscast::error::Result<()> {
//! let poster = BlueskyPoster::new(BlueskyCredentials {
//!     service: "https://bsky.social".to_string(),
//!     identifier: "user.bsky.social".to_string(),
//!     password: "app-password".to_string(),
//! })?;
//!
//! let data = poster.post("Hello, decentralized world!").await?;
//! println!("created record: {}", data);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;

use crate::error::{PlatformError, Result};
use crate::types::Platform;

pub mod bluesky;
pub mod oauth1;
pub mod threads;
pub mod twitter;

// Mock poster is available for all builds to support integration tests
pub mod mock;

pub use bluesky::{BlueskyCredentials, BlueskyPoster};
pub use mock::MockPoster;
pub use threads::{ThreadsCredentials, ThreadsPoster};
pub use twitter::{TwitterCredentials, TwitterPoster};

/// A client for one platform's native posting API
///
/// Implementations are constructed from full credentials, so a poster
/// that exists is a poster that can try to post. Authentication
/// happens per request (OAuth signing, session login); failures come
/// back as `PlatformError` variants that the gateway maps onto HTTP
/// statuses.
#[async_trait]
pub trait PlatformPoster: Send + Sync {
    /// The platform this poster serves
    fn platform(&self) -> Platform;

    /// Post content to the platform
    ///
    /// Returns provider response data to be carried in the envelope's
    /// `data` field.
    ///
    /// # Errors
    ///
    /// - `PlatformError::Authentication` when the provider rejects the
    ///   credentials
    /// - `PlatformError::Validation` when the provider rejects the
    ///   content
    /// - `PlatformError::RateLimit` when the provider throttles
    /// - `PlatformError::Network` when the provider is unreachable
    /// - `PlatformError::Posting` for other provider failures
    async fn post(&self, content: &str) -> Result<serde_json::Value>;
}

/// Classify an upstream provider HTTP status into a PlatformError
///
/// # Arguments
///
/// * `platform` - The platform being posted to
/// * `context` - The operation context (e.g., "create session")
/// * `status` - The provider's HTTP status code
/// * `detail` - Human-readable detail mined from the response body
pub(crate) fn map_provider_status(
    platform: Platform,
    context: &str,
    status: u16,
    detail: &str,
) -> PlatformError {
    let name = platform.display_name();
    match status {
        401 | 403 => PlatformError::Authentication(format!(
            "{} authentication failed ({}): {}",
            name, context, detail
        )),
        400 | 422 => PlatformError::Validation(format!(
            "{} rejected the request ({}): {}",
            name, context, detail
        )),
        429 => PlatformError::RateLimit(format!(
            "{} rate limit exceeded ({}): {}",
            name, context, detail
        )),
        _ => PlatformError::Posting(format!(
            "{} request failed ({}): HTTP {}: {}",
            name, context, status, detail
        )),
    }
}

/// Classify a reqwest transport failure into a PlatformError
pub(crate) fn map_provider_transport(
    platform: Platform,
    context: &str,
    error: &reqwest::Error,
) -> PlatformError {
    let name = platform.display_name();
    if error.is_timeout() || error.is_connect() {
        PlatformError::Network(format!(
            "Network error while reaching {} ({}): {}",
            name, context, error
        ))
    } else {
        PlatformError::Posting(format!("{} request failed ({}): {}", name, context, error))
    }
}

/// Mine a human-readable error message out of a provider error body
///
/// Providers disagree on shape; the fallback chain covers the Graph
/// API (`error.message`), XRPC (`message`), and Twitter
/// (`detail`/`title`) conventions.
pub(crate) fn extract_error_message(body: &serde_json::Value) -> Option<String> {
    body.pointer("/error/message")
        .or_else(|| body.get("message"))
        .or_else(|| body.get("detail"))
        .or_else(|| body.get("title"))
        .or_else(|| body.get("error"))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}
