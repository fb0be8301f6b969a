//! Gateway HTTP server
//!
//! One POST route per platform, all answering the same envelope
//! contract: `{success, data?, error?}` with the HTTP status carrying
//! the error class. The composer side never sees provider APIs or
//! credentials, only these envelopes.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use serde_json::{json, Value};
use tracing::{info, warn};

use libcrosscast::error::{CrosscastError, PlatformError, Result};
use libcrosscast::platforms::{
    BlueskyPoster, PlatformPoster, ThreadsPoster, TwitterPoster,
};
use libcrosscast::types::{Platform, PostEnvelope};

use crate::config::GatewayConfig;

/// Posters for every configured platform, shared across requests
pub struct GatewayState {
    posters: BTreeMap<Platform, Box<dyn PlatformPoster>>,
}

impl GatewayState {
    /// Build posters from startup configuration
    pub fn from_config(config: &GatewayConfig) -> Result<Self> {
        let mut state = Self::empty();

        if let Some(credentials) = &config.twitter {
            state = state.with_poster(Box::new(TwitterPoster::new(credentials.clone())?));
        }
        if let Some(credentials) = &config.bluesky {
            state = state.with_poster(Box::new(BlueskyPoster::new(credentials.clone())?));
        }
        if let Some(credentials) = &config.threads {
            state = state.with_poster(Box::new(ThreadsPoster::new(credentials.clone())?));
        }

        Ok(state)
    }

    /// A state serving no platforms
    pub fn empty() -> Self {
        Self {
            posters: BTreeMap::new(),
        }
    }

    /// Register a poster, replacing any existing one for its platform
    ///
    /// Tests use this to mount mocks.
    pub fn with_poster(mut self, poster: Box<dyn PlatformPoster>) -> Self {
        self.posters.insert(poster.platform(), poster);
        self
    }

    pub fn configured_platforms(&self) -> Vec<Platform> {
        self.posters.keys().copied().collect()
    }

    fn poster(&self, platform: Platform) -> Option<&dyn PlatformPoster> {
        self.posters.get(&platform).map(Box::as_ref)
    }
}

/// Build the gateway router over shared state
pub fn build_router(state: Arc<GatewayState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/twitter", post(post_twitter))
        .route("/api/bluesky", post(post_bluesky))
        .route("/api/threads", post(post_threads))
        .with_state(state)
}

async fn health(State(state): State<Arc<GatewayState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "platforms": state
            .configured_platforms()
            .iter()
            .map(|p| p.name())
            .collect::<Vec<_>>(),
    }))
}

async fn post_twitter(
    State(state): State<Arc<GatewayState>>,
    body: Bytes,
) -> (StatusCode, Json<PostEnvelope>) {
    handle_publish(state, Platform::Twitter, body).await
}

async fn post_bluesky(
    State(state): State<Arc<GatewayState>>,
    body: Bytes,
) -> (StatusCode, Json<PostEnvelope>) {
    handle_publish(state, Platform::Bluesky, body).await
}

async fn post_threads(
    State(state): State<Arc<GatewayState>>,
    body: Bytes,
) -> (StatusCode, Json<PostEnvelope>) {
    handle_publish(state, Platform::Threads, body).await
}

/// Shared endpoint behavior: extract content, delegate to the poster,
/// wrap the outcome in an envelope
///
/// The body is parsed by hand rather than through the `Json`
/// extractor so that malformed requests still receive an envelope
/// instead of a framework rejection. Content must be a non-blank
/// string under the `content` key; any other body shape is a 400.
/// Length policing is left to the providers, whose rejections come
/// back as validation envelopes.
async fn handle_publish(
    state: Arc<GatewayState>,
    platform: Platform,
    body: Bytes,
) -> (StatusCode, Json<PostEnvelope>) {
    let parsed: Option<Value> = serde_json::from_slice(&body).ok();
    let content = parsed
        .as_ref()
        .and_then(|value| value.get("content"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|c| !c.is_empty());

    let content = match content {
        Some(content) => content,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(PostEnvelope::err("Content is required")),
            );
        }
    };

    let poster = match state.poster(platform) {
        Some(poster) => poster,
        None => {
            warn!(platform = platform.name(), "request for unconfigured platform");
            let error = PlatformError::NotConfigured(platform.display_name().to_string());
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(PostEnvelope::err(error.to_string())),
            );
        }
    };

    info!(
        platform = platform.name(),
        chars = content.chars().count(),
        "forwarding post"
    );

    match poster.post(content).await {
        Ok(data) => (StatusCode::OK, Json(PostEnvelope::ok(data))),
        Err(error) => {
            warn!(platform = platform.name(), error = %error, "post failed");
            (error_status(&error), Json(PostEnvelope::err(error.to_string())))
        }
    }
}

/// HTTP status for a failed post, by error class
fn error_status(error: &CrosscastError) -> StatusCode {
    match error {
        CrosscastError::Platform(PlatformError::Authentication(_)) => StatusCode::UNAUTHORIZED,
        CrosscastError::Platform(PlatformError::Validation(_)) => StatusCode::BAD_REQUEST,
        CrosscastError::Platform(PlatformError::RateLimit(_)) => StatusCode::TOO_MANY_REQUESTS,
        CrosscastError::Platform(PlatformError::NotConfigured(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        CrosscastError::Platform(PlatformError::Network(_))
        | CrosscastError::Platform(PlatformError::Posting(_)) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
