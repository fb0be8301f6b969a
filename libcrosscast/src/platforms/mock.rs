//! Mock poster for testing
//!
//! A scriptable `PlatformPoster` that succeeds, fails with a chosen
//! error, or stalls for a configured delay, while recording every call
//! for later assertions. The gateway's integration tests mount these
//! instead of real posters, so no test needs platform credentials or
//! outbound network access.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::time::sleep;

use crate::error::{PlatformError, Result};
use crate::platforms::PlatformPoster;
use crate::types::Platform;

/// Configuration for mock poster behavior
#[derive(Debug, Clone)]
pub struct MockConfig {
    /// Platform this mock stands in for
    pub platform: Platform,

    /// Error to return instead of succeeding
    pub post_error: Option<PlatformError>,

    /// Delay before completing (simulates provider latency)
    pub delay: Duration,

    /// Number of times post has been called
    pub post_call_count: Arc<Mutex<usize>>,

    /// Content that has been posted (for verification)
    pub posted_content: Arc<Mutex<Vec<String>>>,
}

impl MockConfig {
    fn for_platform(platform: Platform) -> Self {
        Self {
            platform,
            post_error: None,
            delay: Duration::from_millis(0),
            post_call_count: Arc::new(Mutex::new(0)),
            posted_content: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

/// Mock poster for testing
pub struct MockPoster {
    config: MockConfig,
}

impl MockPoster {
    /// Create a mock poster with the given configuration
    pub fn new(config: MockConfig) -> Self {
        Self { config }
    }

    /// Create a mock poster that always succeeds
    pub fn success(platform: Platform) -> Self {
        Self::new(MockConfig::for_platform(platform))
    }

    /// Create a mock poster that fails with the given error
    pub fn failure(platform: Platform, error: PlatformError) -> Self {
        Self::new(MockConfig {
            post_error: Some(error),
            ..MockConfig::for_platform(platform)
        })
    }

    /// Create a mock poster that succeeds after a delay
    pub fn with_delay(platform: Platform, delay: Duration) -> Self {
        Self::new(MockConfig {
            delay,
            ..MockConfig::for_platform(platform)
        })
    }

    /// Get the number of times post was called
    pub fn post_call_count(&self) -> usize {
        *self.config.post_call_count.lock().unwrap()
    }

    /// Get all content that was posted
    pub fn posted_content(&self) -> Vec<String> {
        self.config.posted_content.lock().unwrap().clone()
    }

    /// Handles shared with this poster, usable for assertions after
    /// the poster itself has been moved into a server
    pub fn call_recorder(&self) -> (Arc<Mutex<usize>>, Arc<Mutex<Vec<String>>>) {
        (
            Arc::clone(&self.config.post_call_count),
            Arc::clone(&self.config.posted_content),
        )
    }
}

#[async_trait]
impl PlatformPoster for MockPoster {
    fn platform(&self) -> Platform {
        self.config.platform
    }

    async fn post(&self, content: &str) -> Result<Value> {
        *self.config.post_call_count.lock().unwrap() += 1;

        if !self.config.delay.is_zero() {
            sleep(self.config.delay).await;
        }

        if let Some(error) = &self.config.post_error {
            return Err(error.clone().into());
        }

        self.config
            .posted_content
            .lock()
            .unwrap()
            .push(content.to_string());

        Ok(json!({
            "id": format!("mock-{}", uuid::Uuid::new_v4()),
            "platform": self.config.platform.name(),
        }))
    }
}
