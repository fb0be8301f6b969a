//! Publish fan-out orchestration
//!
//! One publish attempt fans a single text payload out to every
//! selected platform concurrently, tracks per-platform status through
//! the event bus, and reports the settled batch. Per-platform failures
//! are independent and non-fatal; the orchestrator itself only errors
//! on its synchronous precondition checks.

use std::sync::atomic::{AtomicBool, Ordering};

use futures::future::join_all;
use tracing::{info, warn};

use crate::client::GatewayClient;
use crate::error::{CrosscastError, Result};
use crate::events::{Event, EventBus, PlatformOutcome};
use crate::types::{reset_statuses, Platform, PublishStatus, StatusMap};

/// One fan-out request: trimmed text plus the selected platform set,
/// tagged with a correlation id that every emitted event carries.
#[derive(Debug, Clone)]
pub struct PublishRequest {
    pub id: String,
    pub content: String,
    pub platforms: Vec<Platform>,
}

impl PublishRequest {
    pub fn new(content: impl Into<String>, platforms: Vec<Platform>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            content: content.into(),
            platforms,
        }
    }
}

/// Settled result of one fan-out
#[derive(Debug, Clone)]
pub struct PublishReport {
    pub publish_id: String,
    pub outcomes: Vec<PlatformOutcome>,
    /// True iff at least one platform in the settled batch succeeded.
    /// Callers clear the draft on this flag.
    pub any_success: bool,
}

impl PublishReport {
    /// The final status map: untouched platforms `Idle`, attempted
    /// platforms `Success` or `Error` per their outcome.
    pub fn statuses(&self) -> StatusMap {
        let mut statuses = reset_statuses();
        for outcome in &self.outcomes {
            statuses.insert(outcome.platform, outcome.status());
        }
        statuses
    }
}

/// Releases the in-flight gate on every exit path, panics included.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Fan-out publisher over the gateway
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
///
/// use libcrosscast::client::GatewayClient;
/// use libcrosscast::publish::{PublishRequest, PublishService};
/// use libcrosscast::types::Platform;
///
/// # async fn example() -> libcrosscast::error::Result<()> {
/// let client = GatewayClient::new("http://127.0.0.1:8787", Duration::from_secs(30))?;
/// let service = PublishService::new(client);
///
/// let request = PublishRequest::new(
///     "Hello, everywhere!",
///     vec![Platform::Twitter, Platform::Bluesky],
/// );
/// let report = service.publish(request).await?;
/// if report.any_success {
///     println!("posted to at least one platform");
/// }
/// # Ok(())
/// # }
/// ```
pub struct PublishService {
    client: GatewayClient,
    events: EventBus,
    in_flight: AtomicBool,
}

impl PublishService {
    pub fn new(client: GatewayClient) -> Self {
        Self::with_events(client, EventBus::new(100))
    }

    /// Use an externally owned event bus (shared with other services)
    pub fn with_events(client: GatewayClient, events: EventBus) -> Self {
        Self {
            client,
            events,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Whether a fan-out is currently in flight
    pub fn is_publishing(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Run one fan-out and wait for every platform to settle
    ///
    /// Guards (no network traffic when any of them trips):
    /// - content empty after trimming -> `InvalidInput`
    /// - no platform selected -> `InvalidInput`
    /// - a fan-out already in flight -> `PublishInFlight`
    ///
    /// All selected platforms are attempted concurrently and the call
    /// returns only once every request has settled; one platform's
    /// failure never cancels or delays the others.
    pub async fn publish(&self, request: PublishRequest) -> Result<PublishReport> {
        let content = request.content.trim().to_string();
        if content.is_empty() {
            return Err(CrosscastError::InvalidInput(
                "Content cannot be empty".to_string(),
            ));
        }
        if request.platforms.is_empty() {
            return Err(CrosscastError::InvalidInput(
                "Select at least one platform".to_string(),
            ));
        }
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(CrosscastError::PublishInFlight);
        }
        let _gate = InFlightGuard(&self.in_flight);

        info!(
            publish_id = %request.id,
            platforms = ?request.platforms,
            chars = content.chars().count(),
            "starting publish fan-out"
        );
        self.events.emit(Event::PublishStarted {
            publish_id: request.id.clone(),
            platforms: request.platforms.clone(),
        });

        let futures: Vec<_> = request
            .platforms
            .iter()
            .map(|platform| {
                let platform = *platform;
                let content = content.clone();
                let publish_id = request.id.clone();
                async move {
                    self.events.emit(Event::PlatformStatusChanged {
                        publish_id: publish_id.clone(),
                        platform,
                        status: PublishStatus::Loading,
                        detail: None,
                    });

                    match self.client.post(platform, &content).await {
                        Ok(data) => {
                            info!(platform = platform.name(), "publish succeeded");
                            self.events.emit(Event::PlatformStatusChanged {
                                publish_id,
                                platform,
                                status: PublishStatus::Success,
                                detail: None,
                            });
                            PlatformOutcome {
                                platform,
                                success: true,
                                data: Some(data),
                                error: None,
                            }
                        }
                        Err(e) => {
                            warn!(platform = platform.name(), error = %e, "publish failed");
                            self.events.emit(Event::PlatformStatusChanged {
                                publish_id,
                                platform,
                                status: PublishStatus::Error,
                                detail: Some(e.to_string()),
                            });
                            PlatformOutcome {
                                platform,
                                success: false,
                                data: None,
                                error: Some(e.to_string()),
                            }
                        }
                    }
                }
            })
            .collect();

        // Wait for all, regardless of individual failure
        let outcomes = join_all(futures).await;

        let any_success = outcomes.iter().any(|o| o.success);
        info!(
            publish_id = %request.id,
            any_success,
            failed = outcomes.iter().filter(|o| !o.success).count(),
            "publish settled"
        );
        self.events.emit(Event::PublishSettled {
            publish_id: request.id.clone(),
            outcomes: outcomes.clone(),
            any_success,
        });

        Ok(PublishReport {
            publish_id: request.id,
            outcomes,
            any_success,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn service() -> PublishService {
        // Points at a closed port; guard tests never reach the network.
        let client = GatewayClient::new("http://127.0.0.1:1", Duration::from_secs(1)).unwrap();
        PublishService::new(client)
    }

    #[tokio::test]
    async fn test_empty_content_is_invalid_input() {
        let service = service();
        let request = PublishRequest::new("", vec![Platform::Twitter]);

        let result = service.publish(request).await;
        assert!(matches!(result, Err(CrosscastError::InvalidInput(_))));
        assert!(!service.is_publishing());
    }

    #[tokio::test]
    async fn test_whitespace_only_content_is_invalid_input() {
        let service = service();
        let request = PublishRequest::new("   \n\t  ", vec![Platform::Twitter]);

        let result = service.publish(request).await;
        assert!(matches!(result, Err(CrosscastError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_no_platforms_is_invalid_input() {
        let service = service();
        let request = PublishRequest::new("hello", vec![]);

        let result = service.publish(request).await;
        match result {
            Err(CrosscastError::InvalidInput(message)) => {
                assert!(message.contains("at least one platform"));
            }
            _ => panic!("Expected InvalidInput"),
        }
    }

    #[tokio::test]
    async fn test_guard_failure_leaves_gate_released() {
        let service = service();

        let result = service
            .publish(PublishRequest::new("", vec![Platform::Twitter]))
            .await;
        assert!(result.is_err());
        assert!(!service.is_publishing());

        // A later attempt still gets past the gate (and fails on the
        // unreachable gateway instead of PublishInFlight).
        let result = service
            .publish(PublishRequest::new("hello", vec![Platform::Twitter]))
            .await
            .unwrap();
        assert!(!result.any_success);
        assert!(!service.is_publishing());
    }

    #[tokio::test]
    async fn test_unreachable_gateway_settles_as_errors_not_err() {
        let service = service();
        let request = PublishRequest::new("hello", vec![Platform::Twitter, Platform::Bluesky]);

        let report = service.publish(request).await.unwrap();
        assert!(!report.any_success);
        assert_eq!(report.outcomes.len(), 2);
        for outcome in &report.outcomes {
            assert!(!outcome.success);
            assert!(outcome.error.is_some());
        }
    }

    #[test]
    fn test_request_ids_are_unique() {
        let a = PublishRequest::new("x", vec![Platform::Twitter]);
        let b = PublishRequest::new("x", vec![Platform::Twitter]);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_report_statuses_cover_all_platforms() {
        let report = PublishReport {
            publish_id: "p1".to_string(),
            outcomes: vec![
                PlatformOutcome {
                    platform: Platform::Twitter,
                    success: true,
                    data: None,
                    error: None,
                },
                PlatformOutcome {
                    platform: Platform::Bluesky,
                    success: false,
                    data: None,
                    error: Some("boom".to_string()),
                },
            ],
            any_success: true,
        };

        let statuses = report.statuses();
        assert_eq!(statuses[&Platform::Twitter], PublishStatus::Success);
        assert_eq!(statuses[&Platform::Bluesky], PublishStatus::Error);
        // Unattempted platforms stay idle.
        assert_eq!(statuses[&Platform::Threads], PublishStatus::Idle);
    }
}
