//! Event system for publish progress tracking
//!
//! An in-process event bus distributing per-platform publish progress
//! to subscribers without blocking the fan-out itself.
//!
//! # Architecture
//!
//! The bus uses `tokio::sync::broadcast` for multi-subscriber support.
//! The publish orchestrator emits events as each platform's request
//! fires and resolves; any number of subscribers (TUI status rows, CLI
//! progress output) can consume them.
//!
//! # Non-Blocking Behavior
//!
//! If no subscribers exist, events are dropped immediately. Lagging
//! subscribers never block emitters.
//!
//! # Example
//!
//! ```no_run
//! use libcrosscast::events::{Event, EventBus};
//! use libcrosscast::types::Platform;
//!
//! # async fn example() {
//! let bus = EventBus::new(100);
//! let mut receiver = bus.subscribe();
//!
//! bus.emit(Event::PublishStarted {
//!     publish_id: "abc123".to_string(),
//!     platforms: vec![Platform::Twitter, Platform::Bluesky],
//! });
//!
//! if let Ok(event) = receiver.recv().await {
//!     println!("Received: {:?}", event);
//! }
//! # }
//! ```

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::types::{Platform, PublishStatus};

/// Event receiver type alias
pub type EventReceiver = broadcast::Receiver<Event>;

/// Event bus for distributing publish progress events
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl EventBus {
    /// Create a new event bus with the specified capacity
    ///
    /// The capacity determines how many events can be buffered per
    /// subscriber before older events are dropped (if the subscriber
    /// is lagging).
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to events
    ///
    /// Returns a receiver that will receive all events emitted after
    /// subscription. Multiple subscribers are supported.
    pub fn subscribe(&self) -> EventReceiver {
        self.sender.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Non-blocking. If no subscribers exist, the event is dropped
    /// immediately; lagging subscribers lose oldest events first.
    pub fn emit(&self, event: Event) {
        // send() errs when nobody is listening, which is fine
        let _ = self.sender.send(event);
    }

    /// Number of active subscribers. Debugging aid, not control flow.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Events emitted over the course of one publish fan-out
///
/// All events carry the publish correlation id so consumers can filter
/// interleaved publishes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A fan-out was accepted and is about to fire
    PublishStarted {
        publish_id: String,
        /// Platforms in the fan-out set
        platforms: Vec<Platform>,
    },

    /// One platform's status changed (loading, then success or error)
    PlatformStatusChanged {
        publish_id: String,
        platform: Platform,
        status: PublishStatus,
        /// Provider-supplied failure detail, when the status is `Error`
        #[serde(default, skip_serializing_if = "Option::is_none")]
        detail: Option<String>,
    },

    /// Every platform's request has settled
    PublishSettled {
        publish_id: String,
        outcomes: Vec<PlatformOutcome>,
        /// True iff at least one platform succeeded; callers clear the
        /// draft on this flag
        any_success: bool,
    },
}

/// Settled result of posting to a single platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformOutcome {
    pub platform: Platform,
    pub success: bool,
    /// Envelope data returned by the gateway (if successful)
    pub data: Option<serde_json::Value>,
    /// Error message (if failed)
    pub error: Option<String>,
}

impl PlatformOutcome {
    /// The status this outcome settles its platform into.
    pub fn status(&self) -> PublishStatus {
        if self.success {
            PublishStatus::Success
        } else {
            PublishStatus::Error
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_event_emission_and_subscription() {
        let bus = EventBus::new(10);
        let mut receiver = bus.subscribe();

        bus.emit(Event::PublishStarted {
            publish_id: "test123".to_string(),
            platforms: vec![Platform::Twitter],
        });

        let received = receiver.recv().await.unwrap();
        match received {
            Event::PublishStarted {
                publish_id,
                platforms,
            } => {
                assert_eq!(publish_id, "test123");
                assert_eq!(platforms, vec![Platform::Twitter]);
            }
            _ => panic!("Wrong event type received"),
        }
    }

    #[tokio::test]
    async fn test_multiple_subscribers_see_same_event() {
        let bus = EventBus::new(10);
        let mut receiver1 = bus.subscribe();
        let mut receiver2 = bus.subscribe();

        bus.emit(Event::PlatformStatusChanged {
            publish_id: "test456".to_string(),
            platform: Platform::Bluesky,
            status: PublishStatus::Loading,
            detail: None,
        });

        for receiver in [&mut receiver1, &mut receiver2] {
            match receiver.recv().await.unwrap() {
                Event::PlatformStatusChanged {
                    publish_id,
                    platform,
                    status,
                    detail,
                } => {
                    assert_eq!(publish_id, "test456");
                    assert_eq!(platform, Platform::Bluesky);
                    assert_eq!(status, PublishStatus::Loading);
                    assert!(detail.is_none());
                }
                _ => panic!("Wrong event type received"),
            }
        }
    }

    #[tokio::test]
    async fn test_emit_without_subscribers_is_noop() {
        let bus = EventBus::new(10);

        bus.emit(Event::PublishStarted {
            publish_id: "test789".to_string(),
            platforms: vec![Platform::Threads],
        });

        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_event_serialization() {
        let event = Event::PlatformStatusChanged {
            publish_id: "serial_test".to_string(),
            platform: Platform::Twitter,
            status: PublishStatus::Error,
            detail: Some("Network timeout".to_string()),
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("platform_status_changed"));
        assert!(json.contains("twitter"));
        assert!(json.contains("Network timeout"));

        let deserialized: Event = serde_json::from_str(&json).unwrap();
        match deserialized {
            Event::PlatformStatusChanged {
                platform, status, ..
            } => {
                assert_eq!(platform, Platform::Twitter);
                assert_eq!(status, PublishStatus::Error);
            }
            _ => panic!("Deserialization failed"),
        }
    }

    #[tokio::test]
    async fn test_settled_event_round_trip() {
        let event = Event::PublishSettled {
            publish_id: "settled".to_string(),
            outcomes: vec![
                PlatformOutcome {
                    platform: Platform::Twitter,
                    success: true,
                    data: Some(serde_json::json!({"id": "1"})),
                    error: None,
                },
                PlatformOutcome {
                    platform: Platform::Bluesky,
                    success: false,
                    data: None,
                    error: Some("Rate limited".to_string()),
                },
            ],
            any_success: true,
        };

        let json = serde_json::to_string(&event).unwrap();
        let deserialized: Event = serde_json::from_str(&json).unwrap();
        match deserialized {
            Event::PublishSettled {
                outcomes,
                any_success,
                ..
            } => {
                assert!(any_success);
                assert_eq!(outcomes.len(), 2);
                assert_eq!(outcomes[0].status(), PublishStatus::Success);
                assert_eq!(outcomes[1].status(), PublishStatus::Error);
                assert_eq!(outcomes[1].error.as_deref(), Some("Rate limited"));
            }
            _ => panic!("Deserialization failed"),
        }
    }

    #[tokio::test]
    async fn test_subscriber_count() {
        let bus = EventBus::new(10);
        assert_eq!(bus.subscriber_count(), 0);

        let _receiver1 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);

        let _receiver2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);
    }
}
