//! Service layer adapter for the TUI
//!
//! Bridges the async `PublishService` to the synchronous event loop.
//!
//! # Architecture
//!
//! - `ServiceHandle`: Owns the `PublishService` and a tokio runtime
//! - Publishing: Spawns the fan-out on the runtime, returns a crossbeam
//!   channel the sync loop drains with `try_recv`
//! - Progress: A forwarder task copies this publish's bus events onto
//!   the channel, filtered by correlation id
//!
//! # Example
//!
//! ```no_run
//! use crosscast_tui::services::ServiceHandle;
//! use libcrosscast::config::Config;
//! use libcrosscast::types::Platform;
//!
//! # fn example() -> crosscast_tui::error::Result<()> {
//! let config = Config::load_or_default()?;
//! let services = ServiceHandle::from_config(&config)?;
//!
//! let (publish_id, updates) = services.publish(
//!     "Hello, everywhere!".to_string(),
//!     vec![Platform::Twitter, Platform::Bluesky],
//! );
//!
//! // In the event loop, drain without blocking
//! while let Ok(update) = updates.try_recv() {
//!     // Handle update
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use libcrosscast::client::GatewayClient;
use libcrosscast::config::Config;
use libcrosscast::events::Event;
use libcrosscast::publish::{PublishRequest, PublishService};
use libcrosscast::types::Platform;

use crate::app::Action;
use crate::error::Result;

/// One message on the publish channel
#[derive(Debug, Clone)]
pub enum PublishUpdate {
    /// Progress or settlement from the event bus
    Event(Event),

    /// The fan-out never started; a guard tripped before any network
    /// traffic
    Rejected(String),
}

/// Service handle for TUI operations
///
/// Wraps the publish service and provides sync/async bridges for the
/// event loop. Owns a tokio runtime so async operations never block
/// the UI thread.
pub struct ServiceHandle {
    service: Arc<PublishService>,
    runtime: tokio::runtime::Runtime,
}

impl ServiceHandle {
    /// Create a service handle from the loaded configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the tokio runtime cannot be created or the
    /// gateway URL in the configuration is unusable.
    pub fn from_config(config: &Config) -> Result<Self> {
        let runtime = tokio::runtime::Runtime::new()?;
        let client = GatewayClient::from_config(config)?;

        Ok(Self {
            service: Arc::new(PublishService::new(client)),
            runtime,
        })
    }

    /// Start one publish fan-out without blocking
    ///
    /// Returns the correlation id and a receiver carrying this
    /// publish's updates: per-platform status changes, the settled
    /// batch, or a single `Rejected` if the fan-out never started.
    /// The channel closes once the publish settles either way.
    ///
    /// The event subscription is taken before the fan-out task is
    /// spawned, so no update can slip past the receiver.
    pub fn publish(
        &self,
        content: String,
        platforms: Vec<Platform>,
    ) -> (String, Receiver<PublishUpdate>) {
        let (tx, rx) = unbounded();

        let request = PublishRequest::new(content, platforms);
        let publish_id = request.id.clone();

        let mut events = self.service.events().subscribe();
        let forward_tx = tx.clone();
        let forward_id = publish_id.clone();
        let forwarder = self.runtime.spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        let matches_publish = match &event {
                            Event::PublishStarted { publish_id, .. } => publish_id == &forward_id,
                            Event::PlatformStatusChanged { publish_id, .. } => {
                                publish_id == &forward_id
                            }
                            Event::PublishSettled { publish_id, .. } => publish_id == &forward_id,
                        };
                        if !matches_publish {
                            continue;
                        }

                        let settled = matches!(event, Event::PublishSettled { .. });
                        if forward_tx.send(PublishUpdate::Event(event)).is_err() {
                            // Receiver dropped, stop forwarding
                            break;
                        }
                        if settled {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "event receiver lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });

        let service = Arc::clone(&self.service);
        self.runtime.spawn(async move {
            match service.publish(request).await {
                Ok(report) => {
                    // Settlement already reached the channel via the bus
                    info!(publish_id = %report.publish_id, "publish task finished");
                }
                Err(e) => {
                    forwarder.abort();
                    let _ = tx.send(PublishUpdate::Rejected(e.to_string()));
                }
            }
        });

        (publish_id, rx)
    }
}

/// Map a publish update to its action, if any
///
/// `PublishStarted` maps to nothing: the event loop dispatches that
/// action itself the moment `publish` returns, so the echo from the
/// bus would double up.
pub fn publish_update_action(update: PublishUpdate) -> Option<Action> {
    match update {
        PublishUpdate::Event(Event::PublishStarted { .. }) => None,
        PublishUpdate::Event(Event::PlatformStatusChanged {
            platform,
            status,
            detail,
            ..
        }) => Some(Action::PlatformStatus {
            platform,
            status,
            detail,
        }),
        PublishUpdate::Event(Event::PublishSettled {
            outcomes,
            any_success,
            ..
        }) => Some(Action::PublishSettled {
            outcomes,
            any_success,
        }),
        PublishUpdate::Rejected(error) => Some(Action::PublishRejected { error }),
    }
}
