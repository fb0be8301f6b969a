//! Crosscast - compose once, post everywhere
//!
//! This library provides core functionality for cross-posting short
//! text to multiple social platforms at once: draft measurement
//! against per-platform character limits, platform selection, and a
//! concurrent fan-out publisher that reports per-platform outcomes.

pub mod client;
pub mod config;
pub mod draft;
pub mod error;
pub mod events;
pub mod logging;
pub mod platforms;
pub mod progress;
pub mod publish;
pub mod selection;
pub mod types;

// Re-export commonly used types
pub use client::GatewayClient;
pub use config::Config;
pub use error::{ConfigError, CrosscastError, PlatformError, Result};
pub use events::{Event, EventBus, PlatformOutcome};
pub use publish::{PublishReport, PublishRequest, PublishService};
pub use types::{Platform, PostEnvelope, PublishStatus, StatusMap};
