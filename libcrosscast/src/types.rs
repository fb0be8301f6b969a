//! Core types shared across the workspace: the platform set, publish
//! statuses, and the gateway wire envelope.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CrosscastError;

/// One external target network. The set is closed; per-platform
/// behavior hangs off this enum rather than dynamic dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Twitter,
    Bluesky,
    Threads,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Twitter, Platform::Bluesky, Platform::Threads];

    /// Lowercase wire name, also the gateway route segment.
    pub fn name(&self) -> &'static str {
        match self {
            Platform::Twitter => "twitter",
            Platform::Bluesky => "bluesky",
            Platform::Threads => "threads",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Twitter => "Twitter/X",
            Platform::Bluesky => "Bluesky",
            Platform::Threads => "Threads",
        }
    }

    /// Maximum post length in characters. Fixed constants, not
    /// user-editable.
    pub const fn character_limit(&self) -> usize {
        match self {
            Platform::Twitter => 280,
            Platform::Bluesky => 300,
            Platform::Threads => 500,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Platform {
    type Err = CrosscastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "twitter" | "x" => Ok(Platform::Twitter),
            "bluesky" | "bsky" => Ok(Platform::Bluesky),
            "threads" => Ok(Platform::Threads),
            other => Err(CrosscastError::InvalidInput(format!(
                "Unknown platform: {} (expected twitter, bluesky, or threads)",
                other
            ))),
        }
    }
}

/// Per-platform publish state, updated independently as each network
/// call resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// Status of every platform, keyed for deterministic iteration order.
pub type StatusMap = BTreeMap<Platform, PublishStatus>;

/// Fresh status map with every platform back at `Idle`. Used at the
/// start of each publish attempt.
pub fn reset_statuses() -> StatusMap {
    Platform::ALL
        .iter()
        .map(|p| (*p, PublishStatus::Idle))
        .collect()
}

/// JSON envelope returned by every gateway proxy endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostEnvelope {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PostEnvelope {
    pub fn ok(data: serde_json::Value) -> Self {
        PostEnvelope {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        PostEnvelope {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_character_limits() {
        assert_eq!(Platform::Twitter.character_limit(), 280);
        assert_eq!(Platform::Bluesky.character_limit(), 300);
        assert_eq!(Platform::Threads.character_limit(), 500);
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(Platform::Twitter.name(), "twitter");
        assert_eq!(Platform::Bluesky.name(), "bluesky");
        assert_eq!(Platform::Threads.name(), "threads");
    }

    #[test]
    fn test_display_matches_name() {
        for platform in Platform::ALL {
            assert_eq!(format!("{}", platform), platform.name());
        }
    }

    #[test]
    fn test_from_str_accepts_aliases() {
        assert_eq!("twitter".parse::<Platform>().ok(), Some(Platform::Twitter));
        assert_eq!("X".parse::<Platform>().ok(), Some(Platform::Twitter));
        assert_eq!("Bluesky".parse::<Platform>().ok(), Some(Platform::Bluesky));
        assert_eq!("bsky".parse::<Platform>().ok(), Some(Platform::Bluesky));
        assert_eq!(" threads ".parse::<Platform>().ok(), Some(Platform::Threads));
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        let result = "mastodon".parse::<Platform>();
        assert!(result.is_err());
        let message = format!("{}", result.unwrap_err());
        assert!(message.contains("Unknown platform: mastodon"));
    }

    #[test]
    fn test_platform_serde_wire_format() {
        let json = serde_json::to_string(&Platform::Bluesky).unwrap();
        assert_eq!(json, "\"bluesky\"");

        let parsed: Platform = serde_json::from_str("\"threads\"").unwrap();
        assert_eq!(parsed, Platform::Threads);
    }

    #[test]
    fn test_publish_status_serde_wire_format() {
        let json = serde_json::to_string(&PublishStatus::Loading).unwrap();
        assert_eq!(json, "\"loading\"");

        let parsed: PublishStatus = serde_json::from_str("\"error\"").unwrap();
        assert_eq!(parsed, PublishStatus::Error);
    }

    #[test]
    fn test_publish_status_default_is_idle() {
        assert_eq!(PublishStatus::default(), PublishStatus::Idle);
    }

    #[test]
    fn test_reset_statuses_covers_all_platforms() {
        let statuses = reset_statuses();
        assert_eq!(statuses.len(), Platform::ALL.len());
        for platform in Platform::ALL {
            assert_eq!(statuses.get(&platform), Some(&PublishStatus::Idle));
        }
    }

    #[test]
    fn test_envelope_success_serialization_omits_error() {
        let envelope = PostEnvelope::ok(serde_json::json!({"id": "123"}));
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["id"], "123");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_envelope_failure_serialization_omits_data() {
        let envelope = PostEnvelope::err("Content is required");
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Content is required");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_envelope_deserializes_with_missing_optionals() {
        let envelope: PostEnvelope = serde_json::from_str("{\"success\":true}").unwrap();
        assert!(envelope.success);
        assert!(envelope.data.is_none());
        assert!(envelope.error.is_none());
    }
}
