//! Actions for the reducer pattern
//!
//! All state transitions are triggered by actions. Key presses are
//! translated into actions by `reducer::map_key`; editor changes and
//! service events arrive over channels and are translated by the event
//! loop. The reducer (see `reducer.rs`) applies actions to state.

use libcrosscast::events::PlatformOutcome;
use libcrosscast::types::{Platform, PublishStatus};

/// Actions that trigger state transitions
#[derive(Debug, Clone)]
pub enum Action {
    /// Quit the application
    Quit,

    /// Show help overlay
    ShowHelp,

    /// Hide help overlay
    HideHelp,

    /// Dismiss the error overlay
    DismissError,

    /// Editor content changed; `char_count` is the visible length
    /// (one trailing newline excluded)
    InputChanged { content: String, char_count: usize },

    /// Toggle a platform in the fan-out selection
    TogglePlatform(Platform),

    /// User requested a publish (side effect handled by the event loop)
    PublishRequested,

    /// A fan-out was started
    PublishStarted { publish_id: String },

    /// One platform's status changed during the fan-out
    PlatformStatus {
        platform: Platform,
        status: PublishStatus,
        detail: Option<String>,
    },

    /// Every platform's request has settled
    PublishSettled {
        outcomes: Vec<PlatformOutcome>,
        any_success: bool,
    },

    /// The fan-out never started (a guard tripped)
    PublishRejected { error: String },

    /// Clear the draft and reset per-platform statuses
    ClearDraft,
}
