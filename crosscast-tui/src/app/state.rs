//! Application state
//!
//! Immutable state structure following functional programming principles.
//! All state transitions happen through the reducer (see `reducer.rs`).

use std::collections::BTreeMap;

use libcrosscast::progress::{derive_progress, ProgressView};
use libcrosscast::selection::PlatformSelection;
use libcrosscast::types::{reset_statuses, Platform, StatusMap};

/// Root application state
///
/// This is the single source of truth for the entire application.
/// State transitions are pure functions that return new state values.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Should the application quit?
    pub should_quit: bool,

    /// Help overlay visible?
    pub help_visible: bool,

    /// Composer state
    pub composer: ComposerState,

    /// Which platforms the next publish fans out to
    pub selection: PlatformSelection,

    /// Per-platform publish status from the most recent fan-out
    pub statuses: StatusMap,

    /// Per-platform error detail, present only for failed platforms
    pub details: BTreeMap<Platform, String>,

    /// Status bar message
    pub status_message: Option<String>,

    /// Error overlay state
    pub error: Option<String>,

    /// UI configuration
    pub config: UiConfig,
}

/// Composer state
#[derive(Debug, Clone)]
pub struct ComposerState {
    /// Current draft content
    pub content: String,

    /// Character count (one trailing newline excluded)
    pub char_count: usize,

    /// Progress against every platform's limit, recomputed on each change
    pub progress: BTreeMap<Platform, ProgressView>,

    /// Does the draft exceed the largest platform limit?
    pub over_limit: bool,

    /// Publish in flight?
    pub posting: bool,
}

/// UI configuration
#[derive(Debug, Clone)]
pub struct UiConfig {
    /// Use colors?
    pub colors_enabled: bool,

    /// Use unicode symbols (false = ASCII fallback)
    pub unicode_enabled: bool,

    /// Tick rate in milliseconds
    pub tick_rate_ms: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            should_quit: false,
            help_visible: false,
            composer: ComposerState::default(),
            selection: PlatformSelection::default(),
            statuses: reset_statuses(),
            details: BTreeMap::new(),
            status_message: None,
            error: None,
            config: UiConfig::default(),
        }
    }
}

impl Default for ComposerState {
    fn default() -> Self {
        Self {
            content: String::new(),
            char_count: 0,
            progress: derive_progress(0, &Platform::ALL),
            over_limit: false,
            posting: false,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        // Detect environment for sensible defaults
        let colors_enabled = !std::env::var("NO_COLOR").is_ok()
            && !std::env::var("CROSSCAST_TUI_NO_COLOR").is_ok();

        let unicode_enabled = !std::env::var("CROSSCAST_TUI_ASCII").is_ok();

        let tick_rate_ms = std::env::var("CROSSCAST_TUI_TICK_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(100);

        Self {
            colors_enabled,
            unicode_enabled,
            tick_rate_ms,
        }
    }
}

impl AppState {
    /// Create new application state with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if publishing is allowed (fits every limit, not already
    /// posting, at least one platform selected). An empty draft passes
    /// this gate; the publish itself rejects it with a visible error.
    pub fn can_publish(&self) -> bool {
        !self.composer.over_limit && !self.composer.posting && self.selection.any_selected()
    }
}
