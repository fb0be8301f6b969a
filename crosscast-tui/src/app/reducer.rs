//! Pure reducer function for state transitions
//!
//! Following functional programming principles, the reducer is a pure function:
//! `(State, Action) -> State`
//!
//! The reducer has NO side effects - it only computes new state values.
//! All business logic and I/O happens outside the reducer. Key presses
//! are mapped to actions by `map_key` so the event loop sees the
//! semantic action and can trigger side effects (the publish itself)
//! alongside the state transition.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use libcrosscast::progress::{derive_progress, is_over_limit};
use libcrosscast::types::{reset_statuses, Platform, PublishStatus};

use super::actions::Action;
use super::state::{AppState, ComposerState};

/// Pure reducer function
///
/// Takes current state and an action, returns new state.
/// This function is completely pure - no I/O, no side effects.
///
/// # Purity Guarantees
///
/// - No network requests
/// - No file I/O
/// - No mutations (returns new state)
/// - Deterministic (same inputs -> same output)
pub fn reduce(state: AppState, action: Action) -> AppState {
    match action {
        Action::Quit => AppState {
            should_quit: true,
            ..state
        },

        Action::ShowHelp => AppState {
            help_visible: true,
            ..state
        },

        Action::HideHelp => AppState {
            help_visible: false,
            ..state
        },

        Action::DismissError => AppState {
            error: None,
            ..state
        },

        Action::InputChanged {
            content,
            char_count,
        } => AppState {
            composer: ComposerState {
                content,
                char_count,
                progress: derive_progress(char_count, &Platform::ALL),
                over_limit: is_over_limit(char_count, &Platform::ALL),
                ..state.composer
            },
            ..state
        },

        Action::TogglePlatform(platform) => {
            let mut selection = state.selection.clone();
            selection.toggle(platform);
            AppState { selection, ..state }
        }

        Action::PublishRequested => {
            // The publish itself is handled outside the reducer.
            // State transitions happen via PublishStarted.
            state
        }

        Action::PublishStarted { publish_id: _ } => AppState {
            composer: ComposerState {
                posting: true,
                ..state.composer
            },
            statuses: reset_statuses(),
            details: Default::default(),
            status_message: None,
            ..state
        },

        Action::PlatformStatus {
            platform,
            status,
            detail,
        } => {
            let mut statuses = state.statuses.clone();
            statuses.insert(platform, status);

            let mut details = state.details.clone();
            match (status, detail) {
                (PublishStatus::Error, Some(detail)) => {
                    details.insert(platform, detail);
                }
                _ => {
                    details.remove(&platform);
                }
            }

            AppState {
                statuses,
                details,
                ..state
            }
        }

        Action::PublishSettled {
            outcomes,
            any_success,
        } => {
            // The settled outcomes are authoritative, even if an
            // intermediate status event was missed.
            let mut statuses = state.statuses.clone();
            let mut details = state.details.clone();
            for outcome in &outcomes {
                statuses.insert(outcome.platform, outcome.status());
                match &outcome.error {
                    Some(error) if !outcome.success => {
                        details.insert(outcome.platform, error.clone());
                    }
                    _ => {
                        details.remove(&outcome.platform);
                    }
                }
            }

            let succeeded = outcomes.iter().filter(|o| o.success).count();
            let message = format!("Posted to {} of {} platform(s)", succeeded, outcomes.len());

            let composer = if any_success {
                // Draft survives only a total failure.
                ComposerState::default()
            } else {
                ComposerState {
                    posting: false,
                    ..state.composer
                }
            };

            AppState {
                composer,
                statuses,
                details,
                status_message: Some(message),
                ..state
            }
        }

        Action::PublishRejected { error } => AppState {
            composer: ComposerState {
                posting: false,
                ..state.composer
            },
            error: Some(error),
            ..state
        },

        Action::ClearDraft => AppState {
            composer: ComposerState::default(),
            statuses: reset_statuses(),
            details: Default::default(),
            status_message: None,
            ..state
        },
    }
}

/// Map a key press to its action, if any
///
/// This is where keybindings are defined. Returns `None` for keys the
/// global map does not claim, which the event loop then offers to the
/// editor. Gating (publish only when allowed, no toggles mid-publish)
/// lives here so the reducer never sees a disallowed action.
pub fn map_key(state: &AppState, key: KeyEvent) -> Option<Action> {
    match (key.code, key.modifiers) {
        // Quit
        (KeyCode::Char('c'), KeyModifiers::CONTROL)
        | (KeyCode::Char('q'), KeyModifiers::CONTROL) => Some(Action::Quit),

        // Help
        (KeyCode::F(1), _) => {
            if state.help_visible {
                Some(Action::HideHelp)
            } else {
                Some(Action::ShowHelp)
            }
        }

        // Dismiss error, then hide help
        (KeyCode::Esc, _) if state.error.is_some() => Some(Action::DismissError),
        (KeyCode::Esc, _) if state.help_visible => Some(Action::HideHelp),

        // Platform toggles, locked while a publish is in flight
        (KeyCode::F(2), _) if !state.composer.posting => {
            Some(Action::TogglePlatform(Platform::Twitter))
        }
        (KeyCode::F(3), _) if !state.composer.posting => {
            Some(Action::TogglePlatform(Platform::Bluesky))
        }
        (KeyCode::F(4), _) if !state.composer.posting => {
            Some(Action::TogglePlatform(Platform::Threads))
        }

        // Publish (Ctrl+S)
        (KeyCode::Char('s'), KeyModifiers::CONTROL) if state.can_publish() => {
            Some(Action::PublishRequested)
        }

        // Clear draft (Ctrl+L)
        (KeyCode::Char('l'), KeyModifiers::CONTROL) if !state.composer.posting => {
            Some(Action::ClearDraft)
        }

        _ => None,
    }
}
