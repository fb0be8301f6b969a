//! Application module
//!
//! Contains the core application architecture:
//! - Actions: What can happen
//! - State: What is true right now
//! - Reducer: Pure function (State, Action) -> State
//!
//! This follows functional programming principles with immutable state
//! and pure functions for state transitions.

pub mod actions;
pub mod event;
pub mod reducer;
pub mod state;

// Re-export commonly used types
pub use actions::Action;
pub use event::{EventHandler, TuiEvent};
pub use reducer::{map_key, reduce};
pub use state::{AppState, ComposerState, UiConfig};
