//! Terminal event polling
//!
//! Polls crossterm for keyboard and resize events, falling back to a
//! periodic tick. The event loop merges this stream with editor change
//! notifications and publish progress arriving over channels.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};

/// One occurrence the event loop reacts to
#[derive(Debug, Clone)]
pub enum TuiEvent {
    /// Keyboard input
    Key(KeyEvent),

    /// Terminal resize
    Resize(u16, u16),

    /// Periodic tick; also the moment queued channel messages drain
    Tick,
}

/// Polls the terminal, turning silence into ticks
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    /// Block up to one tick for the next event
    ///
    /// Quiet periods come back as `Tick`, so the loop always returns
    /// to drain its service channels within one tick interval.
    pub fn next(&self) -> io::Result<TuiEvent> {
        if !event::poll(self.tick_rate)? {
            return Ok(TuiEvent::Tick);
        }

        let occurred = match event::read()? {
            // Key release events double up presses on Windows
            CrosstermEvent::Key(key) if key.kind != KeyEventKind::Release => TuiEvent::Key(key),
            CrosstermEvent::Resize(width, height) => TuiEvent::Resize(width, height),
            _ => TuiEvent::Tick,
        };

        Ok(occurred)
    }
}
