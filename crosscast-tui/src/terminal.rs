//! Terminal lifecycle for the composer
//!
//! Raw mode and the alternate screen are process-global state; every
//! entry here is paired with an exit, panic path included, so a crash
//! never leaves the shell unusable.

use std::io::{self, Stdout};
use std::panic;

use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::error::Result;

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Enter raw mode and the alternate screen, returning the terminal
/// drawn on them
pub fn setup_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen)?;

    Ok(Terminal::new(CrosstermBackend::new(io::stdout()))?)
}

/// Undo `setup_terminal` and bring the cursor back
pub fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    leave_screen()?;
    terminal.show_cursor()?;

    Ok(())
}

/// Chain a terminal restore in front of the default panic handler
///
/// The restore must run before the panic message prints, or raw mode
/// swallows it.
pub fn install_panic_hook() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        let _ = leave_screen();
        default_hook(info);
    }));
}

/// The one exit path: leave the alternate screen, then raw mode.
fn leave_screen() -> io::Result<()> {
    execute!(io::stdout(), LeaveAlternateScreen)?;
    disable_raw_mode()
}
