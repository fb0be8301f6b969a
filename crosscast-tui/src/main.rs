//! crosscast-tui - Terminal composer for Crosscast
//!
//! Write once, post everywhere: a draft editor with live per-platform
//! character counts, platform toggles, and one keystroke to fan the
//! post out to every selected platform concurrently.

use std::time::Duration;

use clap::Parser;
use crossbeam_channel::{unbounded, Receiver};

use libcrosscast::config::Config;
use libcrosscast::logging::LoggingConfig;
use libcrosscast::selection::PlatformSelection;

use crosscast_tui::app::{map_key, reduce, Action, AppState, EventHandler, TuiEvent};
use crosscast_tui::error::Result;
use crosscast_tui::services::{publish_update_action, PublishUpdate, ServiceHandle};
use crosscast_tui::terminal::{install_panic_hook, restore_terminal, setup_terminal, Tui};
use crosscast_tui::ui::{self, Composer};

#[derive(Parser)]
#[command(
    name = "crosscast-tui",
    version,
    about = "Terminal composer for Crosscast - write once, post to every platform"
)]
struct Cli {
    /// Enable debug logging on stderr (garbles the display, pipe it
    /// to a file when diagnosing)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Silent by default: log lines and the alternate screen share the
    // same terminal
    if cli.verbose {
        LoggingConfig::interactive_debug().init();
    }

    // Everything fallible loads before the terminal switches modes, so
    // startup errors print normally
    let config = Config::load_or_default()?;
    let platforms = config.default_platforms()?;
    let services = ServiceHandle::from_config(&config)?;

    // Install panic hook to restore terminal on panic
    install_panic_hook();

    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, &services, PlatformSelection::only(&platforms));
    restore_terminal(&mut terminal)?;

    result
}

fn run_app(terminal: &mut Tui, services: &ServiceHandle, selection: PlatformSelection) -> Result<()> {
    let mut state = AppState::new();
    state.selection = selection;

    // Editor changes flow over a channel so the widget never touches
    // the reducer directly
    let (change_tx, change_rx) = unbounded();
    let mut composer = Composer::new(Box::new(move |content: &str, char_count: usize| {
        let _ = change_tx.send((content.to_string(), char_count));
    }));

    // Progress channel of the publish currently in flight
    let mut publish_rx: Option<Receiver<PublishUpdate>> = None;

    let event_handler = EventHandler::new(Duration::from_millis(state.config.tick_rate_ms));

    loop {
        composer.set_block(ui::composer_block(&state));

        terminal.draw(|frame| {
            ui::render(frame, &state, &composer);
        })?;

        match event_handler.next()? {
            TuiEvent::Key(key) => {
                if let Some(action) = map_key(&state, key) {
                    let requested = matches!(action, Action::PublishRequested);
                    state = reduce(state, action);

                    if requested {
                        let (publish_id, rx) = services
                            .publish(state.composer.content.clone(), state.selection.selected());
                        publish_rx = Some(rx);
                        state = reduce(state, Action::PublishStarted { publish_id });
                    }
                } else {
                    let editor_active =
                        !state.help_visible && state.error.is_none() && !state.composer.posting;
                    if editor_active {
                        composer.input(key);
                    }
                }
            }
            TuiEvent::Resize(_, _) | TuiEvent::Tick => {}
        }

        // Drain editor change notifications
        while let Ok((content, char_count)) = change_rx.try_recv() {
            state = reduce(
                state,
                Action::InputChanged {
                    content,
                    char_count,
                },
            );
        }

        // Drain publish progress; the channel closes after settlement
        let mut publish_over = false;
        if let Some(rx) = publish_rx.as_ref() {
            while let Ok(update) = rx.try_recv() {
                if let Some(action) = publish_update_action(update) {
                    state = reduce(state, action);
                }
            }
            publish_over = !state.composer.posting;
        }
        if publish_over {
            publish_rx = None;
        }

        // The reducer clears the draft on success; mirror that into
        // the editor widget
        if state.composer.content.is_empty() && !composer.is_empty() {
            composer.clear();
        }

        if state.should_quit {
            break;
        }
    }

    Ok(())
}
