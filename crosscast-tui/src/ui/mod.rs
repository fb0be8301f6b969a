//! UI rendering
//!
//! Pure rendering functions that transform state into terminal frames.
//! Following FP principles: render functions have no side effects.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap},
    Frame,
};

use libcrosscast::progress::overall_limit;
use libcrosscast::types::{Platform, PublishStatus};

use crate::app::AppState;

pub mod composer;

pub use composer::Composer;

/// Render the application UI
///
/// The frame is split into the editor, one progress row per platform,
/// and a status bar. Overlays draw on top when visible.
pub fn render(frame: &mut Frame, state: &AppState, composer: &Composer) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),
            Constraint::Length(Platform::ALL.len() as u16 + 2),
            Constraint::Length(4),
        ])
        .split(area);

    composer.render(frame, chunks[0]);
    render_platforms(frame, chunks[1], state);
    render_status_bar(frame, chunks[2], state);

    if state.help_visible {
        render_help_overlay(frame, area, state);
    }

    if let Some(ref error) = state.error {
        render_error_overlay(frame, area, error, state);
    }
}

/// The editor's surrounding block for the current state
///
/// Yellow while a publish is in flight, red when the draft exceeds the
/// largest platform limit, green otherwise.
pub fn composer_block(state: &AppState) -> Block<'static> {
    let color = if state.composer.posting {
        Color::Yellow
    } else if state.composer.over_limit {
        Color::Red
    } else {
        Color::Green
    };

    Block::default()
        .title(" Composer ")
        .borders(Borders::ALL)
        .border_style(fg(state, color))
}

/// Style with a foreground color, unless colors are disabled
fn fg(state: &AppState, color: Color) -> Style {
    if state.config.colors_enabled {
        Style::default().fg(color)
    } else {
        Style::default()
    }
}

/// Render one row per platform: selection, progress gauge, status
fn render_platforms(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title(" Platforms ").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(1); Platform::ALL.len()])
        .split(inner);

    for (index, platform) in Platform::ALL.iter().enumerate() {
        render_platform_row(frame, rows[index], state, *platform, index);
    }
}

fn render_platform_row(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    platform: Platform,
    index: usize,
) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(22),
            Constraint::Min(12),
            Constraint::Length(32),
        ])
        .split(area);

    // Selection marker plus the toggle key (F2 through F4)
    let selected = state.selection.is_enabled(platform);
    let marker = if selected { "[x]" } else { "[ ]" };
    let marker_style = if selected {
        fg(state, Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        fg(state, Color::DarkGray)
    };
    let label = Line::from(vec![
        Span::styled(marker, marker_style),
        Span::raw(format!(" F{} ", index + 2)),
        Span::raw(platform.display_name()),
    ]);
    frame.render_widget(Paragraph::new(label), columns[0]);

    // Character limit gauge; the stored percentage is unclamped, the
    // gauge only accepts 0 to 1
    if let Some(view) = state.composer.progress.get(&platform) {
        let over = view.count > view.limit;
        let color = if over {
            Color::Red
        } else if view.percentage >= 90.0 {
            Color::Yellow
        } else {
            Color::Cyan
        };
        let gauge = Gauge::default()
            .ratio((view.percentage / 100.0).clamp(0.0, 1.0))
            .label(format!("{}/{}", view.count, view.limit))
            .gauge_style(fg(state, color))
            .use_unicode(state.config.unicode_enabled);
        frame.render_widget(gauge, columns[1]);
    }

    // Publish status with failure detail when present
    let status = state.statuses.get(&platform).copied().unwrap_or_default();
    let mut spans = vec![status_span(state, status)];
    if let Some(detail) = state.details.get(&platform) {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(detail.clone(), fg(state, Color::Red)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), columns[2]);
}

fn status_span(state: &AppState, status: PublishStatus) -> Span<'static> {
    let unicode = state.config.unicode_enabled;
    match status {
        PublishStatus::Idle => Span::styled("-", fg(state, Color::DarkGray)),
        PublishStatus::Loading => Span::styled(
            if unicode { "…" } else { "..." },
            fg(state, Color::Yellow),
        ),
        PublishStatus::Success => Span::styled(
            if unicode { "✓" } else { "OK" },
            fg(state, Color::Green).add_modifier(Modifier::BOLD),
        ),
        PublishStatus::Error => Span::styled(
            if unicode { "✗" } else { "ERR" },
            fg(state, Color::Red).add_modifier(Modifier::BOLD),
        ),
    }
}

/// Render status bar with draft accounting and key hints
fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState) {
    let char_info = format!("{} chars", state.composer.char_count);

    let (message, message_style) = if state.composer.posting {
        ("Publishing...".to_string(), fg(state, Color::Yellow))
    } else if let Some(ref message) = state.status_message {
        (message.clone(), fg(state, Color::Green))
    } else if state.composer.over_limit {
        (
            format!(
                "Over the {} character limit",
                overall_limit(&Platform::ALL)
            ),
            fg(state, Color::Red),
        )
    } else {
        ("Ready".to_string(), Style::default())
    };

    let hints = if state.can_publish() {
        "Ctrl+S: Publish | F2-F4: Platforms | Ctrl+L: Clear | F1: Help | Ctrl+Q: Quit"
    } else {
        "F2-F4: Platforms | F1: Help | Ctrl+Q: Quit"
    };

    let lines = vec![
        Line::from(vec![
            Span::raw(char_info),
            Span::raw(" | "),
            Span::styled(message, message_style),
        ]),
        Line::from(Span::styled(hints, fg(state, Color::Gray))),
    ];

    let status = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, area);
}

/// Render help overlay
fn render_help_overlay(frame: &mut Frame, area: Rect, state: &AppState) {
    let popup_area = centered_rect(60, 60, area);

    let help_text = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Composer:"),
        Line::from("  Ctrl+S   - Publish to selected platforms"),
        Line::from("  Ctrl+L   - Clear the draft"),
        Line::from(""),
        Line::from("Platforms:"),
        Line::from("  F2       - Toggle Twitter/X"),
        Line::from("  F3       - Toggle Bluesky"),
        Line::from("  F4       - Toggle Threads"),
        Line::from(""),
        Line::from("Global:"),
        Line::from("  F1       - Toggle help"),
        Line::from("  Esc      - Dismiss overlays"),
        Line::from("  Ctrl+Q   - Quit (Ctrl+C works too)"),
        Line::from(""),
        Line::from("Press Esc or F1 to close"),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(" Help ")
                .borders(Borders::ALL)
                .border_style(fg(state, Color::Cyan)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(Clear, popup_area);
    frame.render_widget(help, popup_area);
}

/// Render error overlay
fn render_error_overlay(frame: &mut Frame, area: Rect, error: &str, state: &AppState) {
    let popup_area = centered_rect(70, 30, area);

    let error_text = vec![
        Line::from(Span::styled(
            "Error",
            fg(state, Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(error.to_string()),
        Line::from(""),
        Line::from("Press Esc to dismiss"),
    ];

    let error_widget = Paragraph::new(error_text)
        .block(
            Block::default()
                .title(" Error ")
                .borders(Borders::ALL)
                .border_style(fg(state, Color::Red)),
        )
        .wrap(Wrap { trim: false })
        .alignment(Alignment::Center);

    frame.render_widget(Clear, popup_area);
    frame.render_widget(error_widget, popup_area);
}

/// Helper to create centered rectangle
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
