//! Composer widget with tui-textarea integration
//!
//! A stateful multi-line editor for drafting posts. Wraps tui-textarea
//! and reports every content change through a callback, so the owner
//! can recompute character counts without polling the editor.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::widgets::Block;
use ratatui::Frame;
use tui_textarea::TextArea;

use libcrosscast::draft::visible_len;

const PLACEHOLDER: &str = "Type your post here... (Ctrl+S to publish, F1 for help, Ctrl+Q to quit)";

/// Stateful composer widget
///
/// The change callback fires once at construction (reporting the empty
/// draft) and again after every keystroke that modifies the content,
/// with the joined text and its visible character count.
pub struct Composer<'a> {
    textarea: TextArea<'a>,
    on_change: Box<dyn FnMut(&str, usize) + 'a>,
}

impl<'a> Composer<'a> {
    /// Create an empty composer reporting changes to `on_change`
    pub fn new(on_change: Box<dyn FnMut(&str, usize) + 'a>) -> Self {
        let mut textarea = TextArea::default();
        textarea.set_placeholder_text(PLACEHOLDER);

        let mut composer = Self { textarea, on_change };
        composer.notify();
        composer
    }

    /// Current content, lines joined with newlines
    pub fn content(&self) -> String {
        self.textarea.lines().join("\n")
    }

    /// True when the editor holds no text at all
    pub fn is_empty(&self) -> bool {
        self.textarea.is_empty()
    }

    /// Handle a key press (returns whether the editor consumed it)
    ///
    /// Keys the global map claims (publish, clear, quit, help, escape)
    /// are refused here so they reach the application regardless of
    /// editor focus. Cursor movement counts as consumed but does not
    /// fire the change callback; only content mutations do.
    pub fn input(&mut self, key: KeyEvent) -> bool {
        match (key.code, key.modifiers) {
            (KeyCode::F(_), _) => false,
            (KeyCode::Char('s'), KeyModifiers::CONTROL) => false,
            (KeyCode::Char('l'), KeyModifiers::CONTROL) => false,
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => false,
            (KeyCode::Char('q'), KeyModifiers::CONTROL) => false,
            (KeyCode::Esc, _) => false,

            _ => {
                if self.textarea.input(key) {
                    self.notify();
                }
                true
            }
        }
    }

    /// Discard the draft and report the now-empty content
    pub fn clear(&mut self) {
        self.textarea = TextArea::default();
        self.textarea.set_placeholder_text(PLACEHOLDER);
        self.notify();
    }

    /// Set the surrounding block (border color changes with state)
    pub fn set_block(&mut self, block: Block<'a>) {
        self.textarea.set_block(block);
    }

    /// Render the editor
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        frame.render_widget(&self.textarea, area);
    }

    fn notify(&mut self) {
        let content = self.textarea.lines().join("\n");
        let count = visible_len(&content);
        (self.on_change)(&content, count);
    }
}
