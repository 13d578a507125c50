//! Debounced search field
//!
//! Text input that schedules its action after a quiet period instead of on
//! every keystroke. The value handed out when the timer fires is read at fire
//! time, so intermediate keystrokes never reach the backend.

use crate::debouncer::Debouncer;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::time::Instant;
use tui_input::{backend::crossterm::EventHandler, Input};

/// Result of handling a key in the debounced input
#[derive(Debug, Clone, PartialEq)]
pub enum DebouncedInputAction {
    /// Key did not change the value (cursor movement etc.)
    Continue,
    /// Value changed and the timer was (re)started
    InputChanged(String),
    /// User pressed Enter; run now without waiting
    Confirm(String),
    /// Pass the key through to parent handler
    PassThrough,
}

/// Configuration for the debounced input
#[derive(Debug, Clone)]
pub struct DebouncedInputConfig {
    /// Debounce delay in milliseconds
    pub debounce_ms: u64,
    /// Title for the input box
    pub title: String,
    /// Color style for the input
    pub style: Style,
    /// Whether to show debounce indicator
    pub show_debounce_indicator: bool,
}

impl Default for DebouncedInputConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            title: "Buscar".to_string(),
            style: Style::default().fg(Color::Yellow),
            show_debounce_indicator: true,
        }
    }
}

pub struct DebouncedInput {
    input: Input,
    debouncer: Debouncer,
    config: DebouncedInputConfig,
}

impl DebouncedInput {
    pub fn new() -> Self {
        Self::with_config(DebouncedInputConfig::default())
    }

    pub fn with_config(config: DebouncedInputConfig) -> Self {
        Self {
            input: Input::default(),
            debouncer: Debouncer::new(config.debounce_ms),
            config,
        }
    }

    pub fn value(&self) -> &str {
        self.input.value()
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn debouncer(&self) -> &Debouncer {
        &self.debouncer
    }

    /// Cancel the pending timer, if any
    pub fn cancel_pending(&mut self) {
        self.debouncer.reset();
    }

    /// Handle a key event received at `now`
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> DebouncedInputAction {
        match key.code {
            KeyCode::Enter => {
                self.debouncer.reset();
                DebouncedInputAction::Confirm(self.input.value().to_string())
            }
            KeyCode::Esc | KeyCode::Tab | KeyCode::BackTab => DebouncedInputAction::PassThrough,
            KeyCode::Char('s' | 'c' | 'q') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                DebouncedInputAction::PassThrough
            }
            _ => {
                let before = self.input.value().to_string();
                self.input.handle_event(&Event::Key(key));
                let current = self.input.value();

                if current != before {
                    self.debouncer.trigger_at(now);
                    DebouncedInputAction::InputChanged(current.to_string())
                } else {
                    DebouncedInputAction::Continue
                }
            }
        }
    }

    /// Value to search for if the quiet period has elapsed at `now`
    pub fn check_debounce(&mut self, now: Instant) -> Option<String> {
        if self.debouncer.should_execute_at(now) {
            Some(self.input.value().to_string())
        } else {
            None
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect, focused: bool) {
        let title = if self.config.show_debounce_indicator && self.debouncer.is_pending() {
            format!("{} (escribiendo...)", self.config.title)
        } else {
            self.config.title.clone()
        };

        let style = if focused {
            self.config.style
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(style);

        let width = area.width.saturating_sub(2) as usize;
        let scroll = self.input.visual_scroll(width);
        let input_widget = Paragraph::new(self.input.value())
            .block(block)
            .scroll((0, scroll as u16));

        f.render_widget(input_widget, area);

        if focused {
            let cursor = self.input.visual_cursor().saturating_sub(scroll) as u16;
            f.set_cursor_position((area.x + cursor + 1, area.y + 1));
        }
    }
}

impl Default for DebouncedInput {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder pattern for DebouncedInput configuration
pub struct DebouncedInputBuilder {
    config: DebouncedInputConfig,
}

impl DebouncedInputBuilder {
    pub fn new() -> Self {
        Self {
            config: DebouncedInputConfig::default(),
        }
    }

    pub fn debounce_ms(mut self, ms: u64) -> Self {
        self.config.debounce_ms = ms;
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    pub fn show_indicator(mut self, show: bool) -> Self {
        self.config.show_debounce_indicator = show;
        self
    }

    pub fn build(self) -> DebouncedInput {
        DebouncedInput::with_config(self.config)
    }
}

impl Default for DebouncedInputBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    #[test]
    fn test_reads_value_on_fire() {
        let start = Instant::now();
        let mut input = DebouncedInputBuilder::new().debounce_ms(300).build();

        assert_eq!(
            input.handle_key(key('g'), start),
            DebouncedInputAction::InputChanged("g".to_string())
        );
        input.handle_key(key('a'), start + Duration::from_millis(100));

        assert_eq!(input.check_debounce(start + Duration::from_millis(300)), None);
        assert_eq!(
            input.check_debounce(start + Duration::from_millis(400)),
            Some("ga".to_string())
        );
        assert_eq!(input.check_debounce(start + Duration::from_millis(800)), None);
    }

    #[test]
    fn test_cursor_keys_do_not_trigger() {
        let start = Instant::now();
        let mut input = DebouncedInput::new();
        input.handle_key(key('x'), start);
        input.cancel_pending();

        let left = KeyEvent::new(KeyCode::Left, KeyModifiers::NONE);
        assert_eq!(input.handle_key(left, start), DebouncedInputAction::Continue);
        assert!(!input.is_pending());
    }

    #[test]
    fn test_ctrl_editing_keys_reach_input() {
        let start = Instant::now();
        let mut input = DebouncedInput::new();
        for c in "ana garcia".chars() {
            input.handle_key(key(c), start);
        }
        input.cancel_pending();

        let delete_word = KeyEvent::new(KeyCode::Char('w'), KeyModifiers::CONTROL);
        let action = input.handle_key(delete_word, start);

        assert!(matches!(action, DebouncedInputAction::InputChanged(_)));
        assert!(input.value().starts_with("ana"));
        assert!(!input.value().contains("garcia"));
        assert!(input.is_pending());
    }

    #[test]
    fn test_app_bindings_pass_through() {
        let mut input = DebouncedInput::new();
        for c in ['s', 'c', 'q'] {
            let chord = KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL);
            assert_eq!(
                input.handle_key(chord, Instant::now()),
                DebouncedInputAction::PassThrough
            );
        }
        assert_eq!(input.value(), "");
    }

    #[test]
    fn test_enter_confirms_and_cancels_timer() {
        let start = Instant::now();
        let mut input = DebouncedInput::new();
        input.handle_key(key('a'), start);
        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);

        assert_eq!(
            input.handle_key(enter, start),
            DebouncedInputAction::Confirm("a".to_string())
        );
        assert!(!input.is_pending());
    }
}
