use crate::utils::logging::{LogEntry, LogRingBuffer};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// How many recent entries the panel pulls from the ring buffer
const PANEL_ENTRIES: usize = 500;

/// Scrollable view of the in-memory log, toggled with F5
pub struct LogPanel {
    buffer: LogRingBuffer,
    /// Lines scrolled up from the newest entry
    scroll_back: usize,
}

impl LogPanel {
    pub fn new(buffer: LogRingBuffer) -> Self {
        Self {
            buffer,
            scroll_back: 0,
        }
    }

    /// Handle a key; returns true when the panel should close
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.scroll_back += 1,
            KeyCode::Down | KeyCode::Char('j') => {
                self.scroll_back = self.scroll_back.saturating_sub(1)
            }
            KeyCode::PageUp => self.scroll_back += 10,
            KeyCode::PageDown => self.scroll_back = self.scroll_back.saturating_sub(10),
            KeyCode::End | KeyCode::Char('G') => self.scroll_back = 0,
            KeyCode::Esc | KeyCode::F(5) | KeyCode::Char('q') => return true,
            _ => {}
        }
        false
    }

    fn visible_entries(&self, height: usize) -> Vec<LogEntry> {
        let entries = self.buffer.get_recent(PANEL_ENTRIES);
        let max_back = entries.len().saturating_sub(height);
        let back = self.scroll_back.min(max_back);
        let end = entries.len() - back;
        let start = end.saturating_sub(height);
        entries[start..end].to_vec()
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let height = area.height.saturating_sub(2) as usize;
        let lines: Vec<Line> = self
            .visible_entries(height)
            .into_iter()
            .map(|entry| {
                let color = match entry.level.as_str() {
                    "ERROR" => Color::Red,
                    "WARN" => Color::Yellow,
                    "INFO" => Color::Green,
                    _ => Color::Gray,
                };
                let text = entry.format_for_display();
                Line::from(Span::styled(text, Style::default().fg(color)))
            })
            .collect();

        let panel = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(
                    "Registro ({} entradas) - ↑↓/jk: desplazar, End: últimas, F5/Esc: cerrar",
                    self.buffer.len()
                ))
                .border_style(Style::default().fg(Color::Yellow)),
        );
        f.render_widget(panel, area);
    }
}
