use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Answer to a yes/no prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAnswer {
    Yes,
    No,
}

/// Modal yes/no prompt
#[derive(Debug, Clone)]
pub struct ConfirmDialog {
    prompt: String,
}

impl ConfirmDialog {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// `None` means the key is ignored and the dialog stays open
    pub fn handle_key(&self, key: KeyEvent) -> Option<ConfirmAnswer> {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('s') | KeyCode::Char('S') => {
                Some(ConfirmAnswer::Yes)
            }
            KeyCode::Enter => Some(ConfirmAnswer::Yes),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(ConfirmAnswer::No),
            _ => None,
        }
    }

    pub fn render(&self, f: &mut Frame) {
        let area = centered(f.area(), 60, 5);
        let text = vec![
            Line::from(self.prompt.as_str()),
            Line::from(""),
            Line::from(vec![
                Span::styled("[s/y] Sí", Style::default().fg(Color::Green)),
                Span::raw("   "),
                Span::styled("[n/Esc] No", Style::default().fg(Color::Red)),
            ]),
        ];

        let dialog = Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Confirmar")
                    .border_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            );

        f.render_widget(Clear, area);
        f.render_widget(dialog, area);
    }
}

/// A popup rectangle `percent_x` wide and `height` rows tall in the middle of `area`
fn centered(area: Rect, percent_x: u16, height: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .split(area)[1];

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical)[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    #[test]
    fn test_answers() {
        let dialog = ConfirmDialog::new("¿Enviar?");
        let key = |code| KeyEvent::new(code, KeyModifiers::NONE);

        assert_eq!(dialog.handle_key(key(KeyCode::Char('s'))), Some(ConfirmAnswer::Yes));
        assert_eq!(dialog.handle_key(key(KeyCode::Enter)), Some(ConfirmAnswer::Yes));
        assert_eq!(dialog.handle_key(key(KeyCode::Esc)), Some(ConfirmAnswer::No));
        assert_eq!(dialog.handle_key(key(KeyCode::Char('x'))), None);
    }
}
