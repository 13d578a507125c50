use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Label and enablement of the send button, derived from the selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitButton {
    count: usize,
    sending: bool,
}

impl SubmitButton {
    pub fn new(count: usize, sending: bool) -> Self {
        Self { count, sending }
    }

    pub fn label(&self) -> String {
        if self.sending {
            "Enviando...".to_string()
        } else {
            format!("Enviar a {} Seleccionado(s)", self.count)
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.count > 0 && !self.sending
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let style = if self.is_enabled() {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let button = Paragraph::new(self.label())
            .style(style)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Ctrl+S"));
        f.render_widget(button, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_and_enablement() {
        let empty = SubmitButton::new(0, false);
        assert_eq!(empty.label(), "Enviar a 0 Seleccionado(s)");
        assert!(!empty.is_enabled());

        let two = SubmitButton::new(2, false);
        assert_eq!(two.label(), "Enviar a 2 Seleccionado(s)");
        assert!(two.is_enabled());

        assert!(!SubmitButton::new(2, true).is_enabled());
    }
}
