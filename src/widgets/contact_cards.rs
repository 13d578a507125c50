//! Contact cards
//!
//! Builds one bordered card per contact and keeps the rendered lines cached so
//! a selection toggle only rebuilds the card it touched.

use crate::contact::Contact;
use crate::selection::SelectionStore;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Presentation switches for card synthesis
#[derive(Debug, Clone, Copy)]
pub struct CardStyle {
    pub use_glyphs: bool,
    pub show_privileges: bool,
}

impl Default for CardStyle {
    fn default() -> Self {
        Self {
            use_glyphs: true,
            show_privileges: true,
        }
    }
}

impl CardStyle {
    fn marker(&self, selected: bool) -> &'static str {
        match (self.use_glyphs, selected) {
            (true, true) => "☑",
            (true, false) => "☐",
            (false, true) => "[x]",
            (false, false) => "[ ]",
        }
    }

    fn phone_label(&self) -> &'static str {
        if self.use_glyphs {
            "☎ "
        } else {
            "Tel: "
        }
    }

    fn grouping_label(&self) -> &'static str {
        if self.use_glyphs {
            "⌂ "
        } else {
            "Circuito/Congregación: "
        }
    }

    fn privileges_label(&self) -> &'static str {
        if self.use_glyphs {
            "★ "
        } else {
            "Privilegios: "
        }
    }
}

#[derive(Debug, Clone)]
struct Card {
    contact: Contact,
    selected: bool,
    lines: Vec<Line<'static>>,
}

impl Card {
    fn height(&self) -> u16 {
        self.lines.len() as u16 + 2
    }
}

/// Lines for a single card. Optional fields only produce a line when present.
pub fn card_lines(contact: &Contact, selected: bool, style: &CardStyle) -> Vec<Line<'static>> {
    let mut lines = Vec::with_capacity(4);

    let name_style = if selected {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    };
    lines.push(Line::from(vec![
        Span::styled(style.marker(selected), name_style),
        Span::raw(" "),
        Span::styled(contact.name.clone(), name_style),
    ]));

    let label_style = Style::default().fg(Color::DarkGray);

    if let Some(phone) = contact.phone() {
        lines.push(Line::from(vec![
            Span::styled(style.phone_label(), label_style),
            Span::raw(phone.to_string()),
        ]));
    }

    if let Some(grouping) = contact.grouping() {
        lines.push(Line::from(vec![
            Span::styled(style.grouping_label(), label_style),
            Span::raw(grouping),
        ]));
    }

    if style.show_privileges {
        let labels = contact.privilege_labels();
        if !labels.is_empty() {
            lines.push(Line::from(vec![
                Span::styled(style.privileges_label(), label_style),
                Span::styled(labels.join(", "), Style::default().fg(Color::Magenta)),
            ]));
        }
    }

    lines
}

/// The card list for one result set
#[derive(Debug, Clone, Default)]
pub struct CardDeck {
    cards: Vec<Card>,
    style: CardStyle,
    /// First card drawn at the top of the region
    offset: usize,
}

impl CardDeck {
    pub fn build(results: Vec<Contact>, selection: &SelectionStore, style: CardStyle) -> Self {
        let cards = results
            .into_iter()
            .map(|contact| {
                let selected = selection.is_selected(contact.id);
                let lines = card_lines(&contact, selected, &style);
                Card {
                    contact,
                    selected,
                    lines,
                }
            })
            .collect();

        Self {
            cards,
            style,
            offset: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn contact(&self, index: usize) -> Option<&Contact> {
        self.cards.get(index).map(|c| &c.contact)
    }

    pub fn is_checked(&self, index: usize) -> Option<bool> {
        self.cards.get(index).map(|c| c.selected)
    }

    /// Re-sync one card with the selection store
    pub fn refresh(&mut self, index: usize, selection: &SelectionStore) {
        let style = self.style;
        if let Some(card) = self.cards.get_mut(index) {
            card.selected = selection.is_selected(card.contact.id);
            card.lines = card_lines(&card.contact, card.selected, &style);
        }
    }

    /// Plain text of a card, one string per line
    pub fn card_text(&self, index: usize) -> Vec<String> {
        self.cards
            .get(index)
            .map(|card| card.lines.iter().map(|line| line.to_string()).collect())
            .unwrap_or_default()
    }

    /// Adjust the scroll offset so `cursor` fits in a region `height` rows tall
    fn scroll_to(&mut self, cursor: usize, height: u16) {
        if cursor < self.offset {
            self.offset = cursor;
            return;
        }
        while self.offset < cursor {
            let used: u16 = self.cards[self.offset..=cursor]
                .iter()
                .map(Card::height)
                .sum();
            if used <= height {
                break;
            }
            self.offset += 1;
        }
    }

    /// Draw the visible cards and return the screen area of each one
    pub fn render(&mut self, f: &mut Frame, area: Rect, cursor: Option<usize>) -> Vec<(Rect, usize)> {
        let mut hits = Vec::new();
        if self.cards.is_empty() || area.height == 0 {
            return hits;
        }

        if let Some(cursor) = cursor {
            self.scroll_to(cursor.min(self.cards.len() - 1), area.height);
        }

        let mut y = area.y;
        let bottom = area.y + area.height;
        for (index, card) in self.cards.iter().enumerate().skip(self.offset) {
            if y >= bottom {
                break;
            }
            let height = card.height().min(bottom - y);
            let card_area = Rect::new(area.x, y, area.width, height);

            let border_style = match (cursor == Some(index), card.selected) {
                (true, _) => Style::default().fg(Color::Yellow),
                (false, true) => Style::default().fg(Color::Green),
                (false, false) => Style::default().fg(Color::DarkGray),
            };

            let paragraph = Paragraph::new(card.lines.clone()).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border_style),
            );
            f.render_widget(paragraph, card_area);
            hits.push((card_area, index));
            y += height;
        }

        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> CardStyle {
        CardStyle {
            use_glyphs: false,
            show_privileges: true,
        }
    }

    fn text(lines: &[Line<'_>]) -> Vec<String> {
        lines.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_full_card() {
        let contact = Contact::new(1, "Ana Garcia")
            .with_phone("555-1234")
            .with_circuit("Norte")
            .with_congregation("Centro")
            .with_privileges(["Anciano", "Precursor"]);

        assert_eq!(
            text(&card_lines(&contact, true, &plain())),
            vec![
                "[x] Ana Garcia",
                "Tel: 555-1234",
                "Circuito/Congregación: Norte · Centro",
                "Privilegios: Anciano, Precursor",
            ]
        );
    }

    #[test]
    fn test_missing_fields_produce_no_lines() {
        let contact = Contact::new(2, "Luis");
        let lines = text(&card_lines(&contact, false, &plain()));
        assert_eq!(lines, vec!["[ ] Luis"]);
        assert!(lines.iter().all(|l| !l.contains("undefined") && !l.contains("None")));
    }

    #[test]
    fn test_privileges_hidden_by_style() {
        let contact = Contact::new(3, "Eva").with_privileges(["Anciano"]);
        let style = CardStyle {
            use_glyphs: false,
            show_privileges: false,
        };
        assert_eq!(card_lines(&contact, false, &style).len(), 1);
    }

    #[test]
    fn test_refresh_patches_single_card() {
        let results = vec![Contact::new(1, "A"), Contact::new(2, "B")];
        let mut selection = SelectionStore::new();
        let mut deck = CardDeck::build(results, &selection, plain());
        assert_eq!(deck.is_checked(0), Some(false));

        selection.toggle(&Contact::new(2, "B"));
        selection.toggle(&Contact::new(1, "A"));
        deck.refresh(1, &selection);

        // Only the refreshed card reflects the change
        assert_eq!(deck.is_checked(1), Some(true));
        assert_eq!(deck.is_checked(0), Some(false));
        assert_eq!(deck.card_text(1)[0], "[x] B");
    }

    #[test]
    fn test_scroll_keeps_cursor_visible() {
        let results: Vec<_> = (1..=10).map(|i| Contact::new(i, format!("C{i}"))).collect();
        let mut deck = CardDeck::build(results, &SelectionStore::new(), plain());

        // Each card is 3 rows tall; 9 rows fit three cards
        deck.scroll_to(5, 9);
        assert_eq!(deck.offset, 3);
        deck.scroll_to(1, 9);
        assert_eq!(deck.offset, 1);
    }
}
