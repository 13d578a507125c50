//! Search bookkeeping: request sequencing and what the card region shows

use crate::widgets::contact_cards::CardDeck;

/// Hands out increasing sequence numbers and remembers the newest one.
///
/// A completion is applied only if it carries the newest number; anything
/// older arrived out of order and is dropped.
#[derive(Debug, Default, Clone)]
pub struct SearchSequencer {
    latest: u64,
}

impl SearchSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    pub fn latest(&self) -> u64 {
        self.latest
    }

    pub fn is_current(&self, seq: u64) -> bool {
        seq == self.latest
    }
}

/// Content of the card region
#[derive(Debug, Clone)]
pub enum ResultsView {
    /// A search is outstanding for `term`
    Loading { term: String },
    /// The latest result set; may be empty
    Loaded(CardDeck),
    /// The latest search failed
    Failed { message: String },
}

impl ResultsView {
    pub fn deck(&self) -> Option<&CardDeck> {
        match self {
            ResultsView::Loaded(deck) => Some(deck),
            _ => None,
        }
    }

    pub fn deck_mut(&mut self) -> Option<&mut CardDeck> {
        match self {
            ResultsView::Loaded(deck) => Some(deck),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ResultsView::Loading { .. })
    }
}
