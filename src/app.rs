//! Contact directory interaction layer
//!
//! `DirectoryApp` owns every piece of UI state: the search field and its
//! debounce timer, the current result set, the selection store, the message
//! field and the send guard. It never performs I/O. Key and mouse handlers
//! queue [`Command`]s that the run loop hands to the dispatcher, and backend
//! completions come back through [`DirectoryApp::handle_event`].

use crate::config::Config;
use crate::contact::Contact;
use crate::message::{validate_send, OutgoingMessage};
use crate::search::{ResultsView, SearchSequencer};
use crate::selection::SelectionStore;
use crate::state::{AppEvent, Command};
use crate::utils::logging::LogRingBuffer;
use crate::widgets::confirm_dialog::{ConfirmAnswer, ConfirmDialog};
use crate::widgets::contact_cards::{CardDeck, CardStyle};
use crate::widgets::debounced_input::{DebouncedInput, DebouncedInputAction, DebouncedInputBuilder};
use crate::widgets::log_panel::LogPanel;
use crate::widgets::submit_button::SubmitButton;
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use tui_input::{backend::crossterm::EventHandler, Input};

/// Region receiving keyboard input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Search,
    Cards,
    Message,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Search => Focus::Cards,
            Focus::Cards => Focus::Message,
            Focus::Message => Focus::Search,
        }
    }

    fn previous(self) -> Self {
        match self {
            Focus::Search => Focus::Message,
            Focus::Cards => Focus::Search,
            Focus::Message => Focus::Cards,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

/// Dismissible one-line message shown under the search box
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    fn new(kind: NoticeKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

pub struct DirectoryApp {
    search: DebouncedInput,
    message: Input,
    selection: SelectionStore,
    results: ResultsView,
    sequencer: SearchSequencer,
    card_style: CardStyle,
    cursor: usize,
    focus: Focus,
    notice: Option<Notice>,
    pending_send: Option<(ConfirmDialog, OutgoingMessage)>,
    send_in_flight: bool,
    log_buffer: Option<LogRingBuffer>,
    log_panel: Option<LogPanel>,
    /// Screen area of each drawn card, from the last frame
    card_hits: Vec<(Rect, usize)>,
    submit_hit: Option<Rect>,
    outbox: Vec<Command>,
    should_quit: bool,
}

impl DirectoryApp {
    pub fn new(config: &Config) -> Self {
        let search = DebouncedInputBuilder::new()
            .debounce_ms(config.search.debounce_ms)
            .show_indicator(config.search.show_debounce_indicator)
            .title("Buscar contactos")
            .build();

        Self {
            search,
            message: Input::default(),
            selection: SelectionStore::new(),
            results: ResultsView::Loading {
                term: String::new(),
            },
            sequencer: SearchSequencer::new(),
            card_style: CardStyle {
                use_glyphs: config.display.use_glyphs,
                show_privileges: config.display.show_privileges,
            },
            cursor: 0,
            focus: Focus::Search,
            notice: None,
            pending_send: None,
            send_in_flight: false,
            log_buffer: None,
            log_panel: None,
            card_hits: Vec::new(),
            submit_hit: None,
            outbox: Vec::new(),
            should_quit: false,
        }
    }

    /// Enable the F5 log panel backed by `buffer`
    pub fn with_log_buffer(mut self, buffer: LogRingBuffer) -> Self {
        self.log_buffer = Some(buffer);
        self
    }

    /// Initial unconditional search for the empty term
    pub fn start(&mut self) {
        info!(target: "search", "Loading all contacts");
        self.dispatch_search(String::new());
    }

    /// Commands queued since the last call
    pub fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.outbox)
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn selection(&self) -> &SelectionStore {
        &self.selection
    }

    pub fn results(&self) -> &ResultsView {
        &self.results
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn confirmation_prompt(&self) -> Option<&str> {
        self.pending_send.as_ref().map(|(dialog, _)| dialog.prompt())
    }

    pub fn is_sending(&self) -> bool {
        self.send_in_flight
    }

    pub fn search_value(&self) -> &str {
        self.search.value()
    }

    pub fn message_value(&self) -> &str {
        self.message.value()
    }

    pub fn submit_button(&self) -> SubmitButton {
        SubmitButton::new(self.selection.count(), self.send_in_flight)
    }

    /// Time until the pending search fires, for the run loop's poll timeout
    pub fn next_deadline(&self, now: Instant) -> Option<Duration> {
        self.search.debouncer().time_remaining_at(now)
    }

    // ----- search -------------------------------------------------------

    fn dispatch_search(&mut self, term: String) {
        let term = term.trim().to_string();
        let seq = self.sequencer.next();
        self.results = ResultsView::Loading { term: term.clone() };
        self.cursor = 0;
        self.card_hits.clear();
        self.outbox.push(Command::Search { seq, term });
    }

    /// Fire the debounced search if its quiet period has elapsed
    pub fn tick(&mut self, now: Instant) {
        if let Some(term) = self.search.check_debounce(now) {
            debug!(target: "search", "Debounce elapsed, searching '{}'", term);
            self.dispatch_search(term);
        }
    }

    /// Replace the displayed result set
    pub fn render_results(&mut self, results: Vec<Contact>) {
        debug!(target: "search", "Rendering {} cards", results.len());
        self.results = ResultsView::Loaded(CardDeck::build(
            results,
            &self.selection,
            self.card_style,
        ));
        self.cursor = 0;
    }

    // ----- selection ----------------------------------------------------

    /// Toggle the contact on card `index` and patch only that card
    pub fn toggle_card(&mut self, index: usize) {
        let Some(deck) = self.results.deck_mut() else {
            return;
        };
        let Some(contact) = deck.contact(index).cloned() else {
            return;
        };
        self.selection.toggle(&contact);
        deck.refresh(index, &self.selection);
    }

    fn move_cursor(&mut self, delta: isize) {
        let Some(len) = self.results.deck().map(CardDeck::len) else {
            return;
        };
        if len == 0 {
            return;
        }
        let target = self.cursor as isize + delta;
        self.cursor = target.clamp(0, len as isize - 1) as usize;
    }

    // ----- send ---------------------------------------------------------

    /// Validate and open the confirmation dialog
    pub fn request_send(&mut self) {
        if self.send_in_flight {
            debug!(target: "send", "Send already in flight, ignoring");
            return;
        }

        match validate_send(&self.selection.contacts(), self.message.value()) {
            Ok(outgoing) => {
                let dialog = ConfirmDialog::new(outgoing.confirmation_prompt());
                self.pending_send = Some((dialog, outgoing));
            }
            Err(e) => {
                warn!(target: "send", "Send blocked: {}", e);
                self.notice = Some(Notice::new(NoticeKind::Error, e.to_string()));
            }
        }
    }

    fn answer_confirmation(&mut self, answer: ConfirmAnswer) {
        let Some((_, outgoing)) = self.pending_send.take() else {
            return;
        };
        match answer {
            ConfirmAnswer::Yes => {
                info!(target: "send", "Confirmed send to {} recipients", outgoing.recipient_count());
                self.send_in_flight = true;
                self.notice = Some(Notice::new(
                    NoticeKind::Info,
                    format!("Enviando a {} contacto(s)...", outgoing.recipient_count()),
                ));
                self.outbox.push(Command::Send {
                    recipients: outgoing.recipients,
                    text: outgoing.text,
                });
            }
            ConfirmAnswer::No => {
                self.notice = Some(Notice::new(NoticeKind::Info, "Envío cancelado."));
            }
        }
    }

    // ----- events -------------------------------------------------------

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::SearchCompleted { seq, term, result } => {
                if !self.sequencer.is_current(seq) {
                    debug!(
                        target: "search",
                        "Discarding stale search #{} ('{}'), latest is #{}",
                        seq,
                        term,
                        self.sequencer.latest()
                    );
                    return;
                }
                match result {
                    Ok(contacts) => self.render_results(contacts),
                    Err(e) => {
                        warn!(target: "search", "Search '{}' failed: {}", term, e);
                        self.results = ResultsView::Failed {
                            message: e.to_string(),
                        };
                        self.card_hits.clear();
                    }
                }
            }
            AppEvent::SendCompleted { result } => {
                self.send_in_flight = false;
                self.notice = Some(match result {
                    Ok(reply) => Notice::new(NoticeKind::Success, reply),
                    Err(e) => {
                        warn!(target: "send", "Send failed: {}", e);
                        Notice::new(NoticeKind::Error, format!("Error al enviar: {}", e))
                    }
                });
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        crate::trace_key!(key);

        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
        {
            self.should_quit = true;
            return;
        }

        if let Some(panel) = self.log_panel.as_mut() {
            if panel.handle_key(key) {
                self.log_panel = None;
            }
            return;
        }

        if let Some((dialog, _)) = &self.pending_send {
            if let Some(answer) = dialog.handle_key(key) {
                self.answer_confirmation(answer);
            }
            return;
        }

        match key.code {
            KeyCode::F(5) => {
                if let Some(buffer) = &self.log_buffer {
                    self.log_panel = Some(LogPanel::new(buffer.clone()));
                }
                return;
            }
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.request_send();
                return;
            }
            KeyCode::Tab => {
                self.focus = self.focus.next();
                return;
            }
            KeyCode::BackTab => {
                self.focus = self.focus.previous();
                return;
            }
            KeyCode::Esc => {
                if self.notice.take().is_none() {
                    self.focus = Focus::Search;
                }
                return;
            }
            _ => {}
        }

        match self.focus {
            Focus::Search => self.handle_search_key(key, now),
            Focus::Cards => self.handle_cards_key(key),
            Focus::Message => self.handle_message_key(key),
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent, now: Instant) {
        match self.search.handle_key(key, now) {
            DebouncedInputAction::Confirm(term) => self.dispatch_search(term),
            DebouncedInputAction::InputChanged(_)
            | DebouncedInputAction::Continue
            | DebouncedInputAction::PassThrough => {}
        }
    }

    fn handle_cards_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1),
            KeyCode::PageUp => self.move_cursor(-10),
            KeyCode::PageDown => self.move_cursor(10),
            KeyCode::Home | KeyCode::Char('g') => self.move_cursor(isize::MIN / 2),
            KeyCode::End | KeyCode::Char('G') => self.move_cursor(isize::MAX / 2),
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_card(self.cursor),
            _ => {}
        }
    }

    fn handle_message_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Enter {
            self.request_send();
            return;
        }
        self.message.handle_event(&Event::Key(key));
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.pending_send.is_some() || self.log_panel.is_some() {
            return;
        }

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let point = Position::new(mouse.column, mouse.row);
                let hit = self
                    .card_hits
                    .iter()
                    .find(|(area, _)| area.contains(point))
                    .map(|(_, index)| *index);
                if let Some(index) = hit {
                    self.focus = Focus::Cards;
                    self.cursor = index;
                    self.toggle_card(index);
                } else if self.submit_hit.is_some_and(|area| area.contains(point)) {
                    self.request_send();
                }
            }
            MouseEventKind::ScrollDown => self.move_cursor(1),
            MouseEventKind::ScrollUp => self.move_cursor(-1),
            _ => {}
        }
    }

    // ----- drawing ------------------------------------------------------

    pub fn draw(&mut self, f: &mut Frame) {
        let notice_height = u16::from(self.notice.is_some());
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),             // Search input
                Constraint::Length(notice_height), // Notice line
                Constraint::Min(5),                // Cards
                Constraint::Length(3),             // Message + submit
                Constraint::Length(1),             // Help line
            ])
            .split(f.area());

        self.search.render(f, chunks[0], self.focus == Focus::Search);

        if let Some(notice) = &self.notice {
            self.draw_notice(f, chunks[1], notice);
        }

        if let Some(panel) = &self.log_panel {
            panel.render(f, chunks[2]);
            self.card_hits.clear();
        } else {
            self.draw_results(f, chunks[2]);
        }

        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(20), Constraint::Length(32)])
            .split(chunks[3]);
        self.draw_message(f, bottom[0]);
        self.submit_button().render(f, bottom[1]);
        self.submit_hit = Some(bottom[1]);

        let help = Paragraph::new(self.help_text()).style(Style::default().fg(Color::DarkGray));
        f.render_widget(help, chunks[4]);

        if let Some((dialog, _)) = &self.pending_send {
            dialog.render(f);
        }
    }

    fn draw_notice(&self, f: &mut Frame, area: Rect, notice: &Notice) {
        let color = match notice.kind {
            NoticeKind::Info => Color::Cyan,
            NoticeKind::Success => Color::Green,
            NoticeKind::Error => Color::Red,
        };
        let line = Line::from(vec![
            Span::styled(
                notice.text.as_str(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled("  (Esc: cerrar)", Style::default().fg(Color::DarkGray)),
        ]);
        f.render_widget(Paragraph::new(line), area);
    }

    fn draw_results(&mut self, f: &mut Frame, area: Rect) {
        let title = match self.results.deck() {
            Some(deck) => format!(
                "Contactos ({}) · Seleccionados: {}",
                deck.len(),
                self.selection.count()
            ),
            None => format!("Contactos · Seleccionados: {}", self.selection.count()),
        };
        let border = if self.focus == Focus::Cards {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(border);
        let inner = block.inner(area);
        f.render_widget(block, area);

        let cursor = (self.focus == Focus::Cards).then_some(self.cursor);
        match &mut self.results {
            ResultsView::Loading { term } => {
                let text = Paragraph::new(format!("Buscando '{}'...", term))
                    .style(Style::default().fg(Color::DarkGray))
                    .alignment(Alignment::Center);
                f.render_widget(text, inner);
                self.card_hits.clear();
            }
            ResultsView::Failed { message } => {
                let text = Paragraph::new(vec![
                    Line::from(Span::styled(
                        "Error de conexión: no se pudo comunicar con el servidor.",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(message.clone()),
                ])
                .wrap(Wrap { trim: true });
                f.render_widget(text, inner);
                self.card_hits.clear();
            }
            ResultsView::Loaded(deck) if deck.is_empty() => {
                let text = Paragraph::new(vec![
                    Line::from(Span::styled(
                        "No se encontraron contactos",
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    Line::from("Intenta con otro término de búsqueda."),
                ])
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center);
                f.render_widget(text, inner);
                self.card_hits.clear();
            }
            ResultsView::Loaded(deck) => {
                self.card_hits = deck.render(f, inner, cursor);
            }
        }
    }

    fn draw_message(&self, f: &mut Frame, area: Rect) {
        let focused = self.focus == Focus::Message;
        let style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let width = area.width.saturating_sub(2) as usize;
        let scroll = self.message.visual_scroll(width);
        let widget = Paragraph::new(self.message.value())
            .scroll((0, scroll as u16))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Mensaje")
                    .border_style(style),
            );
        f.render_widget(widget, area);

        if focused {
            let cursor = self.message.visual_cursor().saturating_sub(scroll) as u16;
            f.set_cursor_position((area.x + cursor + 1, area.y + 1));
        }
    }

    fn help_text(&self) -> &'static str {
        if self.log_panel.is_some() {
            return "Registro: ↑↓ desplazar | F5/Esc: cerrar";
        }
        if self.pending_send.is_some() {
            return "Confirmar envío: s/y/Enter: sí | n/Esc: no";
        }
        match self.focus {
            Focus::Search => {
                "Buscar: escribe para filtrar | Enter: buscar ya | Tab: tarjetas | Ctrl+S: enviar | F5: registro | Ctrl+Q: salir"
            }
            Focus::Cards => {
                "Tarjetas: ↑↓/jk mover | Espacio/Enter/clic: seleccionar | Tab: mensaje | Esc: buscar | Ctrl+S/clic en botón: enviar"
            }
            Focus::Message => {
                "Mensaje: escribe el texto | Enter/Ctrl+S: enviar | Tab: buscar | Esc: volver"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NetworkError;

    fn app() -> DirectoryApp {
        DirectoryApp::new(&Config::default())
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn loaded(app: &mut DirectoryApp, contacts: Vec<Contact>) {
        let seq = app.sequencer.next();
        app.handle_event(AppEvent::SearchCompleted {
            seq,
            term: String::new(),
            result: Ok(contacts),
        });
    }

    #[test]
    fn test_start_searches_empty_term() {
        let mut app = app();
        app.start();
        assert_eq!(
            app.take_commands(),
            vec![Command::Search {
                seq: 1,
                term: String::new()
            }]
        );
        assert!(app.results().is_loading());
    }

    #[test]
    fn test_focus_cycles() {
        let mut app = app();
        app.handle_key(key(KeyCode::Tab), Instant::now());
        assert_eq!(app.focus(), Focus::Cards);
        app.handle_key(key(KeyCode::Tab), Instant::now());
        assert_eq!(app.focus(), Focus::Message);
        app.handle_key(key(KeyCode::BackTab), Instant::now());
        assert_eq!(app.focus(), Focus::Cards);
        app.handle_key(key(KeyCode::Esc), Instant::now());
        assert_eq!(app.focus(), Focus::Search);
    }

    #[test]
    fn test_cursor_is_clamped() {
        let mut app = app();
        loaded(
            &mut app,
            vec![Contact::new(1, "A"), Contact::new(2, "B"), Contact::new(3, "C")],
        );
        app.handle_key(key(KeyCode::Tab), Instant::now());

        app.handle_key(key(KeyCode::End), Instant::now());
        assert_eq!(app.cursor(), 2);
        app.handle_key(key(KeyCode::Down), Instant::now());
        assert_eq!(app.cursor(), 2);
        app.handle_key(key(KeyCode::Home), Instant::now());
        assert_eq!(app.cursor(), 0);

        app.handle_key(key(KeyCode::Char(' ')), Instant::now());
        assert!(app.selection().is_selected(crate::contact::ContactId(1)));
    }

    #[test]
    fn test_failed_search_shows_error() {
        let mut app = app();
        app.start();
        app.take_commands();
        app.handle_event(AppEvent::SearchCompleted {
            seq: 1,
            term: String::new(),
            result: Err(NetworkError::Status {
                status: 500,
                body: "boom".to_string(),
            }),
        });
        assert!(matches!(app.results(), ResultsView::Failed { message } if message.contains("500")));
    }

    #[test]
    fn test_send_failure_reports_reason_and_clears_guard() {
        let mut app = app();
        app.send_in_flight = true;
        app.handle_event(AppEvent::SendCompleted {
            result: Err(NetworkError::Decode("bad json".to_string()).into()),
        });

        assert!(!app.is_sending());
        let notice = app.notice().unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert!(notice.text.contains("bad json"));
    }

    #[test]
    fn test_ctrl_q_quits() {
        let mut app = app();
        app.handle_key(
            KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL),
            Instant::now(),
        );
        assert!(app.should_quit());
    }
}
