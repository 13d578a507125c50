//! Terminal setup and the main event loop

use crate::app::DirectoryApp;
use crate::state::{AppEvent, CommandDispatcher};
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::Terminal;
use std::io;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::info;

/// Upper bound on how long the loop waits for terminal input
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Main run loop: dispatch queued commands, draw, read input, fire the
/// debounce timer, apply completed backend events.
pub fn run<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut DirectoryApp,
    dispatcher: &CommandDispatcher,
    events: &mut UnboundedReceiver<AppEvent>,
) -> io::Result<()> {
    app.start();

    loop {
        for command in app.take_commands() {
            dispatcher.dispatch(command);
        }

        terminal.draw(|f| app.draw(f))?;

        let timeout = app
            .next_deadline(Instant::now())
            .map_or(POLL_INTERVAL, |remaining| remaining.min(POLL_INTERVAL));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    app.handle_key(key, Instant::now());
                }
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }

        app.tick(Instant::now());

        while let Ok(event) = events.try_recv() {
            app.handle_event(event);
        }

        if app.should_quit() {
            info!(target: "system", "Quit requested");
            break;
        }
    }
    Ok(())
}

/// Set up the terminal, run the app, and restore the terminal even when the
/// loop fails
pub fn run_tui(
    app: &mut DirectoryApp,
    dispatcher: &CommandDispatcher,
    events: &mut UnboundedReceiver<AppEvent>,
) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, app, dispatcher, events);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}
