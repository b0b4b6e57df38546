use crate::tui::app::{AppState, KeyAction};
use crate::tui::ui;
use crossterm::event::{self, Event, KeyCode};
use ratatui::prelude::{CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::{Duration, Instant};

pub fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut AppState,
    tick_rate: Duration,
) -> io::Result<()> {
    let mut last_tick = Instant::now();
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if handle_key(app, key.code) {
                    break;
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.on_tick();
            last_tick = Instant::now();
        }
    }
    Ok(())
}

/// Map a key to an app action. Returns true when the app should quit.
fn handle_key(app: &mut AppState, code: KeyCode) -> bool {
    if matches!(code, KeyCode::Char('?')) {
        let _ = app.handle_input(KeyAction::ToggleHelp);
        return false;
    }
    if matches!(code, KeyCode::Char('l') | KeyCode::Char('L')) {
        let _ = app.handle_input(KeyAction::ToggleLog);
        return false;
    }
    if app.help_open() {
        if matches!(code, KeyCode::Esc) {
            let _ = app.handle_input(KeyAction::ToggleHelp);
        }
        return false;
    }
    if app.log_open() {
        if matches!(code, KeyCode::Esc) {
            let _ = app.handle_input(KeyAction::ToggleLog);
        }
        return false;
    }

    let action = match code {
        KeyCode::Char('q') | KeyCode::Char('Q') => return true,
        KeyCode::Left => KeyAction::CardPrev,
        KeyCode::Right => KeyAction::CardNext,
        KeyCode::Up => KeyAction::PointerPrev,
        KeyCode::Down => KeyAction::PointerNext,
        KeyCode::Enter | KeyCode::Char(' ') => KeyAction::Select,
        KeyCode::Esc => KeyAction::Deselect,
        KeyCode::Char('e') | KeyCode::Char('E') => KeyAction::EndTurn,
        KeyCode::Char('f') | KeyCode::Char('F') => KeyAction::Flee,
        KeyCode::Char('n') | KeyCode::Char('N') => KeyAction::NewEncounter,
        _ => return false,
    };
    if app.handle_input(action) {
        app.on_tick();
    }
    false
}
