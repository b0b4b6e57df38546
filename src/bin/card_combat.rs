use card_combat::tui::{app::AppState, controller};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use ratatui::prelude::*;
use std::fs::File;
use std::io::{self, IsTerminal, Stdout};
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(
        stdout,
        crossterm::terminal::EnterAlternateScreen,
        crossterm::event::EnableMouseCapture
    )?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        crossterm::event::DisableMouseCapture,
        crossterm::terminal::LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Log to the file named by `CARD_COMBAT_LOG`; the terminal belongs to the UI.
fn setup_logging() -> io::Result<()> {
    let Some(path) = std::env::var_os("CARD_COMBAT_LOG") else {
        return Ok(());
    };
    let file = File::create(&path)?;
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("card_combat=debug"));
    let file_layer =
        tracing_subscriber::fmt::layer().with_writer(Mutex::new(file)).with_ansi(false);
    tracing_subscriber::registry().with(env_filter).with(file_layer).init();
    tracing::info!(path = %path.to_string_lossy(), version = card_combat::VERSION, "logging initialized");
    Ok(())
}

fn main() -> io::Result<()> {
    if !io::stdout().is_terminal() {
        println!(
            "card-combat TUI requires a real terminal (TTY).\nRun in Terminal and press q to quit. Version: {}",
            card_combat::VERSION
        );
        return Ok(());
    }
    setup_logging()?;
    let mut terminal = setup_terminal()?;
    let tick_rate = Duration::from_millis(100);
    let mut app = AppState::from_env();

    let res = controller::run(&mut terminal, &mut app, tick_rate);

    // Always attempt to restore terminal
    restore_terminal(terminal)?;
    res
}
