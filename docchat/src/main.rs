//! docchat - chat with your documents
//!
//! Terminal UI for uploading PDFs and websites to a question-answering
//! backend and asking questions about them.

mod app;
mod message_format;
mod ui;

use std::io;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use docchat_core::{Completions, Config, Dispatcher, HttpBackend};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::app::App;

/// Longest the loop sleeps waiting for input.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Parser)]
#[command(name = "docchat")]
#[command(about = "Chat with your documents")]
#[command(version)]
struct Args {
    /// Backend base URL (overrides the config file)
    #[arg(long, value_name = "URL")]
    backend: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = Config::load()
        .context("failed to load configuration")?
        .with_backend_url(args.backend)
        .context("invalid backend URL")?;

    // Initialize logging (to file, not stdout since we have a TUI)
    let _log_guard =
        docchat_core::logging::init(&config.logging).context("failed to initialize logging")?;

    tracing::info!(backend = %config.backend.base_url, "docchat TUI starting up");

    let backend = HttpBackend::new(&config.backend).context("failed to create HTTP client")?;
    let mut app = App::new(backend.base_url());
    let (dispatcher, mut completions) =
        Dispatcher::new(backend).context("failed to start request runtime")?;

    // Setup terminal
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    // Run the main loop
    let result = run_app(&mut terminal, &mut app, &dispatcher, &mut completions);

    // Restore terminal
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;

    tracing::info!("docchat TUI shutting down");

    result
}

/// Run the main application loop.
fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    dispatcher: &Dispatcher<HttpBackend>,
    completions: &mut Completions,
) -> Result<()> {
    loop {
        // Apply whatever the backend finished since the last frame
        for completion in completions.drain() {
            app.apply(completion);
        }

        // Fire due status auto-clears
        let now = Instant::now();
        app.tick(now);

        // Render
        terminal.draw(|frame| ui::render(frame, app))?;

        // Wake up early when a status is about to clear
        let timeout = app
            .next_deadline()
            .map(|deadline| deadline.saturating_duration_since(now).min(POLL_INTERVAL))
            .unwrap_or(POLL_INTERVAL);

        // Handle events
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(request) = app.handle_key(key) {
                        dispatcher.dispatch(request);
                    }
                }
            }
        }

        // Check if we should quit
        if app.should_quit {
            break;
        }
    }

    Ok(())
}
