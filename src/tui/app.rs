//! TUI Application logic and event handling.

use super::ui;
use crate::cli::{build_client, Config};
use crate::dashboard::{DashboardClient, PollHandle};
use crate::document::SharedDocument;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::Duration;

/// How often the screen is redrawn from the shared document
const UI_TICK: Duration = Duration::from_millis(200);

/// User actions bound to keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Refresh,
    ToggleDarkMode,
}

impl Action {
    pub fn from_key(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
            KeyCode::Char('r') => Some(Action::Refresh),
            KeyCode::Char('d') => Some(Action::ToggleDarkMode),
            _ => None,
        }
    }
}

/// Application state for the dashboard
pub struct App {
    /// Client owning the document and preference store
    pub client: Arc<DashboardClient>,
    /// Document the refresh tasks render into
    pub document: SharedDocument,
    /// Server URL, shown in the header
    pub server_url: String,
    /// Set once the poller has exited
    pub polling_stopped: bool,
    /// Whether to exit
    pub should_quit: bool,
}

impl App {
    pub fn new(client: Arc<DashboardClient>, server_url: String) -> Self {
        Self {
            document: client.document(),
            client,
            server_url,
            polling_stopped: false,
            should_quit: false,
        }
    }

    pub fn apply(&mut self, action: Action, poller: &PollHandle) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Refresh => poller.request_refresh(),
            Action::ToggleDarkMode => {
                self.client.toggle_dark_mode();
            }
        }
    }
}

/// Run the TUI dashboard until the user quits
pub async fn run_dashboard(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let client = Arc::new(build_client(&config)?);
    let poller = Arc::clone(&client).start(config.refresh_interval());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(client, config.server.url.clone());
    let result = event_loop(&mut terminal, &mut app, &poller);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result?;
    poller.stop().await?;
    Ok(())
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    poller: &PollHandle,
) -> io::Result<()> {
    loop {
        app.polling_stopped = poller.is_finished();

        // Draw UI
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(UI_TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(action) = Action::from_key(key.code) {
                        app.apply(action, poller);
                    }
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
