//! Terminal User Interface Module
//!
//! Terminal storefront built with Ratatui around the incremental search box.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                 🃏 Card Market Storefront  ✓ 46986414            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌─ ⌕ Search ──────────────────────────────────────────────┐   │
//! │  │ dark magi                                          … ✗  │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │  ┌─ Results 20/25 ─────────────────────────────────────────┐   │
//! │  │ ▶ ✓ ▣ Dark Magician  LOB-005 (UR)                        │   │
//! │  │     ▣ Dark Magician Girl  MFC-000 (ScR)                  │   │
//! │  │ ↓ Load more                                              │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │ Ready │ [Enter] Search [↑/↓] Browse [Ctrl+U] Clear [Ctrl+Q] Quit │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod app;
pub mod event;
pub mod theme;
pub mod ui;
pub mod widgets;

pub use app::{App, AppEvent, View};
pub use event::{AppAction, EventHandler};

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use std::io::{self, Stdout};
use tracing::{error, info};

/// Type alias for our terminal backend
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Initialize the terminal for TUI mode
pub fn init_terminal() -> anyhow::Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to its original state
pub fn restore_terminal(terminal: &mut Tui) -> anyhow::Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the TUI application
pub async fn run(config: crate::config::Config) -> anyhow::Result<()> {
    info!(api_url = %config.storefront.api_url, "Starting TUI mode");

    let mut terminal = init_terminal()?;
    let mut app = App::new(config);
    let mut events = EventHandler::new(std::time::Duration::from_millis(50));

    let result = run_app(&mut terminal, &mut app, &mut events).await;

    if let Err(e) = restore_terminal(&mut terminal) {
        error!("Failed to restore terminal: {}", e);
    }

    result
}

/// Main application loop
async fn run_app(
    terminal: &mut Tui,
    app: &mut App,
    events: &mut EventHandler,
) -> anyhow::Result<()> {
    loop {
        let size = terminal.size()?;
        app.update_layout(Rect::new(0, 0, size.width, size.height));

        terminal.draw(|frame| ui::render(frame, app))?;

        // Block for one action, then drain whatever else is queued
        let Some(first) = events.next().await else {
            break;
        };
        let mut pending = Some(first);
        while let Some(action) = pending.take().or_else(|| events.try_next()) {
            app.handle_action(action);
            if app.should_quit {
                break;
            }
        }
        if app.should_quit {
            break;
        }

        // Input is drained; let the search box catch up
        app.update();
    }

    info!("TUI exited normally");
    Ok(())
}
