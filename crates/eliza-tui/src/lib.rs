//! eliza-tui: Terminal front ends for the eliza-chat client
//!
//! This crate provides:
//! - A full-screen chat view with a scrollable conversation pane
//! - A plain line-oriented mode for pipes and dumb terminals
//! - Headless mode for testing and automation

mod app;
mod conversation;
mod event;
pub mod headless;
mod input;
pub mod line_mode;
#[cfg(test)]
pub mod test_utils;
mod theme;

pub use app::App;
pub use conversation::{ConversationView, Entry};
pub use event::{Action, Event, EventHandler};
pub use eliza_engine;
pub use input::TextInputState;
pub use line_mode::run_line_mode;
pub use theme::Theme;

use crossterm::{
    cursor::Show as ShowCursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use eliza_engine::Config;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use tracing::info;

/// RAII guard for terminal state restoration.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen, ShowCursor);
    }
}

/// Run the full-screen chat.
///
/// Sets up the terminal, runs the event loop, and restores the terminal on
/// exit.
pub async fn run_tui(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = App::new(config)?;
    info!(
        server = %config.server_url,
        session_id = %app.controller().session().id,
        "Starting chat"
    );

    enable_raw_mode()?;
    let _guard = TerminalGuard;

    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // 10 Hz keeps the typing animation smooth
    let mut events = EventHandler::new(100);

    let result = run_loop(&mut terminal, &mut app, &mut events).await;

    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut EventHandler,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| app.render(frame.area(), frame.buffer_mut()))?;

        if let Some(event) = events.next().await {
            match event {
                Event::Key(key) => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                Event::Tick => app.tick(),
                Event::Resize(_, _) => {
                    // Redrawn on the next iteration
                }
            }
        }

        app.poll_exchange().await;

        if app.should_quit {
            break;
        }
    }

    info!("Chat closed");
    Ok(())
}

/// Get the TUI version.
pub fn tui_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tui_version() {
        let version = tui_version();
        assert!(!version.is_empty());
        assert!(version.starts_with("0."));
    }
}

#[cfg(test)]
mod render_tests {
    use super::*;
    use crate::test_utils::*;
    use eliza_engine::{PersistenceClient, Session, DEFAULT_GREETING};
    use std::sync::Arc;

    #[test]
    fn test_render_fresh_session() {
        let app = App::with_services(
            Session::start(DEFAULT_GREETING),
            Arc::new(FakeResponder::replying("Hi")),
            PersistenceClient::disabled(),
        );
        let screen = render_app_to_string(&app);

        let lines: Vec<&str> = screen.lines().collect();
        assert_eq!(lines.len(), usize::from(TEST_HEIGHT));
        assert!(lines[0].contains(" Eliza "));
        assert!(lines[1].contains("Eliza"));
        assert!(lines[2].contains(DEFAULT_GREETING));
        assert!(lines[TEST_HEIGHT as usize - 1].contains("Enter send"));
    }
}
