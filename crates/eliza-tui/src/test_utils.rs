//! Test utilities for eliza-tui rendering and integration tests.
//!
//! Helpers for creating test terminals, converting buffers to strings and
//! faking the ELIZA service.

use crate::app::App;
use async_trait::async_trait;
use eliza_engine::{ClientError, Responder};
use ratatui::{backend::TestBackend, buffer::Buffer, layout::Rect, Terminal};

pub(crate) use crate::headless::buffer_to_string;

/// Default terminal width for tests.
pub const TEST_WIDTH: u16 = 80;

/// Default terminal height for tests.
pub const TEST_HEIGHT: u16 = 24;

/// Create a test terminal with the default dimensions (80x24).
pub fn create_test_terminal() -> Terminal<TestBackend> {
    create_test_terminal_sized(TEST_WIDTH, TEST_HEIGHT)
}

/// Create a test terminal with custom dimensions.
pub fn create_test_terminal_sized(width: u16, height: u16) -> Terminal<TestBackend> {
    let backend = TestBackend::new(width, height);
    Terminal::new(backend).expect("Failed to create test terminal")
}

/// Render the app at the default size and return the screen text.
pub fn render_app_to_string(app: &App) -> String {
    let area = Rect::new(0, 0, TEST_WIDTH, TEST_HEIGHT);
    let mut buffer = Buffer::empty(area);
    app.render(area, &mut buffer);
    buffer_to_string(&buffer)
}

/// Stand-in for the ELIZA service.
pub enum FakeResponder {
    /// Always answers with the given text.
    Replying(String),
    /// Always fails with a server error.
    Failing,
    /// Never answers.
    Pending,
}

impl FakeResponder {
    /// Answer every message with `reply`.
    pub fn replying(reply: &str) -> Self {
        Self::Replying(reply.to_string())
    }

    /// Fail every message with a 500.
    pub fn failing() -> Self {
        Self::Failing
    }

    /// Never answer.
    pub fn pending() -> Self {
        Self::Pending
    }
}

#[async_trait]
impl Responder for FakeResponder {
    async fn reply(&self, _message: &str) -> Result<String, ClientError> {
        match self {
            Self::Replying(reply) => Ok(reply.clone()),
            Self::Failing => Err(ClientError::Status {
                status: 500,
                body: "Internal Server Error".to_string(),
            }),
            Self::Pending => std::future::pending().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_terminal() {
        let terminal = create_test_terminal();
        let size = terminal.size().unwrap();
        assert_eq!(size.width, TEST_WIDTH);
        assert_eq!(size.height, TEST_HEIGHT);
    }

    #[test]
    fn test_buffer_to_string() {
        let area = Rect::new(0, 0, 10, 3);
        let mut buffer = Buffer::empty(area);
        buffer.set_string(0, 0, "Hello", ratatui::style::Style::default());
        buffer.set_string(0, 1, "World", ratatui::style::Style::default());

        let result = buffer_to_string(&buffer);
        assert_eq!(result, "Hello\nWorld\n");
    }
}
