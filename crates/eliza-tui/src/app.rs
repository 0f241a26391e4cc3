//! Application state and update logic for the eliza-chat TUI.

use std::sync::Arc;

use crossterm::event::{KeyEvent, MouseEvent, MouseEventKind};
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};
use tracing::debug;

use eliza_engine::{
    ClientError, Config, ExchangeController, ExchangeOutcome, HttpClient, PersistenceClient,
    Responder, Session, Submission,
};

use crate::conversation::{ConversationPane, ConversationView, SCROLL_SPEED};
use crate::event::{key_to_action, Action};
use crate::input::TextInputState;
use crate::theme::Theme;

/// Entries moved per PageUp/PageDown.
const PAGE_SCROLL: usize = 5;

/// Main application state.
pub struct App {
    /// Exchange controller; owns the session and the conversation view.
    controller: ExchangeController<ConversationView>,
    /// Message being composed.
    pub input: TextInputState,
    /// Color palette.
    pub theme: Theme,
    /// Whether the app should quit.
    pub should_quit: bool,
}

impl App {
    /// Create an app talking to the service named in the config.
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        let client = Arc::new(HttpClient::from_config(config)?);
        let persistence = if config.persist_sessions {
            PersistenceClient::new(client.clone())
        } else {
            PersistenceClient::disabled()
        };

        Ok(Self::with_services(
            Session::start(config.greeting.clone()),
            client,
            persistence,
        ))
    }

    /// Create an app with explicit collaborators.
    pub fn with_services(
        session: Session,
        responder: Arc<dyn Responder>,
        persistence: PersistenceClient,
    ) -> Self {
        Self {
            controller: ExchangeController::new(
                session,
                ConversationView::new(),
                responder,
                persistence,
            ),
            input: TextInputState::new(),
            theme: Theme::default(),
            should_quit: false,
        }
    }

    /// The exchange controller.
    pub fn controller(&self) -> &ExchangeController<ConversationView> {
        &self.controller
    }

    /// The conversation view.
    pub fn view(&self) -> &ConversationView {
        self.controller.renderer()
    }

    /// Handle a key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        self.handle_action(key_to_action(key));
    }

    /// Handle a mouse event (wheel scrolling only).
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollUp => self.controller.renderer_mut().scroll_up(SCROLL_SPEED),
            MouseEventKind::ScrollDown => self.controller.renderer_mut().scroll_down(SCROLL_SPEED),
            _ => {}
        }
    }

    /// Apply an action.
    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.quit(),
            Action::Submit => self.submit(),
            Action::Newline => self.input.insert('\n'),
            Action::Insert(c) => self.input.insert(c),
            Action::Backspace => self.input.backspace(),
            Action::Delete => self.input.delete(),
            Action::Left => self.input.move_left(),
            Action::Right => self.input.move_right(),
            Action::Home => self.input.move_home(),
            Action::End => {
                self.input.move_end();
                self.controller.renderer_mut().jump_to_end();
            }
            Action::HistoryPrev => self.input.history_prev(),
            Action::HistoryNext => self.input.history_next(),
            Action::ScrollUp => self.controller.renderer_mut().scroll_up(1),
            Action::ScrollDown => self.controller.renderer_mut().scroll_down(1),
            Action::PageUp => self.controller.renderer_mut().scroll_up(PAGE_SCROLL),
            Action::PageDown => self.controller.renderer_mut().scroll_down(PAGE_SCROLL),
            Action::None => {}
        }
    }

    fn submit(&mut self) {
        match self.controller.submit(self.input.content()) {
            Submission::Started => {
                self.input.submit();
            }
            Submission::Busy => debug!("Reply pending, keeping draft"),
            Submission::Ignored => {}
        }
    }

    /// Apply a completed reply, if any.
    pub async fn poll_exchange(&mut self) -> Option<ExchangeOutcome> {
        self.controller.poll_settlement().await
    }

    /// Advance animations.
    pub fn tick(&mut self) {
        self.controller.renderer_mut().tick();
    }

    /// Stop the app, aborting any in-flight request.
    pub fn quit(&mut self) {
        self.controller.abort();
        self.should_quit = true;
    }

    /// Draw the app into a buffer.
    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        ConversationPane::new(self.view(), &self.input, &self.theme)
            .state(self.controller.state())
            .render(area, buf);
    }
}
