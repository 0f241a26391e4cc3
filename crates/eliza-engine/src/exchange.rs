//! Exchange controller.
//!
//! Drives one request/response cycle at a time:
//!
//! ```text
//! Idle ──submit──▶ AwaitingResponse ──reply──▶ Settled(Success)
//!                        │                          │
//!                        └──────error──▶ Settled(Failure)
//!                                                   │
//!            next submit starts a new exchange ◀────┘
//! ```
//!
//! The controller owns the session and the renderer. The remote call runs on
//! a spawned task; the owning loop polls for its completion so rendering and
//! input stay responsive while a reply is pending.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::client::{ClientError, Responder};
use crate::persistence::PersistenceClient;
use crate::render::Renderer;
use crate::transcript::Session;
use crate::turn::{Speaker, Turn, FALLBACK_REPLY};

/// How an exchange ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// The responder replied.
    Success,
    /// The fallback reply was shown instead.
    Failure,
}

/// Controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExchangeState {
    /// No exchange has run yet.
    #[default]
    Idle,
    /// A request is in flight.
    AwaitingResponse,
    /// The last exchange finished.
    Settled(Settlement),
}

/// Result of a submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// An exchange started; the caller should clear its input.
    Started,
    /// Input was empty after trimming.
    Ignored,
    /// An exchange is already in flight.
    Busy,
}

/// A settled exchange.
#[derive(Debug)]
pub struct ExchangeOutcome {
    /// Success or fallback.
    pub settlement: Settlement,
    /// The responder turn that was rendered.
    pub turn: Turn,
    /// Background persistence task, if persistence is enabled.
    pub persist_task: Option<JoinHandle<()>>,
}

/// State machine for request/response cycles.
pub struct ExchangeController<R: Renderer> {
    session: Session,
    renderer: R,
    responder: Arc<dyn Responder>,
    persistence: PersistenceClient,
    state: ExchangeState,
    in_flight: Option<JoinHandle<Result<String, ClientError>>>,
}

impl<R: Renderer> ExchangeController<R> {
    /// Create a controller and render the session's existing turns.
    pub fn new(
        session: Session,
        mut renderer: R,
        responder: Arc<dyn Responder>,
        persistence: PersistenceClient,
    ) -> Self {
        for turn in session.transcript().iter() {
            renderer.render_turn(turn);
        }

        Self {
            session,
            renderer,
            responder,
            persistence,
            state: ExchangeState::Idle,
            in_flight: None,
        }
    }

    /// Current state.
    pub fn state(&self) -> ExchangeState {
        self.state
    }

    /// Whether a request is in flight.
    pub fn is_awaiting(&self) -> bool {
        self.state == ExchangeState::AwaitingResponse
    }

    /// The active session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The renderer.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Mutable access to the renderer (scrolling, animation).
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Submit user input.
    ///
    /// Echoes the user turn, shows the composing indicator and spawns the
    /// remote request. Must be called from within a tokio runtime.
    pub fn submit(&mut self, input: &str) -> Submission {
        let message = input.trim();
        if message.is_empty() {
            return Submission::Ignored;
        }

        if self.is_awaiting() {
            debug!(session_id = %self.session.id, "Submission rejected, exchange in flight");
            return Submission::Busy;
        }

        let turn = self.session.record(Speaker::User, message);
        self.renderer.render_turn(&turn);
        self.renderer.show_composing_indicator();
        self.state = ExchangeState::AwaitingResponse;

        debug!(session_id = %self.session.id, chars = turn.text.len(), "Exchange started");

        let responder = Arc::clone(&self.responder);
        let message = turn.text;
        self.in_flight = Some(tokio::spawn(async move {
            responder.reply(&message).await
        }));

        Submission::Started
    }

    /// Settle the in-flight exchange if its request has completed.
    ///
    /// Returns `None` when nothing is in flight or the reply is still pending.
    pub async fn poll_settlement(&mut self) -> Option<ExchangeOutcome> {
        if !self.in_flight.as_ref()?.is_finished() {
            return None;
        }
        self.settle().await
    }

    /// Wait for the in-flight exchange and settle it.
    pub async fn settle(&mut self) -> Option<ExchangeOutcome> {
        let handle = self.in_flight.take()?;
        let result = match handle.await {
            Ok(result) => result,
            Err(e) => Err(ClientError::TaskFailed(e.to_string())),
        };
        Some(self.finish(result))
    }

    /// Abort the in-flight request without settling it.
    ///
    /// The indicator is removed and the controller returns to `Idle`; the
    /// unanswered user turn stays in the transcript and nothing is persisted.
    pub fn abort(&mut self) {
        let Some(handle) = self.in_flight.take() else {
            return;
        };
        handle.abort();
        self.renderer.hide_composing_indicator();
        self.state = ExchangeState::Idle;
        debug!(session_id = %self.session.id, "Exchange aborted");
    }

    fn finish(&mut self, result: Result<String, ClientError>) -> ExchangeOutcome {
        self.renderer.hide_composing_indicator();

        let reply = result.and_then(|reply| {
            let reply = reply.trim();
            if reply.is_empty() {
                Err(ClientError::MissingReply)
            } else {
                Ok(reply.to_string())
            }
        });

        let (settlement, text) = match reply {
            Ok(text) => (Settlement::Success, text),
            Err(e) => {
                warn!(session_id = %self.session.id, error = %e, "Exchange failed");
                (Settlement::Failure, FALLBACK_REPLY.to_string())
            }
        };

        let turn = self.session.record(Speaker::Responder, text);
        self.renderer.render_turn(&turn);
        self.state = ExchangeState::Settled(settlement);

        debug!(session_id = %self.session.id, ?settlement, "Exchange settled");

        let persist_task = self
            .persistence
            .persist(&self.session.id, self.session.transcript().snapshot());

        ExchangeOutcome {
            settlement,
            turn,
            persist_task,
        }
    }
}
