//! Conversation turns.
//!
//! A [`Turn`] is one message in the conversation, attributed to either the
//! user or the responder. Turns serialize in the wire shape the session
//! endpoint expects: `{ "timestamp", "speaker", "text" }`.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Greeting the responder opens every session with.
pub const DEFAULT_GREETING: &str = "Hello! I'm Eliza, how can I support you today?";

/// Reply shown when the responder could not be reached.
pub const FALLBACK_REPLY: &str = "Sorry, I'm having trouble responding right now.";

/// Who authored a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Speaker {
    /// The person typing.
    #[serde(rename = "user")]
    User,
    /// The remote responder.
    #[serde(rename = "eliza")]
    Responder,
}

impl Speaker {
    /// Display label used by renderers.
    pub fn label(self) -> &'static str {
        match self {
            Speaker::User => "You",
            Speaker::Responder => "Eliza",
        }
    }
}

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Author of the message.
    pub speaker: Speaker,
    /// Message text, already trimmed.
    pub text: String,
    /// When the turn was created.
    #[serde(rename = "timestamp")]
    pub occurred_at: DateTime<Utc>,
}

impl Turn {
    /// Create a turn with an explicit timestamp.
    pub fn new(speaker: Speaker, text: impl Into<String>, occurred_at: DateTime<Utc>) -> Self {
        Self {
            speaker,
            text: text.into(),
            occurred_at,
        }
    }

    /// Create a user turn stamped now.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Speaker::User, text, Utc::now())
    }

    /// Create a responder turn stamped now.
    pub fn responder(text: impl Into<String>) -> Self {
        Self::new(Speaker::Responder, text, Utc::now())
    }

    /// Time label in local time (HH:MM).
    pub fn time_label(&self) -> String {
        let local: DateTime<Local> = self.occurred_at.into();
        local.format("%H:%M").to_string()
    }
}
