//! Session transcript.
//!
//! The transcript is an append-only log of turns for the active session.
//! There is no removal operation; store order is render order.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::turn::{Speaker, Turn};

/// Ordered, append-only list of turns.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn.
    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Copy of the current contents, in insertion order.
    pub fn snapshot(&self) -> Vec<Turn> {
        self.turns.clone()
    }

    /// Number of turns.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Check if the transcript is empty.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Most recent turn.
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Iterate turns in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Turn> {
        self.turns.iter()
    }
}

/// The active chat session.
#[derive(Debug, Clone)]
pub struct Session {
    /// Unique session ID (used for log correlation).
    pub id: String,
    /// When the session started.
    pub started_at: DateTime<Utc>,
    transcript: Transcript,
}

impl Session {
    /// Start a session seeded with the responder's greeting.
    pub fn start(greeting: impl Into<String>) -> Self {
        let started_at = Utc::now();
        let mut transcript = Transcript::new();
        transcript.append(Turn::new(Speaker::Responder, greeting, started_at));
        Self {
            id: Uuid::new_v4().to_string(),
            started_at,
            transcript,
        }
    }

    /// Read access to the transcript.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Append a new turn stamped with the session clock and return a copy of it.
    pub fn record(&mut self, speaker: Speaker, text: impl Into<String>) -> Turn {
        let turn = Turn::new(speaker, text, self.next_timestamp());
        self.transcript.append(turn.clone());
        turn
    }

    /// Current time, clamped so it never precedes the last turn.
    fn next_timestamp(&self) -> DateTime<Utc> {
        let now = Utc::now();
        self.transcript
            .last()
            .map_or(now, |last| last.occurred_at.max(now))
    }
}
