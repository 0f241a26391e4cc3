//! eliza-engine: Headless exchange engine for the eliza-chat client
//!
//! This crate provides the core chat loop, independent of any display:
//! - Turn and transcript types for the active session
//! - The exchange controller state machine
//! - HTTP client for the ELIZA web service
//! - Best-effort session persistence
//! - Configuration

pub mod client;
pub mod config;
pub mod exchange;
pub mod persistence;
pub mod render;
pub mod transcript;
pub mod turn;

// Re-export commonly used types
pub use client::{ClientError, HttpClient, Responder, SessionSink};
pub use config::{Config, ConfigError};
pub use exchange::{ExchangeController, ExchangeOutcome, ExchangeState, Settlement, Submission};
pub use persistence::PersistenceClient;
pub use render::Renderer;
pub use transcript::{Session, Transcript};
pub use turn::{Speaker, Turn, DEFAULT_GREETING, FALLBACK_REPLY};

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
