//! Best-effort session persistence.
//!
//! Each settled exchange hands a full transcript snapshot to the
//! [`PersistenceClient`], which ships it on a detached task. Failures are
//! logged and dropped: no retries, and the caller never waits.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::client::SessionSink;
use crate::turn::Turn;

/// Fire-and-forget transcript uploader.
#[derive(Clone)]
pub struct PersistenceClient {
    sink: Option<Arc<dyn SessionSink>>,
}

impl PersistenceClient {
    /// Persist through `sink`.
    pub fn new(sink: Arc<dyn SessionSink>) -> Self {
        Self { sink: Some(sink) }
    }

    /// A client that drops every snapshot.
    pub fn disabled() -> Self {
        Self { sink: None }
    }

    /// Whether snapshots are sent anywhere.
    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Send `snapshot` in the background.
    ///
    /// Must be called from within a tokio runtime. The returned handle may be
    /// dropped; it exists so tests can wait for delivery.
    pub fn persist(&self, session_id: &str, snapshot: Vec<Turn>) -> Option<JoinHandle<()>> {
        let sink = Arc::clone(self.sink.as_ref()?);
        let session_id = session_id.to_string();

        Some(tokio::spawn(async move {
            let turns = snapshot.len();
            match sink.save_session(&snapshot).await {
                Ok(()) => debug!(session_id = %session_id, turns, "Session saved"),
                Err(e) => {
                    warn!(session_id = %session_id, turns, error = %e, "Error saving session");
                }
            }
        }))
    }
}

impl std::fmt::Debug for PersistenceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistenceClient")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
