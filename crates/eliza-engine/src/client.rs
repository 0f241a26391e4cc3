//! HTTP client for the ELIZA web service.
//!
//! Two endpoints are consumed:
//! - `POST /api/chat` with `{"message": ...}`, answering `{"response": ...}`
//! - `POST /api/save-session` with `{"session": [...]}`
//!
//! Both sides are exposed as traits so the exchange controller can be driven
//! by in-process fakes.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::turn::Turn;

/// Path of the chat endpoint.
pub const CHAT_PATH: &str = "/api/chat";

/// Path of the session persistence endpoint.
pub const SAVE_SESSION_PATH: &str = "/api/save-session";

/// Produces a reply for a user message.
#[async_trait]
pub trait Responder: Send + Sync {
    /// Send `message` and return the reply text.
    async fn reply(&self, message: &str) -> Result<String, ClientError>;
}

/// Accepts full transcript snapshots.
#[async_trait]
pub trait SessionSink: Send + Sync {
    /// Store the whole session transcript.
    async fn save_session(&self, session: &[Turn]) -> Result<(), ClientError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct SaveSessionRequest<'a> {
    session: &'a [Turn],
}

/// `reqwest`-backed client for both endpoints.
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpClient {
    /// Create a client for the service at `base_url`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { base_url, client })
    }

    /// Create a client from the loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        Self::new(
            config.server_url.clone(),
            Duration::from_secs(config.request_timeout_seconds),
        )
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[async_trait]
impl Responder for HttpClient {
    async fn reply(&self, message: &str) -> Result<String, ClientError> {
        let response = self
            .client
            .post(self.endpoint(CHAT_PATH))
            .json(&ChatRequest { message })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let parsed: ChatResponse = serde_json::from_str(&body).map_err(ClientError::Decode)?;

        match (parsed.response, parsed.error) {
            (Some(reply), _) => Ok(reply),
            (None, Some(error)) => Err(ClientError::Responder(error)),
            (None, None) => Err(ClientError::MissingReply),
        }
    }
}

#[async_trait]
impl SessionSink for HttpClient {
    async fn save_session(&self, session: &[Turn]) -> Result<(), ClientError> {
        let response = self
            .client
            .post(self.endpoint(SAVE_SESSION_PATH))
            .json(&SaveSessionRequest { session })
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ClientError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }
}

/// Errors talking to the ELIZA service.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Network failure, timeout, or client construction error.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success HTTP status.
    #[error("Server returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body was not the expected JSON.
    #[error("Malformed response: {0}")]
    Decode(#[source] serde_json::Error),

    /// Response carried no reply text.
    #[error("Response contained no reply")]
    MissingReply,

    /// The service reported an error in its payload.
    #[error("Responder error: {0}")]
    Responder(String),

    /// The background task running the request died.
    #[error("Exchange task failed: {0}")]
    TaskFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = HttpClient::new("http://localhost:5000/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(
            client.endpoint(CHAT_PATH),
            "http://localhost:5000/api/chat"
        );
    }

    #[test]
    fn test_from_config() {
        let config = Config {
            server_url: "http://example.test:8080".into(),
            ..Config::default()
        };
        let client = HttpClient::from_config(&config).unwrap();
        assert_eq!(
            client.endpoint(SAVE_SESSION_PATH),
            "http://example.test:8080/api/save-session"
        );
    }

    #[test]
    fn test_chat_response_tolerates_extra_fields() {
        let parsed: ChatResponse =
            serde_json::from_str(r#"{"response": "Hi", "timestamp": "2024-01-01T00:00:00"}"#)
                .unwrap();
        assert_eq!(parsed.response.as_deref(), Some("Hi"));
        assert!(parsed.error.is_none());
    }

    #[test]
    fn test_save_session_payload() {
        use crate::turn::Speaker;
        use chrono::{TimeZone, Utc};

        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let session = vec![
            Turn::new(Speaker::Responder, "Hello! I'm Eliza, how can I support you today?", at),
            Turn::new(Speaker::User, "Hello", at),
            Turn::new(Speaker::Responder, "Hi there!", at),
        ];
        let payload = serde_json::to_string_pretty(&SaveSessionRequest { session: &session })
            .unwrap();

        insta::assert_snapshot!(payload, @r#"
        {
          "session": [
            {
              "speaker": "eliza",
              "text": "Hello! I'm Eliza, how can I support you today?",
              "timestamp": "2024-03-01T12:00:00Z"
            },
            {
              "speaker": "user",
              "text": "Hello",
              "timestamp": "2024-03-01T12:00:00Z"
            },
            {
              "speaker": "eliza",
              "text": "Hi there!",
              "timestamp": "2024-03-01T12:00:00Z"
            }
          ]
        }
        "#);
    }

    #[test]
    fn test_error_display() {
        let err = ClientError::Status {
            status: 500,
            body: "boom".into(),
        };
        assert_eq!(err.to_string(), "Server returned 500: boom");
        assert_eq!(
            ClientError::MissingReply.to_string(),
            "Response contained no reply"
        );
    }
}
