//! Mock ELIZA service for integration tests.

#![allow(dead_code)]

use eliza_engine::{Renderer, Turn};
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Wraps a wiremock server speaking the ELIZA web API.
pub struct ElizaMockServer {
    server: MockServer,
}

impl ElizaMockServer {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Reply to a specific message.
    pub async fn mock_chat_reply(&self, message: &str, reply: &str) {
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_json(json!({ "message": message })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "response": reply,
                "timestamp": "2024-03-01T12:00:00.000000"
            })))
            .mount(&self.server)
            .await;
    }

    /// Fail every chat request the way the service does on internal errors.
    pub async fn mock_chat_error(&self) {
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "error": "An error occurred processing your message",
                "timestamp": "2024-03-01T12:00:00.000000"
            })))
            .mount(&self.server)
            .await;
    }

    /// Answer chat requests with a raw body.
    pub async fn mock_chat_raw(&self, status: u16, body: &str) {
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// Answer chat requests after a delay.
    pub async fn mock_chat_slow(&self, delay: Duration) {
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "response": "too late" }))
                    .set_delay(delay),
            )
            .mount(&self.server)
            .await;
    }

    /// Accept session saves.
    pub async fn mock_save_session(&self, status: u16) {
        let body = if status == 200 {
            json!({ "status": "success" })
        } else {
            json!({ "error": "Failed to save session" })
        };
        Mock::given(method("POST"))
            .and(path("/api/save-session"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Bodies of all requests received on `request_path`.
    pub async fn bodies(&self, request_path: &str) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.url.path() == request_path)
            .map(|r| serde_json::from_slice(&r.body).unwrap())
            .collect()
    }
}

/// Renderer that records what it was asked to display.
#[derive(Debug, Default)]
pub struct TextRenderer {
    pub lines: Vec<String>,
    pub indicators: usize,
}

impl Renderer for TextRenderer {
    fn render_turn(&mut self, turn: &Turn) {
        self.lines
            .push(format!("{}: {}", turn.speaker.label(), turn.text));
    }

    fn show_composing_indicator(&mut self) {
        self.indicators += 1;
    }

    fn hide_composing_indicator(&mut self) {
        self.indicators = self.indicators.saturating_sub(1);
    }
}
