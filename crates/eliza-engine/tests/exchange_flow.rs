//! End-to-end exchanges through the HTTP client.

mod common;

use common::{ElizaMockServer, TextRenderer};
use eliza_engine::{
    ExchangeController, ExchangeState, HttpClient, PersistenceClient, Session, Settlement,
    Submission, DEFAULT_GREETING, FALLBACK_REPLY,
};
use std::sync::Arc;
use std::time::Duration;

fn controller(server: &ElizaMockServer) -> ExchangeController<TextRenderer> {
    let client = Arc::new(HttpClient::new(server.uri(), Duration::from_secs(5)).unwrap());
    ExchangeController::new(
        Session::start(DEFAULT_GREETING),
        TextRenderer::default(),
        client.clone(),
        PersistenceClient::new(client),
    )
}

#[tokio::test]
async fn test_hello_scenario() {
    let server = ElizaMockServer::new().await;
    server.mock_chat_reply("Hello", "Hi there!").await;
    server.mock_save_session(200).await;

    let mut controller = controller(&server);
    assert_eq!(controller.submit("Hello"), Submission::Started);

    let outcome = controller.settle().await.unwrap();
    assert_eq!(outcome.settlement, Settlement::Success);
    outcome.persist_task.unwrap().await.unwrap();

    assert_eq!(
        controller.renderer().lines,
        vec![
            format!("Eliza: {DEFAULT_GREETING}"),
            "You: Hello".to_string(),
            "Eliza: Hi there!".to_string(),
        ]
    );
    assert_eq!(controller.renderer().indicators, 0);

    let saves = server.bodies("/api/save-session").await;
    assert_eq!(saves.len(), 1);
    let entries = saves[0]["session"].as_array().unwrap();
    assert_eq!(entries.len(), 3);
    let pairs: Vec<(&str, &str)> = entries
        .iter()
        .map(|e| (e["speaker"].as_str().unwrap(), e["text"].as_str().unwrap()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("eliza", DEFAULT_GREETING),
            ("user", "Hello"),
            ("eliza", "Hi there!"),
        ]
    );
}

#[tokio::test]
async fn test_failure_scenario() {
    let server = ElizaMockServer::new().await;
    server.mock_chat_error().await;
    server.mock_save_session(200).await;

    let mut controller = controller(&server);
    controller.submit("test");
    let outcome = controller.settle().await.unwrap();

    assert_eq!(outcome.settlement, Settlement::Failure);
    assert_eq!(
        controller.state(),
        ExchangeState::Settled(Settlement::Failure)
    );
    assert_eq!(
        controller.renderer().lines.last().unwrap(),
        &format!("Eliza: {FALLBACK_REPLY}")
    );
    assert_eq!(controller.renderer().indicators, 0);

    outcome.persist_task.unwrap().await.unwrap();
    assert_eq!(server.bodies("/api/save-session").await.len(), 1);
}

#[tokio::test]
async fn test_whitespace_makes_no_request() {
    let server = ElizaMockServer::new().await;
    server.mock_chat_reply("Hello", "Hi there!").await;

    let mut controller = controller(&server);
    assert_eq!(controller.submit("   "), Submission::Ignored);
    assert!(controller.settle().await.is_none());

    assert_eq!(controller.renderer().lines.len(), 1);
    assert!(server.bodies("/api/chat").await.is_empty());
}

#[tokio::test]
async fn test_persistence_failure_does_not_affect_exchange() {
    let server = ElizaMockServer::new().await;
    server.mock_chat_reply("Hello", "Hi there!").await;
    server.mock_chat_reply("Again", "Tell me more.").await;
    server.mock_save_session(500).await;

    let mut controller = controller(&server);

    controller.submit("Hello");
    let first = controller.settle().await.unwrap();
    first.persist_task.unwrap().await.unwrap();

    assert_eq!(controller.submit("Again"), Submission::Started);
    let second = controller.settle().await.unwrap();
    assert_eq!(second.settlement, Settlement::Success);
    assert_eq!(second.turn.text, "Tell me more.");
    second.persist_task.unwrap().await.unwrap();

    // One attempt per exchange, no retries.
    assert_eq!(server.bodies("/api/save-session").await.len(), 2);
}

#[tokio::test]
async fn test_padded_reply_is_trimmed_once() {
    let server = ElizaMockServer::new().await;
    server.mock_chat_reply("Hello", "  Hi there!\n").await;
    server.mock_save_session(200).await;

    let mut controller = controller(&server);
    controller.submit("Hello");
    let outcome = controller.settle().await.unwrap();

    assert_eq!(outcome.settlement, Settlement::Success);
    assert_eq!(outcome.turn.text, "Hi there!");
    assert_eq!(controller.renderer().lines.last().unwrap(), "Eliza: Hi there!");
}
