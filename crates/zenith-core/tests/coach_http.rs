//! Coach client against a mock `generateContent` endpoint.

use zenith_core::coach::{
    ChatModel, Conversation, GeminiClient, Message, EXPIRED_REPLY, GENERIC_FAILURE_REPLY,
};
use zenith_core::CoachError;

const PATH: &str = "/v1beta/models/test-model:generateContent";

fn client(base: &str) -> GeminiClient {
    GeminiClient::new(base, "test-model", "secret-key", "Be brief.").unwrap()
}

#[tokio::test]
async fn successful_reply_returns_candidate_text() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", PATH)
        .match_header("x-goog-api-key", "secret-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"One task."}]}}]}"#)
        .create_async()
        .await;

    let reply = client(&server.url())
        .reply(&[Message::user("help me focus")])
        .await
        .unwrap();
    assert_eq!(reply, "One task.");
    mock.assert_async().await;
}

#[tokio::test]
async fn not_found_maps_to_authorization_expired() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", PATH)
        .with_status(404)
        .with_body(r#"{"error":{"code":404,"message":"Requested entity was not found."}}"#)
        .create_async()
        .await;

    let err = client(&server.url())
        .reply(&[Message::user("hi")])
        .await
        .unwrap_err();
    assert!(err.is_authorization_expired());
}

#[tokio::test]
async fn server_error_is_generic() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", PATH)
        .with_status(500)
        .with_body("internal")
        .create_async()
        .await;

    let err = client(&server.url())
        .reply(&[Message::user("hi")])
        .await
        .unwrap_err();
    assert!(matches!(err, CoachError::Http { status: 500 }));
}

#[tokio::test]
async fn conversation_falls_back_and_unlinks() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", PATH)
        .with_status(500)
        .create_async()
        .await;

    let mut chat = Conversation::new(client(&server.url()));
    assert_eq!(
        chat.send("plan my morning").await.as_deref(),
        Some(GENERIC_FAILURE_REPLY)
    );
    assert!(chat.is_linked());

    let mut expired = mockito::Server::new_async().await;
    let _expired_mock = expired
        .mock("POST", PATH)
        .with_status(404)
        .create_async()
        .await;
    chat.relink(client(&expired.url()));
    assert_eq!(chat.send("again").await.as_deref(), Some(EXPIRED_REPLY));
    assert!(!chat.is_linked());
    assert_eq!(chat.history().len(), 5);
}
