//! xAI narrative client against a mock chat-completions server.

use mockito::Matcher;
use serde_json::json;
use std::time::Duration;
use tokio_test::assert_err;

use crate::models::GothicStyle;
use crate::services::narrative::{NarrativeGenerator, XaiClient};

fn client(base_url: &str, api_key: Option<&str>) -> XaiClient {
    XaiClient::new(
        api_key.map(str::to_string),
        base_url,
        "grok-beta",
        Duration::from_secs(5),
    )
    .unwrap()
}

fn completion(content: &str) -> String {
    json!({
        "id": "chatcmpl-1",
        "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }]
    })
    .to_string()
}

#[tokio::test]
async fn test_generate_returns_cleaned_narrative() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer xai-test")
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJson(json!({ "model": "grok-beta" })),
            Matcher::Regex("unknowable entities".to_string()),
            Matcher::Regex("A walk in the woods".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion("  The trees leaned closer.\n\n  Above, the stars were wrong.  "))
        .create_async()
        .await;

    let result = client(&server.url(), Some("xai-test"))
        .generate("A walk in the woods", GothicStyle::Cosmic)
        .await
        .unwrap();

    assert_eq!(result.generated_text, "The trees leaned closer.\nAbove, the stars were wrong.");
    assert_eq!(result.style_used, GothicStyle::Cosmic);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_blank_input_makes_no_request() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .expect(0)
        .create_async()
        .await;

    let xai = client(&server.url(), Some("xai-test"));
    for blank in ["", "   ", "\n\t \n"] {
        let err = assert_err!(xai.generate(blank, GothicStyle::Classic).await);
        assert_eq!(err.kind(), "empty_input");
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn test_missing_key_is_auth_error_without_request() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .expect(0)
        .create_async()
        .await;

    let err = assert_err!(
        client(&server.url(), None)
            .generate("A walk in the woods", GothicStyle::Folk)
            .await
    );
    assert_eq!(err.kind(), "auth");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_http_errors_map_to_taxonomy() {
    let cases = [
        (401, r#"{"code":"Client specified an invalid argument","error":"Incorrect API key provided"}"#, "auth"),
        (429, r#"{"error":{"message":"Too many requests"}}"#, "rate_limit"),
        (500, "upstream exploded", "api"),
    ];

    for (status, body, kind) in cases {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(status)
            .with_body(body)
            .create_async()
            .await;

        let err = assert_err!(
            client(&server.url(), Some("xai-test"))
                .generate("A walk in the woods", GothicStyle::Southern)
                .await
        );
        assert_eq!(err.kind(), kind, "HTTP {}", status);
    }
}

#[tokio::test]
async fn test_empty_completion_is_rejected() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion(" \n\n "))
        .create_async()
        .await;

    let err = assert_err!(
        client(&server.url(), Some("xai-test"))
            .generate("A walk in the woods", GothicStyle::Psychological)
            .await
    );
    assert_eq!(err.kind(), "empty_narrative");
}

#[tokio::test]
async fn test_unreachable_endpoint_is_network_error() {
    // nothing listens on the discard port
    let err = assert_err!(
        client("http://127.0.0.1:9", Some("xai-test"))
            .generate("A walk in the woods", GothicStyle::Classic)
            .await
    );
    assert_eq!(err.kind(), "network");
}
