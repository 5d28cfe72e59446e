//! End-to-end turns against a mock completions endpoint

use mathchat_core::{
    AiClient, ChatError, ChatRole, ChatSession, Config, MessageContent, RenderedSpan, SpanKind,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sse_body(fragments: &[&str]) -> String {
    let mut body = String::new();
    for fragment in fragments {
        let payload = json!({"choices": [{"index": 0, "delta": {"content": fragment}}]});
        body.push_str(&format!("data: {}\n\n", payload));
    }
    body.push_str("data: [DONE]\n\n");
    body
}

fn config_for(server: &MockServer, stream: bool) -> Config {
    Config {
        api_url: format!("{}/v1/chat/completions", server.uri()),
        api_key: Some("test-key".to_string()),
        stream,
        ..Config::default()
    }
}

fn kinds(spans: &[RenderedSpan]) -> Vec<SpanKind> {
    spans.iter().map(|s| s.kind).collect()
}

#[tokio::test]
async fn streamed_reply_is_rendered_into_conversation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({"model": "grok-beta", "stream": true})))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(
                sse_body(&["Energy equals ", "$$E=mc", "^2$$."]),
                "text/event-stream",
            ),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = AiClient::new(config_for(&server, true)).unwrap();
    let mut session = ChatSession::new(client);
    let mut updates = 0;
    session
        .send("What is $E=mc^2$?", |_| updates += 1)
        .await
        .unwrap();

    assert_eq!(updates, 3);
    let conversation = session.conversation();
    assert!(!conversation.is_active());
    assert_eq!(conversation.len(), 2);
    assert_eq!(conversation.messages()[0].role, ChatRole::User);

    match &conversation.messages()[1].content {
        MessageContent::Rendered { source, spans } => {
            assert_eq!(source, "Energy equals $$E=mc^2$$.");
            assert_eq!(
                kinds(spans),
                vec![SpanKind::PlainText, SpanKind::BlockMath, SpanKind::PlainText]
            );
            assert_eq!(spans[1].raw, "E=mc^2");
        }
        other => panic!("expected rendered reply, got {:?}", other),
    }
}

#[tokio::test]
async fn history_includes_previous_reply_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(sse_body(&["first $x$"]), "text/event-stream"),
        )
        .mount(&server)
        .await;

    let mut session = ChatSession::new(AiClient::new(config_for(&server, true)).unwrap());
    session.send("one", |_| {}).await.unwrap();
    session.send("two", |_| {}).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    let body: serde_json::Value = serde_json::from_slice(&requests[1].body).unwrap();
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages[0]["role"], "system");
    assert_eq!(messages[1]["content"], "one");
    assert_eq!(messages[2]["role"], "assistant");
    assert_eq!(messages[2]["content"], "first $x$");
    assert_eq!(messages[3]["content"], "two");
}

#[tokio::test]
async fn non_streaming_reply_renders_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"stream": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "Solve $x^2=4$."}}]
        })))
        .mount(&server)
        .await;

    let mut session = ChatSession::new(AiClient::new(config_for(&server, false)).unwrap());
    let mut updates = Vec::new();
    session
        .send("quadratics", |spans| updates.push(spans.to_vec()))
        .await
        .unwrap();

    assert_eq!(updates.len(), 1);
    assert_eq!(
        kinds(&updates[0]),
        vec![SpanKind::PlainText, SpanKind::InlineMath, SpanKind::PlainText]
    );
    let reply = session.last_reply().unwrap();
    assert_eq!(reply.content.text(), "Solve $x^2=4$.");
}

#[tokio::test]
async fn error_status_ends_turn_and_keeps_placeholder() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let mut session = ChatSession::new(AiClient::new(config_for(&server, true)).unwrap());
    let err = session.send("hello", |_| {}).await.unwrap_err();

    match err {
        ChatError::Status { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, "invalid api key");
        }
        other => panic!("expected status error, got {:?}", other),
    }

    let conversation = session.conversation();
    assert!(!conversation.is_active());
    assert_eq!(conversation.len(), 2);
    assert!(conversation.messages()[1].content.is_empty());
}

#[tokio::test]
async fn missing_key_sends_empty_authorization() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(sse_body(&["ok"]), "text/event-stream"),
        )
        .mount(&server)
        .await;

    let config = Config {
        api_key: None,
        ..config_for(&server, true)
    };
    let mut session = ChatSession::new(AiClient::new(config).unwrap());
    session.send("hi", |_| {}).await.unwrap();
    assert_eq!(session.last_reply().unwrap().content.text(), "ok");

    let requests = server.received_requests().await.unwrap();
    let auth = requests[0].headers.get("authorization").unwrap();
    assert!(auth.is_empty());
}
