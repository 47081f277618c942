//! Integration tests for the API proxy
//!
//! Each test binds the router on an ephemeral port with a scripted backend
//! and talks to it over real HTTP, through `ApiTransport` where possible.

use async_trait::async_trait;
use goldrush::ai::{
    ApiTransport, ChatBackend, ChatError, ChatResult, ChatTransport, MARKET_RESEARCH_INSTRUCTION,
};
use goldrush::content::{
    ERROR_CHAT_FAILED, ERROR_INVALID_MESSAGES, ERROR_QUERY_REQUIRED, ERROR_RESEARCH_FAILED,
};
use goldrush::server;
use goldrush::types::{ChatMessage, ChatTurn, Role};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use time::OffsetDateTime;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Answers every completion with the same result and records the turns.
struct Scripted {
    reply: ChatResult<String>,
    seen: Mutex<Vec<Vec<ChatTurn>>>,
}

impl Scripted {
    fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply.to_string()),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: Err(ChatError::Upstream("provider exploded".to_string())),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<Vec<ChatTurn>> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatBackend for Scripted {
    async fn complete(&self, turns: &[ChatTurn]) -> ChatResult<String> {
        self.seen.lock().unwrap().push(turns.to_vec());
        self.reply.clone()
    }
}

struct TestServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    handle: tokio::task::JoinHandle<std::io::Result<()>>,
}

impl TestServer {
    async fn start(backend: Arc<dyn ChatBackend>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(server::serve_on(listener, backend, async {
            let _ = rx.await;
        }));
        Self {
            addr,
            shutdown: Some(tx),
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    fn transport(&self) -> ApiTransport {
        ApiTransport::new(format!("http://{}/", self.addr))
    }

    async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.handle.await.unwrap().unwrap();
    }
}

fn user_message(content: &str) -> ChatMessage {
    ChatMessage {
        id: 1,
        role: Role::User,
        content: content.to_string(),
        timestamp: OffsetDateTime::now_utc(),
    }
}

#[tokio::test]
async fn chat_round_trip_returns_backend_reply() {
    let backend = Scripted::replying("素晴らしいアイデアです");
    let server = TestServer::start(backend.clone()).await;

    let reply = server
        .transport()
        .send(&[user_message("AIで農業を変えたい")], false)
        .await
        .unwrap();

    assert_eq!(reply, "素晴らしいアイデアです");
    let calls = backend.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0], vec![ChatTurn::new(Role::User, "AIで農業を変えたい")]);
    server.stop().await;
}

#[tokio::test]
async fn market_research_flag_prefixes_the_instruction() {
    let backend = Scripted::replying("ok");
    let server = TestServer::start(backend.clone()).await;

    server
        .transport()
        .send(&[user_message("宇宙旅行")], true)
        .await
        .unwrap();

    let turns = &backend.calls()[0];
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0], ChatTurn::system(MARKET_RESEARCH_INSTRUCTION));
    assert_eq!(turns[1].content, "宇宙旅行");
    server.stop().await;
}

#[tokio::test]
async fn empty_message_list_is_rejected() {
    let backend = Scripted::replying("unused");
    let server = TestServer::start(backend.clone()).await;

    let err = server.transport().send(&[], false).await.unwrap_err();

    assert_eq!(err, ChatError::Validation(ERROR_INVALID_MESSAGES.to_string()));
    assert!(backend.calls().is_empty());
    server.stop().await;
}

#[tokio::test]
async fn malformed_body_is_a_bad_request() {
    let server = TestServer::start(Scripted::replying("unused")).await;
    let client = reqwest::Client::new();

    let response = client
        .post(server.url("/api/chat"))
        .header("content-type", "application/json")
        .body(r#"{"messages": "not a list"}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], ERROR_INVALID_MESSAGES);
    server.stop().await;
}

#[tokio::test]
async fn backend_failure_is_hidden_behind_a_500() {
    let server = TestServer::start(Scripted::failing()).await;
    let client = reqwest::Client::new();

    let response = client
        .post(server.url("/api/chat"))
        .json(&serde_json::json!({
            "messages": [{ "role": "user", "content": "hello" }]
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], ERROR_CHAT_FAILED);
    assert!(!body.to_string().contains("provider exploded"));
    server.stop().await;
}

#[tokio::test]
async fn transport_maps_server_errors_to_upstream() {
    let server = TestServer::start(Scripted::failing()).await;

    let err = server
        .transport()
        .send(&[user_message("hello")], false)
        .await
        .unwrap_err();

    assert_eq!(err, ChatError::Upstream(ERROR_CHAT_FAILED.to_string()));
    assert_eq!(err.user_message(), ERROR_CHAT_FAILED);
    server.stop().await;
}

#[tokio::test]
async fn market_research_splits_reply_into_sections() {
    let backend = Scripted::replying("大きい\n\n多い\n\n広い\n\n高い");
    let server = TestServer::start(backend.clone()).await;

    let report = server
        .transport()
        .market_research("ドローン配送")
        .await
        .unwrap();

    assert_eq!(report.market_size, "大きい");
    assert_eq!(report.competitors, "多い");
    assert_eq!(report.opportunities, "広い");
    assert_eq!(report.challenges, "高い");
    let turns = &backend.calls()[0];
    assert_eq!(turns.len(), 1);
    assert!(turns[0].content.ends_with("クエリ: ドローン配送"));
    server.stop().await;
}

#[tokio::test]
async fn blank_or_missing_query_is_rejected() {
    let backend = Scripted::replying("unused");
    let server = TestServer::start(backend.clone()).await;
    let client = reqwest::Client::new();

    for body in [serde_json::json!({}), serde_json::json!({ "query": "   " })] {
        let response = client
            .post(server.url("/api/market-research"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["error"], ERROR_QUERY_REQUIRED);
    }
    assert!(backend.calls().is_empty());
    server.stop().await;
}

#[tokio::test]
async fn market_research_failure_uses_its_own_message() {
    let server = TestServer::start(Scripted::failing()).await;

    let err = server
        .transport()
        .market_research("anything")
        .await
        .unwrap_err();

    assert_eq!(err, ChatError::Upstream(ERROR_RESEARCH_FAILED.to_string()));
    server.stop().await;
}

#[tokio::test]
async fn health_reports_ok() {
    let server = TestServer::start(Scripted::replying("unused")).await;

    let response = reqwest::get(server.url("/health")).await.unwrap();

    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    server.stop().await;
}
