use super::client::{ChatBackend, ChatError, ChatResult, complete_chat, research_market};
use super::market::MarketReport;
use crate::content::{ERROR_CHAT_FAILED, ERROR_REQUEST_FAILED, ERROR_RESEARCH_FAILED};
use crate::types::{ChatMessage, ChatTurn};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ============================================
// Wire types shared with the proxy server
// ============================================

/// `POST /api/chat` body. Message ids and timestamps sent by the client are
/// ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub messages: Vec<ChatTurn>,
    #[serde(default)]
    pub market_research: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketResearchRequest {
    #[serde(default)]
    pub query: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OutgoingChat<'a> {
    messages: &'a [ChatMessage],
    market_research: bool,
}

#[derive(Serialize)]
struct OutgoingResearch<'a> {
    query: &'a str,
}

// ============================================
// Client-side transport
// ============================================

/// How the chat pane reaches an LLM.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, messages: &[ChatMessage], market_research: bool) -> ChatResult<String>;

    async fn market_research(&self, query: &str) -> ChatResult<MarketReport>;
}

/// Talks to the proxy server over HTTP.
#[derive(Clone)]
pub struct ApiTransport {
    client: Client,
    base_url: String,
}

impl ApiTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Decode a 2xx body, or surface the proxy's `error` field otherwise.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> ChatResult<T> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map(|err| err.error)
            .unwrap_or_else(|_| ERROR_REQUEST_FAILED.to_string());
        tracing::warn!(%status, "API request failed: {message}");
        return Err(if status.is_client_error() {
            ChatError::Validation(message)
        } else {
            ChatError::Upstream(message)
        });
    }

    Ok(serde_json::from_str(&body)?)
}

#[async_trait]
impl ChatTransport for ApiTransport {
    async fn send(&self, messages: &[ChatMessage], market_research: bool) -> ChatResult<String> {
        let response = self
            .client
            .post(self.url("/api/chat"))
            .json(&OutgoingChat {
                messages,
                market_research,
            })
            .send()
            .await?;
        let body: ChatResponse = read_json(response).await?;
        Ok(body.response)
    }

    async fn market_research(&self, query: &str) -> ChatResult<MarketReport> {
        let response = self
            .client
            .post(self.url("/api/market-research"))
            .json(&OutgoingResearch { query })
            .send()
            .await?;
        read_json(response).await
    }
}

/// Calls a backend in-process, with the same validation and error wording as
/// the proxy.
#[derive(Clone)]
pub struct DirectTransport {
    backend: Arc<dyn ChatBackend>,
}

impl DirectTransport {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl ChatTransport for DirectTransport {
    async fn send(&self, messages: &[ChatMessage], market_research: bool) -> ChatResult<String> {
        let turns = messages.iter().map(ChatTurn::from).collect();
        complete_chat(self.backend.as_ref(), turns, market_research)
            .await
            .map_err(|err| match err {
                ChatError::Validation(_) => err,
                other => {
                    tracing::error!("chat request failed: {other}");
                    ChatError::Upstream(ERROR_CHAT_FAILED.to_string())
                }
            })
    }

    async fn market_research(&self, query: &str) -> ChatResult<MarketReport> {
        research_market(self.backend.as_ref(), query)
            .await
            .map_err(|err| match err {
                ChatError::Validation(_) => err,
                other => {
                    tracing::error!("market research failed: {other}");
                    ChatError::Upstream(ERROR_RESEARCH_FAILED.to_string())
                }
            })
    }
}
