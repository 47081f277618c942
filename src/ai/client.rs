use super::market::{MarketReport, research_prompt, with_market_research};
use crate::content::{ERROR_INVALID_MESSAGES, ERROR_QUERY_REQUIRED, ERROR_REQUEST_FAILED};
use crate::types::{ChatTurn, Role};
use async_trait::async_trait;

// ============================================
// Error Types
// ============================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChatError {
    #[error("network error: {0}")]
    Network(String),

    #[error("upstream error: {0}")]
    Upstream(String),

    #[error("invalid request: {0}")]
    Validation(String),

    #[error("unreadable response: {0}")]
    Decode(String),
}

impl ChatError {
    /// Text for the inline error bubble.
    ///
    /// Validation and upstream errors already carry a localized message from
    /// the proxy; transport failures fall back to a generic one.
    pub fn user_message(&self) -> &str {
        match self {
            ChatError::Validation(message) | ChatError::Upstream(message) => message,
            ChatError::Network(_) | ChatError::Decode(_) => ERROR_REQUEST_FAILED,
        }
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ChatError::Decode(err.to_string())
        } else {
            ChatError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        ChatError::Decode(err.to_string())
    }
}

pub type ChatResult<T> = Result<T, ChatError>;

// ============================================
// Backend trait
// ============================================

/// One completion round trip against an LLM provider. No retries, no streaming.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn complete(&self, turns: &[ChatTurn]) -> ChatResult<String>;
}

/// A turn list reshaped for agent-style APIs: system turns folded into a
/// preamble, the final non-system turn as the prompt, the rest as history.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversation {
    pub preamble: String,
    pub history: Vec<ChatTurn>,
    pub prompt: String,
}

impl Conversation {
    pub fn from_turns(turns: &[ChatTurn]) -> ChatResult<Self> {
        let system = turns
            .iter()
            .filter(|turn| turn.role == Role::System)
            .map(|turn| turn.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        let dialogue: Vec<&ChatTurn> = turns
            .iter()
            .filter(|turn| turn.role != Role::System)
            .collect();

        match dialogue.split_last() {
            Some((last, rest)) => Ok(Self {
                preamble: system,
                history: rest.iter().map(|turn| (*turn).clone()).collect(),
                prompt: last.content.clone(),
            }),
            // A lone instruction (market research) is sent as the prompt itself
            None if !system.is_empty() => Ok(Self {
                preamble: String::new(),
                history: Vec::new(),
                prompt: system,
            }),
            None => Err(ChatError::Validation(ERROR_INVALID_MESSAGES.to_string())),
        }
    }
}

// ============================================
// Shared request handling
// ============================================

/// Forward a chat to the backend, prefixing the market research instruction
/// when asked to.
pub async fn complete_chat(
    backend: &dyn ChatBackend,
    turns: Vec<ChatTurn>,
    market_research: bool,
) -> ChatResult<String> {
    if turns.is_empty() {
        return Err(ChatError::Validation(ERROR_INVALID_MESSAGES.to_string()));
    }
    let turns = if market_research {
        with_market_research(turns)
    } else {
        turns
    };
    tracing::debug!(turns = turns.len(), market_research, "forwarding chat");
    backend.complete(&turns).await
}

pub async fn research_market(backend: &dyn ChatBackend, query: &str) -> ChatResult<MarketReport> {
    let query = query.trim();
    if query.is_empty() {
        return Err(ChatError::Validation(ERROR_QUERY_REQUIRED.to_string()));
    }
    let reply = backend
        .complete(&[ChatTurn::system(research_prompt(query))])
        .await?;
    Ok(MarketReport::from_reply(&reply))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::market::MARKET_RESEARCH_INSTRUCTION;
    use std::sync::Mutex;

    /// Records what it was asked and answers with a fixed reply.
    struct Recorder {
        reply: String,
        seen: Mutex<Vec<ChatTurn>>,
    }

    impl Recorder {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatBackend for Recorder {
        async fn complete(&self, turns: &[ChatTurn]) -> ChatResult<String> {
            *self.seen.lock().unwrap() = turns.to_vec();
            Ok(self.reply.clone())
        }
    }

    #[test]
    fn conversation_splits_preamble_history_and_prompt() {
        let turns = vec![
            ChatTurn::system("be brief"),
            ChatTurn::new(Role::User, "hi"),
            ChatTurn::new(Role::Assistant, "hello"),
            ChatTurn::new(Role::User, "ideas?"),
        ];
        let conversation = Conversation::from_turns(&turns).unwrap();
        assert_eq!(conversation.preamble, "be brief");
        assert_eq!(conversation.history.len(), 2);
        assert_eq!(conversation.prompt, "ideas?");
    }

    #[test]
    fn lone_system_turn_becomes_the_prompt() {
        let conversation = Conversation::from_turns(&[ChatTurn::system("research")]).unwrap();
        assert!(conversation.preamble.is_empty());
        assert_eq!(conversation.prompt, "research");
    }

    #[test]
    fn empty_conversation_is_rejected() {
        assert!(matches!(
            Conversation::from_turns(&[]),
            Err(ChatError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn market_research_flag_prepends_instruction() {
        let backend = Recorder::new("ok");
        let reply = complete_chat(&backend, vec![ChatTurn::new(Role::User, "hello")], true)
            .await
            .unwrap();
        assert_eq!(reply, "ok");

        let seen = backend.seen.lock().unwrap().clone();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], ChatTurn::system(MARKET_RESEARCH_INSTRUCTION));
        assert_eq!(seen[1].content, "hello");
    }

    #[tokio::test]
    async fn plain_chat_is_forwarded_untouched() {
        let backend = Recorder::new("ok");
        complete_chat(&backend, vec![ChatTurn::new(Role::User, "hello")], false)
            .await
            .unwrap();
        assert_eq!(backend.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn blank_query_never_reaches_the_backend() {
        let backend = Recorder::new("unused");
        let err = research_market(&backend, "   ").await.unwrap_err();
        assert_eq!(err.user_message(), ERROR_QUERY_REQUIRED);
        assert!(backend.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn research_reply_is_split_into_sections() {
        let backend = Recorder::new("A\n\nB\n\nC\n\nD");
        let report = research_market(&backend, "EV").await.unwrap();
        assert_eq!(report.market_size, "A");
        assert_eq!(report.challenges, "D");

        let seen = backend.seen.lock().unwrap().clone();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].role, Role::System);
        assert!(seen[0].content.ends_with("クエリ: EV"));
    }

    #[test]
    fn transport_failures_show_generic_message() {
        assert_eq!(
            ChatError::Network("refused".into()).user_message(),
            ERROR_REQUEST_FAILED
        );
        assert_eq!(
            ChatError::Upstream("サーバー側".into()).user_message(),
            "サーバー側"
        );
    }
}
