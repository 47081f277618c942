use crate::ai::market::EMPTY_REPLY;
use crate::ai::{ChatBackend, ChatError, ChatResult, Conversation};
use crate::types::{ChatTurn, Role};
use async_trait::async_trait;
use rig::client::CompletionClient;
use rig::completion::Chat;
use rig::providers;

/// OpenAI chat completions through a Rig agent.
pub struct OpenAiBackend {
    client: providers::openai::Client,
    model: String,
    temperature: f64,
    max_tokens: u64,
}

impl OpenAiBackend {
    pub fn new(api_key: &str, model: &str, temperature: f64, max_tokens: u64) -> Self {
        Self {
            client: providers::openai::Client::new(api_key),
            model: model.to_string(),
            temperature,
            max_tokens,
        }
    }

    /// Convert turns to Rig Message format
    fn convert_to_rig_messages(turns: &[ChatTurn]) -> Vec<rig::message::Message> {
        turns
            .iter()
            .map(|turn| match turn.role {
                Role::Assistant => rig::message::Message::assistant(&turn.content),
                Role::User | Role::System => rig::message::Message::user(&turn.content),
            })
            .collect()
    }
}

#[async_trait]
impl ChatBackend for OpenAiBackend {
    async fn complete(&self, turns: &[ChatTurn]) -> ChatResult<String> {
        let conversation = Conversation::from_turns(turns)?;
        let history = Self::convert_to_rig_messages(&conversation.history);

        let mut builder = self
            .client
            .agent(&self.model)
            .max_tokens(self.max_tokens)
            .temperature(self.temperature);
        if !conversation.preamble.is_empty() {
            builder = builder.preamble(&conversation.preamble);
        }
        let agent = builder.build();

        let reply = agent
            .chat(conversation.prompt.as_str(), history)
            .await
            .map_err(|err| {
                tracing::error!("OpenAI request failed: {err}");
                ChatError::Upstream(err.to_string())
            })?;

        if reply.trim().is_empty() {
            return Ok(EMPTY_REPLY.to_string());
        }
        Ok(reply)
    }
}
