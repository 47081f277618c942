use crate::ai::market::EMPTY_REPLY;
use crate::ai::{ChatBackend, ChatError, ChatResult};
use crate::types::ChatTurn;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Any HTTP endpoint that accepts `{messages}` and answers with an
/// OpenAI-shaped body, a `{content}` body, or plain text.
pub struct EndpointBackend {
    client: Client,
    endpoint: String,
    model: Option<String>,
    api_key: Option<String>,
}

impl EndpointBackend {
    pub fn new(endpoint: String, model: Option<String>, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            model,
            api_key,
        }
    }
}

#[derive(Serialize)]
struct EndpointRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    messages: &'a [ChatTurn],
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ReplyChoice {
    message: Option<ReplyMessage>,
}

#[derive(Deserialize)]
struct OpenAiShape {
    choices: Vec<ReplyChoice>,
}

#[derive(Deserialize)]
struct ContentOnly {
    content: String,
}

/// Pull the reply text out of whichever body shape the endpoint returned.
fn extract_reply(body: &str) -> String {
    // Try OpenAI-shaped response first
    if let Ok(parsed) = serde_json::from_str::<OpenAiShape>(body) {
        return parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.is_empty())
            .unwrap_or_else(|| EMPTY_REPLY.to_string());
    }

    // Try content-only response
    if let Ok(parsed) = serde_json::from_str::<ContentOnly>(body) {
        return parsed.content;
    }

    // Fallback to raw body
    body.to_string()
}

#[async_trait]
impl ChatBackend for EndpointBackend {
    async fn complete(&self, turns: &[ChatTurn]) -> ChatResult<String> {
        let mut request = self.client.post(&self.endpoint).json(&EndpointRequest {
            model: self.model.as_deref(),
            messages: turns,
        });

        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(%status, "LLM endpoint returned an error");
            return Err(ChatError::Upstream(format!(
                "LLM endpoint error {status}: {body}"
            )));
        }

        Ok(extract_reply(&body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_openai_shaped_reply() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"hi"}}]}"#;
        assert_eq!(extract_reply(body), "hi");
    }

    #[test]
    fn empty_choices_fall_back_to_apology() {
        assert_eq!(extract_reply(r#"{"choices":[]}"#), EMPTY_REPLY);
    }

    #[test]
    fn reads_content_only_reply() {
        assert_eq!(extract_reply(r#"{"content":"hey"}"#), "hey");
    }

    #[test]
    fn raw_text_passes_through() {
        assert_eq!(extract_reply("plain answer"), "plain answer");
    }

    #[test]
    fn request_omits_missing_model() {
        let turns = [ChatTurn::system("x")];
        let json = serde_json::to_value(EndpointRequest {
            model: None,
            messages: &turns,
        })
        .unwrap();
        assert!(json.get("model").is_none());
        assert_eq!(json["messages"][0]["role"], "system");
    }
}
