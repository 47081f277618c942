mod endpoint;
mod openai;

use super::{ChatBackend, ChatResult};
use crate::config::Config;
use crate::content::MISSING_API_KEY_NOTICE;
use crate::types::ChatTurn;
use async_trait::async_trait;
use std::sync::Arc;

pub use endpoint::EndpointBackend;
pub use openai::OpenAiBackend;

/// Pick a backend from configuration.
///
/// Priority order:
/// 1. `LLM_ENDPOINT` → custom JSON endpoint
/// 2. `OPENAI_API_KEY` → OpenAI
/// 3. neither → a stub that answers with setup instructions
pub fn backend_from_config(config: &Config) -> Arc<dyn ChatBackend> {
    if let Some(endpoint) = &config.llm_endpoint {
        tracing::info!(%endpoint, "using custom LLM endpoint");
        return Arc::new(EndpointBackend::new(
            endpoint.clone(),
            Some(config.openai_model.clone()),
            config.llm_api_key.clone(),
        ));
    }

    if let Some(key) = &config.openai_api_key {
        tracing::info!(model = %config.openai_model, "using OpenAI");
        return Arc::new(OpenAiBackend::new(
            key,
            &config.openai_model,
            config.temperature,
            config.max_tokens,
        ));
    }

    tracing::warn!("OPENAI_API_KEY is not set; chat replies will be a setup notice");
    Arc::new(UnconfiguredBackend)
}

/// Stand-in used when no provider is configured. Every request succeeds with
/// the same notice so the demo keeps running.
pub struct UnconfiguredBackend;

#[async_trait]
impl ChatBackend for UnconfiguredBackend {
    async fn complete(&self, _turns: &[ChatTurn]) -> ChatResult<String> {
        Ok(MISSING_API_KEY_NOTICE.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;

    #[tokio::test]
    async fn unconfigured_backend_replies_with_notice() {
        let reply = UnconfiguredBackend
            .complete(&[ChatTurn::new(Role::User, "hi")])
            .await
            .unwrap();
        assert_eq!(reply, MISSING_API_KEY_NOTICE);
    }

    #[tokio::test]
    async fn empty_config_selects_unconfigured_backend() {
        let config = Config::from_lookup(|_| None).unwrap();
        let backend = backend_from_config(&config);
        let reply = backend
            .complete(&[ChatTurn::new(Role::User, "hi")])
            .await
            .unwrap();
        assert_eq!(reply, MISSING_API_KEY_NOTICE);
    }
}
