use async_openai::{
    config::{Config as _, OpenAIConfig},
    Client,
};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::{
    config::Config,
    errors::{AppError, AppResult},
    models::domain::Message,
};

const REFERER_HEADER: &str = "http-referer";
const TITLE_HEADER: &str = "x-title";

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("completion request failed: {0}")]
    Request(String),

    #[error("completion response contained no message content")]
    EmptyResponse,
}

/// Text-completion capability the quiz agent drives.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, messages: &[Message], model: &str) -> Result<String, ProviderError>;
}

#[derive(Debug, Deserialize)]
struct ChatCompletionBody {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// OpenAI-compatible chat completions (OpenAI itself, OpenRouter, ...).
pub struct OpenAiCompletionProvider {
    client: Client<OpenAIConfig>,
}

impl OpenAiCompletionProvider {
    /// Builds the client. OpenRouter attribution headers are sent on every
    /// request when configured.
    pub fn new(config: &Config) -> AppResult<Self> {
        let mut openai_config =
            OpenAIConfig::new().with_api_key(config.openai_api_key.expose_secret());
        if let Some(base_url) = &config.openai_base_url {
            openai_config = openai_config.with_api_base(base_url);
        }

        let attribution = [
            (REFERER_HEADER, config.app_referer.as_str()),
            (TITLE_HEADER, config.app_title.as_str()),
        ];
        for (name, value) in attribution {
            if value.is_empty() {
                continue;
            }
            openai_config = openai_config.with_header(name, value).map_err(|e| {
                AppError::ConfigurationError(format!("Invalid {} header: {}", name, e))
            })?;
        }

        Ok(Self {
            client: Client::with_config(openai_config),
        })
    }

    pub fn config(&self) -> &OpenAIConfig {
        self.client.config()
    }
}

#[async_trait]
impl CompletionProvider for OpenAiCompletionProvider {
    async fn complete(&self, messages: &[Message], model: &str) -> Result<String, ProviderError> {
        let request = json!({
            "model": model,
            "messages": messages,
        });

        let response: ChatCompletionBody = self
            .client
            .chat()
            .create_byot(request)
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(ProviderError::EmptyResponse)
    }
}
