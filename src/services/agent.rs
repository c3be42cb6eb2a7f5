use std::{sync::Arc, time::Duration};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    constants::prompts::DEFAULT_SYSTEM_PROMPT,
    errors::{AppError, AppResult},
    models::domain::{Conversation, Message, Role, Shape},
    services::{
        completion_provider::{CompletionProvider, ProviderError},
        shape_validator,
    },
};

pub const DEFAULT_GENERATION_ATTEMPTS: u32 = 5;

static LEADING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^```(?:json)?\s*").expect("LEADING_FENCE is a valid regex"));
static TRAILING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*```$").expect("TRAILING_FENCE is a valid regex"));

/// Per-agent configuration. Each agent carries its own copy, nothing is
/// shared between sessions.
#[derive(Clone, Debug)]
pub struct AgentSettings {
    pub chat_model: String,
    pub generation_attempts: u32,
    pub default_system_prompt: String,
    /// Base delay before retrying after a transport failure, doubled on every
    /// further failure. Zero retries immediately.
    pub retry_backoff: Duration,
}

impl AgentSettings {
    pub fn new(chat_model: impl Into<String>) -> Self {
        Self {
            chat_model: chat_model.into(),
            generation_attempts: DEFAULT_GENERATION_ATTEMPTS,
            default_system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            retry_backoff: Duration::ZERO,
        }
    }

    pub fn with_generation_attempts(mut self, attempts: u32) -> Self {
        self.generation_attempts = attempts;
        self
    }

    pub fn with_default_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.default_system_prompt = prompt.into();
        self
    }

    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }
}

#[derive(Debug)]
enum AttemptOutcome {
    Valid(String),
    Invalid(String),
    TransportError(ProviderError),
}

/// One generation session: a conversation plus the retry loop that turns
/// provider output into shape-valid assistant messages.
pub struct QuizAgent {
    provider: Arc<dyn CompletionProvider>,
    settings: AgentSettings,
    conversation: Conversation,
}

impl QuizAgent {
    pub fn new(provider: Arc<dyn CompletionProvider>, settings: AgentSettings) -> Self {
        let mut conversation = Conversation::new();
        conversation.set_system(settings.default_system_prompt.clone());
        Self {
            provider,
            settings,
            conversation,
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Drops the history. The next `receive_response` installs its own
    /// system prompt.
    pub fn reset_conversation(&mut self) {
        self.conversation = Conversation::new();
    }

    pub fn send_message(&mut self, content: impl Into<String>) -> Message {
        self.conversation.append(Role::User, content).clone()
    }

    pub async fn receive_response(
        &mut self,
        template: &Shape,
        system_prompt: &str,
        auto_append: bool,
    ) -> AppResult<Message> {
        self.receive_with(template, system_prompt, auto_append, false)
            .await
    }

    /// Like [`QuizAgent::receive_response`], but an empty array reply counts
    /// as a failed attempt instead of a vacuous match.
    pub async fn receive_item(
        &mut self,
        template: &Shape,
        system_prompt: &str,
        auto_append: bool,
    ) -> AppResult<Message> {
        self.receive_with(template, system_prompt, auto_append, true)
            .await
    }

    async fn receive_with(
        &mut self,
        template: &Shape,
        system_prompt: &str,
        auto_append: bool,
        require_item: bool,
    ) -> AppResult<Message> {
        self.conversation.set_system(system_prompt);
        let attempts = self.settings.generation_attempts;
        let mut transport_failures = 0;

        for attempt in 1..=attempts {
            match self.attempt(template, require_item).await {
                AttemptOutcome::Valid(content) => {
                    log::debug!("Valid response on attempt {}/{}", attempt, attempts);
                    let message = Message::assistant(content);
                    if auto_append {
                        self.conversation
                            .append(message.role, message.content.clone());
                    }
                    return Ok(message);
                }
                AttemptOutcome::Invalid(content) => {
                    log::warn!(
                        "Response did not match the expected shape (attempt {}/{}): {}",
                        attempt,
                        attempts,
                        content
                    );
                }
                AttemptOutcome::TransportError(err) => {
                    log::error!(
                        "Completion call failed (attempt {}/{}): {}",
                        attempt,
                        attempts,
                        err
                    );
                    if attempt == attempts {
                        return Err(AppError::ProviderError(err.to_string()));
                    }
                    self.backoff(transport_failures).await;
                    transport_failures += 1;
                }
            }
        }

        Err(AppError::GenerationExhausted { attempts })
    }

    async fn attempt(&self, template: &Shape, require_item: bool) -> AttemptOutcome {
        let raw = match self
            .provider
            .complete(self.conversation.messages(), &self.settings.chat_model)
            .await
        {
            Ok(raw) => raw,
            Err(err) => return AttemptOutcome::TransportError(err),
        };

        let content = strip_code_fences(&raw);
        if require_item && is_empty_array(&content) {
            return AttemptOutcome::Invalid(content);
        }
        if shape_validator::matches(&content, template) {
            AttemptOutcome::Valid(content)
        } else {
            AttemptOutcome::Invalid(content)
        }
    }

    async fn backoff(&self, previous_failures: u32) {
        if self.settings.retry_backoff.is_zero() {
            return;
        }
        let delay = self
            .settings
            .retry_backoff
            .saturating_mul(2u32.saturating_pow(previous_failures));
        tokio::time::sleep(delay).await;
    }
}

fn is_empty_array(content: &str) -> bool {
    matches!(
        serde_json::from_str::<serde_json::Value>(content),
        Ok(serde_json::Value::Array(items)) if items.is_empty()
    )
}

/// Removes the markdown code fence models like to wrap JSON in.
pub fn strip_code_fences(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_leading = LEADING_FENCE.replace(trimmed, "");
    TRAILING_FENCE
        .replace(&without_leading, "")
        .trim()
        .to_string()
}
