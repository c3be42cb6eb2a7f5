use std::{env, time::Duration};

use secrecy::{ExposeSecret, SecretString};

use crate::{
    errors::{AppError, AppResult},
    services::agent::{AgentSettings, DEFAULT_GENERATION_ATTEMPTS},
};

const PLACEHOLDER_API_KEY: &str = "...";

#[derive(Clone, Debug)]
pub struct Config {
    pub web_server_host: String,
    pub web_server_port: u16,
    pub openai_api_key: SecretString,
    pub openai_base_url: Option<String>,
    /// Sent as `HTTP-Referer` for OpenRouter attribution; empty disables it.
    pub app_referer: String,
    /// Sent as `X-Title`; empty disables it.
    pub app_title: String,
    pub chat_model: String,
    pub generation_attempts: u32,
    pub retry_backoff_ms: u64,
    pub prompt_specs_path: Option<String>,
    pub quiz_publisher_url: String,
    pub notifier_url: Option<String>,
    pub email_sender_name: String,
    pub cors_origin: Option<String>,
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            openai_api_key: SecretString::from(
                non_empty_var("OPENAI_API_KEY")
                    .or_else(|| non_empty_var("OPENROUTER_API_KEY"))
                    .unwrap_or_default(),
            ),
            openai_base_url: non_empty_var("OPENAI_BASE_URL"),
            app_referer: env::var("APP_REFERER")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            app_title: env::var("APP_TITLE").unwrap_or_else(|_| "MindfuLLM".to_string()),
            chat_model: env::var("CHAT_MODEL")
                .unwrap_or_else(|_| "openai/gpt-4o-mini".to_string()),
            generation_attempts: env::var("GENERATION_ATTEMPTS")
                .ok()
                .and_then(|a| a.parse().ok())
                .unwrap_or(DEFAULT_GENERATION_ATTEMPTS),
            retry_backoff_ms: env::var("RETRY_BACKOFF_MS")
                .ok()
                .and_then(|ms| ms.parse().ok())
                .unwrap_or(0),
            prompt_specs_path: non_empty_var("PROMPT_SPECS_PATH"),
            quiz_publisher_url: env::var("QUIZ_PUBLISHER_URL")
                .unwrap_or_else(|_| "http://localhost:8090/forms".to_string()),
            notifier_url: non_empty_var("NOTIFIER_URL"),
            email_sender_name: env::var("EMAIL_SENDER_NAME")
                .unwrap_or_else(|_| "MindfuLLM".to_string()),
            cors_origin: non_empty_var("CORS_ORIGIN"),
        }
    }

    /// Checks the settings the server cannot start without.
    pub fn validate(&self) -> AppResult<()> {
        let api_key = self.openai_api_key.expose_secret();
        if api_key.is_empty() || api_key == PLACEHOLDER_API_KEY {
            return Err(AppError::ConfigurationError(
                "Missing API key. Set the OPENROUTER_API_KEY or OPENAI_API_KEY environment variable."
                    .to_string(),
            ));
        }

        if self.generation_attempts == 0 {
            return Err(AppError::ConfigurationError(
                "GENERATION_ATTEMPTS must be at least 1".to_string(),
            ));
        }

        if self.chat_model.trim().is_empty() {
            return Err(AppError::ConfigurationError(
                "CHAT_MODEL cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn agent_settings(&self) -> AgentSettings {
        AgentSettings::new(self.chat_model.clone())
            .with_generation_attempts(self.generation_attempts)
            .with_retry_backoff(Duration::from_millis(self.retry_backoff_ms))
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 5000,
            openai_api_key: SecretString::from("sk-test-key".to_string()),
            openai_base_url: None,
            app_referer: "http://localhost:8000".to_string(),
            app_title: "MindfuLLM".to_string(),
            chat_model: "test-model".to_string(),
            generation_attempts: 5,
            retry_backoff_ms: 0,
            prompt_specs_path: None,
            quiz_publisher_url: "http://127.0.0.1:9/forms".to_string(),
            notifier_url: None,
            email_sender_name: "MindfuLLM".to_string(),
            cors_origin: None,
        }
    }
}
