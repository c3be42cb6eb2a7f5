use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    errors::{AppError, AppResult},
    models::domain::GeneratedQuestion,
};

/// Publishes a finished quiz to an external form service and returns a
/// shareable URL.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizPublisher: Send + Sync {
    async fn publish(&self, questions: &[GeneratedQuestion], title: &str) -> AppResult<String>;
}

#[derive(Debug, Serialize)]
struct PublishRequest<'a> {
    title: &'a str,
    questions: &'a [GeneratedQuestion],
}

#[derive(Debug, Deserialize)]
struct PublishResponse {
    url: String,
}

/// Posts the quiz as JSON to a form-building service.
pub struct HttpQuizPublisher {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpQuizPublisher {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl QuizPublisher for HttpQuizPublisher {
    async fn publish(&self, questions: &[GeneratedQuestion], title: &str) -> AppResult<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&PublishRequest { title, questions })
            .send()
            .await
            .map_err(|e| {
                log::error!("Failed to reach quiz publisher: {}", e);
                AppError::PublishError(format!("Failed to reach form service: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read response body".to_string());
            return Err(AppError::PublishError(format!(
                "Form service returned {}: {}",
                status, body
            )));
        }

        let published: PublishResponse = response.json().await.map_err(|e| {
            AppError::PublishError(format!("Invalid form service response: {}", e))
        })?;

        log::info!("Published quiz '{}' at {}", title, published.url);
        Ok(published.url)
    }
}
