use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

/// Delivers a message to a recipient, returning a delivery id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(
        &self,
        recipient: &str,
        subject: &str,
        body: &str,
        sender_name: &str,
    ) -> AppResult<String>;
}

#[derive(Debug, Serialize)]
struct NotifyRequest<'a> {
    to: &'a str,
    subject: &'a str,
    body: &'a str,
    sender_name: &'a str,
}

#[derive(Debug, Deserialize)]
struct NotifyResponse {
    id: String,
}

/// Sends mail through an HTTP mail relay.
pub struct HttpNotifier {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpNotifier {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn notify(
        &self,
        recipient: &str,
        subject: &str,
        body: &str,
        sender_name: &str,
    ) -> AppResult<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&NotifyRequest {
                to: recipient,
                subject,
                body,
                sender_name,
            })
            .send()
            .await
            .map_err(|e| AppError::NotifyError(format!("Failed to reach mail relay: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::NotifyError(format!(
                "Mail relay returned {}",
                status
            )));
        }

        let delivered: NotifyResponse = response
            .json()
            .await
            .map_err(|e| AppError::NotifyError(format!("Invalid mail relay response: {}", e)))?;
        Ok(delivered.id)
    }
}

/// Used when no mail relay is configured; every delivery fails.
pub struct DisabledNotifier;

#[async_trait]
impl Notifier for DisabledNotifier {
    async fn notify(&self, _: &str, _: &str, _: &str, _: &str) -> AppResult<String> {
        Err(AppError::NotifyError(
            "No mail relay configured (set NOTIFIER_URL)".to_string(),
        ))
    }
}

pub struct EmailService {
    notifier: Arc<dyn Notifier>,
    sender_name: String,
}

impl EmailService {
    pub fn new(notifier: Arc<dyn Notifier>, sender_name: impl Into<String>) -> Self {
        Self {
            notifier,
            sender_name: sender_name.into(),
        }
    }

    pub async fn send_quiz_email(
        &self,
        recipient: &str,
        quiz_title: &str,
        form_url: &str,
    ) -> AppResult<String> {
        let subject = format!("{} - {}", self.sender_name, quiz_title);
        let body = build_email_body(form_url, &self.sender_name);

        self.notifier
            .notify(recipient, &subject, &body, &self.sender_name)
            .await
            .map_err(|e| {
                AppError::NotifyError(format!("Failed to send email to {}: {}", recipient, e))
            })
    }
}

pub fn build_email_body(form_url: &str, sender_name: &str) -> String {
    format!(
        "Hello!

Your {sender} quiz is ready:
{form_url}

Recall and testing has been empirically shown to improve learning outcomes significantly. Enjoy your increased mastery!

You can share this link with others, or open it to make further edits and tweaks.

Best,
{sender} Team",
        sender = sender_name,
        form_url = form_url
    )
}
