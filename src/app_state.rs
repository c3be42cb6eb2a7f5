use std::sync::Arc;

use crate::{
    config::Config,
    errors::AppResult,
    models::domain::SystemPrompts,
    services::{
        completion_provider::OpenAiCompletionProvider,
        email_service::{DisabledNotifier, EmailService, HttpNotifier, Notifier},
        question_generator::QuestionGenerator,
        quiz_publisher::HttpQuizPublisher,
        quiz_service::QuizService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub quiz_service: Arc<QuizService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> AppResult<Self> {
        let prompts = match &config.prompt_specs_path {
            Some(path) => SystemPrompts::load(path)?,
            None => SystemPrompts::builtin()?,
        };

        let http_client = reqwest::Client::new();
        let provider = Arc::new(OpenAiCompletionProvider::new(&config)?);
        let publisher = Arc::new(HttpQuizPublisher::new(
            http_client.clone(),
            config.quiz_publisher_url.clone(),
        ));

        let notifier: Arc<dyn Notifier> = match &config.notifier_url {
            Some(url) => Arc::new(HttpNotifier::new(http_client, url.clone())),
            None => {
                log::warn!("NOTIFIER_URL not set, quiz emails will not be delivered");
                Arc::new(DisabledNotifier)
            }
        };

        let quiz_service = Arc::new(QuizService::new(
            provider,
            config.agent_settings(),
            QuestionGenerator::new(Arc::new(prompts)),
            publisher,
            EmailService::new(notifier, config.email_sender_name.clone()),
        ));

        Ok(Self {
            quiz_service,
            config: Arc::new(config),
        })
    }

    pub fn from_parts(quiz_service: Arc<QuizService>, config: Config) -> Self {
        Self {
            quiz_service,
            config: Arc::new(config),
        }
    }
}
