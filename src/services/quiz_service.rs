use std::sync::Arc;

use validator::Validate;

use crate::{
    errors::AppResult,
    models::dto::request::GenerateQuizRequest,
    services::{
        agent::{AgentSettings, QuizAgent},
        answer_balancer::AnswerBalancer,
        completion_provider::CompletionProvider,
        email_service::EmailService,
        question_generator::QuestionGenerator,
        quiz_publisher::QuizPublisher,
    },
};

#[derive(Debug, Clone, PartialEq)]
pub struct QuizCreationResult {
    pub form_url: String,
    pub quiz_title: String,
    pub questions_generated: usize,
    pub email_sent: bool,
    pub email_error: Option<String>,
}

pub struct QuizService {
    provider: Arc<dyn CompletionProvider>,
    agent_settings: AgentSettings,
    generator: QuestionGenerator,
    publisher: Arc<dyn QuizPublisher>,
    email_service: EmailService,
}

impl QuizService {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        agent_settings: AgentSettings,
        generator: QuestionGenerator,
        publisher: Arc<dyn QuizPublisher>,
        email_service: EmailService,
    ) -> Self {
        Self {
            provider,
            agent_settings,
            generator,
            publisher,
            email_service,
        }
    }

    /// Generates, publishes and mails a quiz for one request. Each call runs
    /// its own agent session and answer balancer.
    pub async fn create_and_send_quiz(
        &self,
        request: GenerateQuizRequest,
    ) -> AppResult<QuizCreationResult> {
        request.validate()?;

        log::info!(
            "Generating quiz for {} ({} MCQ, {} open-ended, {} transcript messages)",
            request.user_email,
            request.num_mcq,
            request.num_open,
            request.messages.len()
        );

        let mut agent = QuizAgent::new(Arc::clone(&self.provider), self.agent_settings.clone());
        let mut balancer = AnswerBalancer::from_entropy();

        let questions = self
            .generator
            .generate_questions(
                &mut agent,
                &mut balancer,
                &request.transcript(),
                request.num_mcq,
                request.num_open,
            )
            .await?;

        let quiz_title = self.generator.generate_title(&mut agent, &questions).await?;
        log::info!("Generated quiz title: {}", quiz_title);

        let form_url = self.publisher.publish(&questions, &quiz_title).await?;

        let (email_sent, email_error) = match self
            .email_service
            .send_quiz_email(&request.user_email, &quiz_title, &form_url)
            .await
        {
            Ok(id) => {
                log::info!("Quiz email sent to {} (id {})", request.user_email, id);
                (true, None)
            }
            Err(e) => {
                log::warn!("Quiz created but email failed: {}", e);
                (false, Some(e.to_string()))
            }
        };

        Ok(QuizCreationResult {
            form_url,
            quiz_title,
            questions_generated: questions.len(),
            email_sent,
            email_error,
        })
    }
}
