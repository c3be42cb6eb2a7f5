use std::sync::Arc;

use actix_web::{http::StatusCode, test, web, App};
use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::RwLock;

use mindfullm_server::{
    app_state::AppState,
    config::Config,
    errors::{AppError, AppResult},
    handlers,
    middleware::{RequestIdMiddleware, REQUEST_ID_HEADER},
    models::{
        domain::{GeneratedQuestion, Message, QuestionKind, Role, SystemPrompts},
        dto::GenerateQuizRequest,
    },
    services::{
        agent::AgentSettings,
        completion_provider::{CompletionProvider, ProviderError},
        email_service::{EmailService, Notifier},
        question_generator::QuestionGenerator,
        quiz_publisher::QuizPublisher,
        quiz_service::QuizService,
    },
};

/// Answers like a well-behaved model, or with prose when `refuse` is set.
struct ScriptedProvider {
    refuse: bool,
    calls: Arc<RwLock<Vec<Vec<Message>>>>,
}

impl ScriptedProvider {
    fn new() -> Self {
        Self {
            refuse: false,
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    fn refusing() -> Self {
        Self {
            refuse: true,
            ..Self::new()
        }
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn complete(&self, messages: &[Message], _model: &str) -> Result<String, ProviderError> {
        self.calls.write().await.push(messages.to_vec());

        if self.refuse {
            return Ok("Sorry, I can only chat.".to_string());
        }

        let system = &messages[0].content;
        let reply = if system.contains("open-ended questions.") {
            json!([
                { "type": "open_ended", "question": "Why is c the longest side?", "answer": "It faces the right angle." }
            ])
        } else if system.contains("ensure the correct answer") {
            json!({
                "type": "mcq",
                "question": "A right triangle has legs 3 and 4. What is the hypotenuse?",
                "options": { "A": "5", "B": "6", "C": "7", "D": "12" },
                "correct_answer": "A",
                "explanation": "3² + 4² = 5²"
            })
        } else {
            json!({ "title": "Right Triangles" })
        };
        Ok(reply.to_string())
    }
}

struct InMemoryPublisher {
    fail: bool,
    published: Arc<RwLock<Vec<(String, Vec<GeneratedQuestion>)>>>,
}

impl InMemoryPublisher {
    fn new(fail: bool) -> Self {
        Self {
            fail,
            published: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

#[async_trait]
impl QuizPublisher for InMemoryPublisher {
    async fn publish(&self, questions: &[GeneratedQuestion], title: &str) -> AppResult<String> {
        if self.fail {
            return Err(AppError::PublishError("form service unavailable".to_string()));
        }
        let mut published = self.published.write().await;
        published.push((title.to_string(), questions.to_vec()));
        Ok(format!("https://forms.example/{}", published.len()))
    }
}

struct InMemoryNotifier {
    fail: bool,
    outbox: Arc<RwLock<Vec<(String, String, String)>>>,
}

impl InMemoryNotifier {
    fn new(fail: bool) -> Self {
        Self {
            fail,
            outbox: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

#[async_trait]
impl Notifier for InMemoryNotifier {
    async fn notify(
        &self,
        recipient: &str,
        subject: &str,
        body: &str,
        _sender_name: &str,
    ) -> AppResult<String> {
        if self.fail {
            return Err(AppError::NotifyError("mailbox full".to_string()));
        }
        let mut outbox = self.outbox.write().await;
        outbox.push((recipient.to_string(), subject.to_string(), body.to_string()));
        Ok(format!("msg-{}", outbox.len()))
    }
}

fn quiz_service(
    provider: Arc<ScriptedProvider>,
    publisher: Arc<InMemoryPublisher>,
    notifier: Arc<InMemoryNotifier>,
) -> QuizService {
    let prompts = Arc::new(SystemPrompts::builtin().expect("builtin prompts are valid"));
    QuizService::new(
        provider,
        AgentSettings::new("integration-model").with_generation_attempts(3),
        QuestionGenerator::new(prompts),
        publisher,
        EmailService::new(notifier, "MindfuLLM"),
    )
}

fn request_body(num_mcq: usize, num_open: usize) -> Value {
    json!({
        "user_email": "learner@example.com",
        "num_mcq": num_mcq,
        "num_open": num_open,
        "messages": [
            { "conv_id": 1, "role": "user", "content": "Can you explain the Pythagorean theorem?" },
            { "conv_id": 1, "role": "assistant", "content": "For a right triangle, a² + b² = c²." }
        ]
    })
}

fn request(num_mcq: usize, num_open: usize) -> GenerateQuizRequest {
    serde_json::from_value(request_body(num_mcq, num_open)).expect("request should deserialize")
}

#[actix_rt::test]
async fn test_full_quiz_flow_publishes_and_mails() {
    let provider = Arc::new(ScriptedProvider::new());
    let publisher = Arc::new(InMemoryPublisher::new(false));
    let notifier = Arc::new(InMemoryNotifier::new(false));
    let service = quiz_service(provider.clone(), publisher.clone(), notifier.clone());

    let result = service
        .create_and_send_quiz(request(2, 1))
        .await
        .expect("quiz should be created");

    assert_eq!(result.questions_generated, 3);
    assert_eq!(result.quiz_title, "Right Triangles");
    assert_eq!(result.form_url, "https://forms.example/1");
    assert!(result.email_sent);

    let published = publisher.published.read().await;
    let (title, questions) = &published[0];
    assert_eq!(title, "Right Triangles");
    assert_eq!(questions[0].kind, QuestionKind::Mcq);
    assert_eq!(questions[1].kind, QuestionKind::Mcq);
    assert_eq!(questions[2].kind, QuestionKind::OpenEnded);
    assert!(questions[..2].iter().all(|q| q.correct_answer.is_some()));

    let outbox = notifier.outbox.read().await;
    assert_eq!(outbox.len(), 1);
    assert_eq!(outbox[0].0, "learner@example.com");
    assert_eq!(outbox[0].1, "MindfuLLM - Right Triangles");
    assert!(outbox[0].2.contains("https://forms.example/1"));

    // two MCQ calls, one open-ended batch, one title call
    let calls = provider.calls.read().await;
    assert_eq!(calls.len(), 4);
    assert!(calls.iter().all(|c| c[0].role == Role::System));
}

#[actix_rt::test]
async fn test_sessions_do_not_share_state() {
    let provider = Arc::new(ScriptedProvider::new());
    let publisher = Arc::new(InMemoryPublisher::new(false));
    let notifier = Arc::new(InMemoryNotifier::new(false));
    let service = quiz_service(provider.clone(), publisher.clone(), notifier);

    service.create_and_send_quiz(request(1, 0)).await.expect("first quiz");
    let second = service.create_and_send_quiz(request(1, 0)).await.expect("second quiz");

    assert_eq!(second.form_url, "https://forms.example/2");
    // every call sees only its system prompt and the single query message
    let calls = provider.calls.read().await;
    assert!(calls.iter().all(|c| c.len() == 2));
}

#[actix_rt::test]
async fn test_email_failure_still_returns_quiz() {
    let service = quiz_service(
        Arc::new(ScriptedProvider::new()),
        Arc::new(InMemoryPublisher::new(false)),
        Arc::new(InMemoryNotifier::new(true)),
    );

    let result = service
        .create_and_send_quiz(request(1, 1))
        .await
        .expect("quiz should be created");

    assert!(!result.email_sent);
    assert!(result
        .email_error
        .as_deref()
        .is_some_and(|e| e.contains("mailbox full")));
}

#[actix_rt::test]
async fn test_publish_failure_aborts_before_email() {
    let notifier = Arc::new(InMemoryNotifier::new(false));
    let service = quiz_service(
        Arc::new(ScriptedProvider::new()),
        Arc::new(InMemoryPublisher::new(true)),
        notifier.clone(),
    );

    let result = service.create_and_send_quiz(request(1, 0)).await;

    assert!(matches!(result, Err(AppError::PublishError(_))));
    assert!(notifier.outbox.read().await.is_empty());
}

#[actix_web::test]
async fn test_http_receive_end_to_end() {
    let service = quiz_service(
        Arc::new(ScriptedProvider::new()),
        Arc::new(InMemoryPublisher::new(false)),
        Arc::new(InMemoryNotifier::new(false)),
    );
    let state = AppState::from_parts(Arc::new(service), Config::from_env());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .wrap(RequestIdMiddleware)
            .configure(handlers::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/receive")
        .set_json(request_body(2, 1))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key(REQUEST_ID_HEADER));

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["questionsGenerated"], 3);
    assert_eq!(body["data"]["quizTitle"], "Right Triangles");
    assert_eq!(body["data"]["emailSent"], true);
}

#[actix_web::test]
async fn test_http_generation_exhausted_is_server_error() {
    let provider = Arc::new(ScriptedProvider::refusing());
    let service = quiz_service(
        provider.clone(),
        Arc::new(InMemoryPublisher::new(false)),
        Arc::new(InMemoryNotifier::new(false)),
    );
    let state = AppState::from_parts(Arc::new(service), Config::from_env());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(handlers::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/receive")
        .set_json(request_body(1, 0))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "GENERATION_EXHAUSTED");
    assert_eq!(body["error"], "Response generation failed after 3 attempts.");
    assert_eq!(provider.calls.read().await.len(), 3);
}
