use std::sync::Arc;

use rand::Rng;
use serde_json::{json, Value};

use crate::{
    constants::templates::QUIZ_TITLE_EXAMPLE,
    errors::{AppError, AppResult},
    models::domain::{GeneratedQuestion, Message, QuestionKind, Shape, SystemPrompts},
    services::{agent::QuizAgent, answer_balancer::AnswerBalancer},
};

/// Builds quiz content on top of a [`QuizAgent`] session.
pub struct QuestionGenerator {
    prompts: Arc<SystemPrompts>,
    title_template: Shape,
}

impl QuestionGenerator {
    pub fn new(prompts: Arc<SystemPrompts>) -> Self {
        Self {
            prompts,
            title_template: Shape::from_example(&json!({ "title": QUIZ_TITLE_EXAMPLE })),
        }
    }

    /// Generates `num_mcq` multiple-choice items one at a time, then
    /// `num_open` open-ended items in a single call. Any failed item aborts
    /// the whole batch.
    pub async fn generate_questions<R: Rng>(
        &self,
        agent: &mut QuizAgent,
        balancer: &mut AnswerBalancer<R>,
        transcript: &[Message],
        num_mcq: usize,
        num_open: usize,
    ) -> AppResult<Vec<GeneratedQuestion>> {
        agent.reset_conversation();
        let query = transcript
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        agent.send_message(query);

        let mut questions = Vec::with_capacity(num_mcq + num_open);
        balancer.reset();

        for index in 0..num_mcq {
            let question = self.generate_mcq(agent, balancer, &questions).await?;
            log::info!(
                "Generated multiple-choice question {}/{} (answer {:?})",
                index + 1,
                num_mcq,
                question.correct_answer
            );
            questions.push(question);
        }

        if num_open > 0 {
            let open_questions = self.generate_open_ended(agent, num_open).await?;
            log::info!("Generated {} open-ended questions", open_questions.len());
            questions.extend(open_questions);
        }

        Ok(questions)
    }

    async fn generate_mcq<R: Rng>(
        &self,
        agent: &mut QuizAgent,
        balancer: &mut AnswerBalancer<R>,
        existing: &[GeneratedQuestion],
    ) -> AppResult<GeneratedQuestion> {
        let mut prompt = self.prompts.mcq.prompt.clone();

        let covered: Vec<String> = existing
            .iter()
            .filter(|q| q.kind == QuestionKind::Mcq)
            .filter_map(|q| q.question_text())
            .map(|text| format!("- {}", text))
            .collect();
        if !covered.is_empty() {
            prompt.push_str("\n\nAlready generated questions:\n");
            prompt.push_str(&covered.join("\n"));
        }

        let label = balancer.choose_label();
        prompt.push_str(&format!(
            "\n\nFor this next question, ensure the correct answer is option '{}'.",
            label
        ));

        let response = agent
            .receive_item(&self.prompts.mcq.template, &prompt, false)
            .await?;

        let value = match serde_json::from_str(&response.content)? {
            Value::Array(items) => items.into_iter().next().ok_or_else(|| {
                AppError::InternalError("Provider returned an empty question list".to_string())
            })?,
            value => value,
        };

        GeneratedQuestion::mcq(value, label)
    }

    async fn generate_open_ended(
        &self,
        agent: &mut QuizAgent,
        num_open: usize,
    ) -> AppResult<Vec<GeneratedQuestion>> {
        let prompt = format!(
            "{}\n\nGenerate exactly {} open-ended questions.",
            self.prompts.open_ended.prompt, num_open
        );

        let response = agent
            .receive_item(&self.prompts.open_ended.template, &prompt, false)
            .await?;

        let items = match serde_json::from_str(&response.content)? {
            Value::Array(items) => {
                if items.len() < num_open {
                    log::warn!(
                        "Requested {} open-ended questions, provider returned {}",
                        num_open,
                        items.len()
                    );
                }
                items.into_iter().take(num_open).collect()
            }
            value => vec![value],
        };

        items.into_iter().map(GeneratedQuestion::open_ended).collect()
    }

    pub async fn generate_title(
        &self,
        agent: &mut QuizAgent,
        questions: &[GeneratedQuestion],
    ) -> AppResult<String> {
        agent.reset_conversation();

        let query = questions
            .iter()
            .map(GeneratedQuestion::to_compact_json)
            .collect::<AppResult<Vec<_>>>()?
            .join("\n");
        agent.send_message(query);

        let response = agent
            .receive_item(&self.title_template, &self.prompts.quiz_title, false)
            .await?;

        let content: Value = serde_json::from_str(&response.content)?;
        let title = match &content {
            Value::Array(items) => items.first().and_then(|item| item.get("title")),
            value => value.get("title"),
        };

        title
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| AppError::InternalError("Title response had no title".to_string()))
    }
}
