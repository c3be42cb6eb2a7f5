use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::domain::{Message, Role};

pub const MAX_MCQ: usize = 50;
pub const MAX_OPEN: usize = 20;

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct TranscriptMessageDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conv_id: Option<i64>,

    pub role: Role,

    #[validate(length(min = 1, message = "Message content cannot be empty"))]
    pub content: String,
}

impl From<TranscriptMessageDto> for Message {
    fn from(dto: TranscriptMessageDto) -> Self {
        Message::new(dto.role, dto.content)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[validate(schema(function = "validate_question_total"))]
pub struct GenerateQuizRequest {
    #[validate(email(message = "Invalid email address"))]
    pub user_email: String,

    #[validate(range(max = 50, message = "MCQ count must be between 0 and 50"))]
    pub num_mcq: usize,

    #[validate(range(max = 20, message = "Open-ended question count must be between 0 and 20"))]
    pub num_open: usize,

    #[validate(length(min = 1, message = "At least one message is required"), nested)]
    pub messages: Vec<TranscriptMessageDto>,
}

impl GenerateQuizRequest {
    pub fn transcript(&self) -> Vec<Message> {
        self.messages.iter().cloned().map(Message::from).collect()
    }
}

fn validate_question_total(request: &GenerateQuizRequest) -> Result<(), ValidationError> {
    if request.num_mcq + request.num_open == 0 {
        let mut error = ValidationError::new("no_questions_requested");
        error.message =
            Some("At least one question (MCQ or open-ended) must be requested".into());
        return Err(error);
    }
    Ok(())
}
