use serde::Serialize;

use crate::services::quiz_service::QuizCreationResult;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub status: &'static str,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: "success",
            data,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuizResponse {
    pub form_url: String,
    pub quiz_title: String,
    pub questions_generated: usize,
    pub email_sent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_error: Option<String>,
}

impl From<QuizCreationResult> for GenerateQuizResponse {
    fn from(result: QuizCreationResult) -> Self {
        GenerateQuizResponse {
            form_url: result.form_url,
            quiz_title: result.quiz_title,
            questions_generated: result.questions_generated,
            email_sent: result.email_sent,
            email_error: result.email_error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(email_error: Option<String>) -> QuizCreationResult {
        QuizCreationResult {
            form_url: "https://forms.example/1".to_string(),
            quiz_title: "Right Triangles".to_string(),
            questions_generated: 4,
            email_sent: email_error.is_none(),
            email_error,
        }
    }

    #[test]
    fn test_response_uses_camel_case() {
        let body = serde_json::to_value(ApiResponse::success(GenerateQuizResponse::from(
            result(None),
        )))
        .unwrap();

        assert_eq!(body["status"], "success");
        assert_eq!(body["data"]["formUrl"], "https://forms.example/1");
        assert_eq!(body["data"]["quizTitle"], "Right Triangles");
        assert_eq!(body["data"]["questionsGenerated"], 4);
        assert_eq!(body["data"]["emailSent"], true);
        assert!(body["data"].get("emailError").is_none());
    }

    #[test]
    fn test_email_error_is_included_when_present() {
        let body = serde_json::to_value(GenerateQuizResponse::from(result(Some(
            "relay down".to_string(),
        ))))
        .unwrap();

        assert_eq!(body["emailSent"], false);
        assert_eq!(body["emailError"], "relay down");
    }
}
