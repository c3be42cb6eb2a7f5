use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{AppError, AppResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub enum AnswerLabel {
    A,
    B,
    C,
    D,
}

impl AnswerLabel {
    pub const ALL: [AnswerLabel; 4] = [AnswerLabel::A, AnswerLabel::B, AnswerLabel::C, AnswerLabel::D];

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for AnswerLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AnswerLabel::A => "A",
            AnswerLabel::B => "B",
            AnswerLabel::C => "C",
            AnswerLabel::D => "D",
        };
        f.write_str(label)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Mcq,
    OpenEnded,
}

/// A provider response that passed shape validation, tagged with its kind.
///
/// `fields` holds everything the provider produced except `type` and
/// `correct_answer`, which are owned by this crate.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct GeneratedQuestion {
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<AnswerLabel>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl GeneratedQuestion {
    pub fn from_value(value: Value, kind: QuestionKind) -> AppResult<Self> {
        let Value::Object(mut fields) = value else {
            return Err(AppError::InternalError(
                "Generated question is not a JSON object".to_string(),
            ));
        };
        fields.remove("type");
        fields.remove("correct_answer");

        Ok(Self {
            kind,
            correct_answer: None,
            fields,
        })
    }

    pub fn mcq(value: Value, correct_answer: AnswerLabel) -> AppResult<Self> {
        let mut question = Self::from_value(value, QuestionKind::Mcq)?;
        question.correct_answer = Some(correct_answer);
        Ok(question)
    }

    pub fn open_ended(value: Value) -> AppResult<Self> {
        Self::from_value(value, QuestionKind::OpenEnded)
    }

    pub fn question_text(&self) -> Option<&str> {
        self.fields.get("question").and_then(Value::as_str)
    }

    /// Single-line JSON rendering used as title-generation input.
    pub fn to_compact_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mcq_overrides_provider_answer_and_type() {
        let question = GeneratedQuestion::mcq(
            json!({
                "type": "open_ended",
                "question": "What is 3² + 4²?",
                "options": { "A": "25", "B": "7", "C": "12", "D": "49" },
                "correct_answer": "A",
                "explanation": "9 + 16"
            }),
            AnswerLabel::C,
        )
        .expect("object should convert");

        assert_eq!(question.kind, QuestionKind::Mcq);
        assert_eq!(question.correct_answer, Some(AnswerLabel::C));
        assert_eq!(question.question_text(), Some("What is 3² + 4²?"));

        let rendered: Value =
            serde_json::from_str(&question.to_compact_json().expect("should render")).expect("valid json");
        assert_eq!(rendered["type"], "mcq");
        assert_eq!(rendered["correct_answer"], "C");
        assert_eq!(rendered["explanation"], "9 + 16");
    }

    #[test]
    fn test_open_ended_omits_correct_answer() {
        let question = GeneratedQuestion::open_ended(json!({
            "type": "open_ended",
            "question": "Why does the 3-4-5 rule work?",
            "answer": "Because 9 + 16 = 25."
        }))
        .expect("object should convert");

        let rendered = serde_json::to_value(&question).expect("should serialize");
        assert_eq!(rendered["type"], "open_ended");
        assert!(rendered.get("correct_answer").is_none());
    }

    #[test]
    fn test_from_value_rejects_non_objects() {
        assert!(GeneratedQuestion::open_ended(json!(["not", "an", "object"])).is_err());
    }

    #[test]
    fn test_answer_labels_are_ordered_and_indexed() {
        let indices: Vec<usize> = AnswerLabel::ALL.iter().map(|l| l.index()).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
        assert_eq!(AnswerLabel::D.to_string(), "D");
    }
}
