use crate::models::domain::Message;

#[cfg(test)]
pub mod fixtures {
    use super::*;
    use serde_json::json;

    /// A short tutoring exchange about the Pythagorean theorem
    pub fn transcript() -> Vec<Message> {
        vec![
            Message::user("Can you explain the Pythagorean Theorem to me?"),
            Message::assistant(
                "In a right triangle the square of the hypotenuse equals the sum of the squares of the other two sides: a² + b² = c².",
            ),
            Message::user("Where is it used in real life?"),
            Message::assistant(
                "Carpenters use the 3-4-5 rule to check that corners are square.",
            ),
        ]
    }

    /// A multiple-choice item matching the built-in template
    pub fn mcq_json(question: &str) -> String {
        json!({
            "type": "mcq",
            "question": question,
            "options": { "A": "5", "B": "7", "C": "12", "D": "25" },
            "correct_answer": "A",
            "explanation": "3² + 4² = 25, so c = 5."
        })
        .to_string()
    }

    /// An open-ended item matching the built-in template
    pub fn open_ended_json(question: &str) -> String {
        json!({
            "type": "open_ended",
            "question": question,
            "answer": "Because the triangle has a right angle."
        })
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use crate::{models::domain::SystemPrompts, services::shape_validator};

    #[test]
    fn test_fixtures_transcript() {
        let messages = transcript();
        assert_eq!(messages.len(), 4);
        assert!(messages[0].content.contains("Pythagorean"));
    }

    #[test]
    fn test_fixtures_match_builtin_templates() {
        let prompts = SystemPrompts::builtin().expect("builtin prompts are valid");

        assert!(shape_validator::matches(&mcq_json("q"), &prompts.mcq.template));
        assert!(shape_validator::matches(
            &open_ended_json("q"),
            &prompts.open_ended.template
        ));
        assert!(!shape_validator::matches(
            &open_ended_json("q"),
            &prompts.mcq.template
        ));
    }
}
