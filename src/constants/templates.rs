/// Example document describing a single multiple-choice item.
pub const MCQ_TEMPLATE: &str = r#"{
    "type": "mcq",
    "question": "...",
    "options": {
        "A": "...",
        "B": "...",
        "C": "...",
        "D": "..."
    },
    "correct_answer": "A",
    "explanation": "..."
}"#;

/// Example document describing a single open-ended item; the batch call may
/// return an array of these.
pub const OPEN_ENDED_TEMPLATE: &str = r#"{
    "type": "open_ended",
    "question": "...",
    "answer": "..."
}"#;

pub const QUIZ_TITLE_EXAMPLE: &str = "...";
