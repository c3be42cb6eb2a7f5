pub mod conversation;
pub mod generated_question;
pub mod shape;
pub mod system_prompts;
pub use conversation::{Conversation, Message, Role};
pub use generated_question::{AnswerLabel, GeneratedQuestion, QuestionKind};
pub use shape::{ScalarKind, Shape};
pub use system_prompts::{QuestionSpec, SystemPrompts};
