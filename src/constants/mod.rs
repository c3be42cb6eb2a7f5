pub mod prompts;
pub mod templates;
