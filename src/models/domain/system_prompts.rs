use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use serde_json::Value;

use crate::{
    constants::{
        prompts::{MCQ_PROMPT, OPEN_ENDED_PROMPT, QUIZ_TITLE_PROMPT},
        templates::{MCQ_TEMPLATE, OPEN_ENDED_TEMPLATE},
    },
    errors::{AppError, AppResult},
    models::domain::shape::Shape,
};

/// Instruction text plus the output shape for one kind of question.
#[derive(Clone, Debug, PartialEq)]
pub struct QuestionSpec {
    pub prompt: String,
    pub template: Shape,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SystemPrompts {
    pub mcq: QuestionSpec,
    pub open_ended: QuestionSpec,
    pub quiz_title: String,
}

#[derive(Debug, Deserialize)]
struct SpecPaths {
    prompt: PathBuf,
    template: PathBuf,
}

#[derive(Debug, Deserialize)]
struct SpecsIndex {
    mcq: SpecPaths,
    open_ended: SpecPaths,
    quiz_title: PathBuf,
}

enum SpecFile {
    Text(String),
    Json(Value),
}

impl SystemPrompts {
    pub fn builtin() -> AppResult<Self> {
        Ok(Self {
            mcq: QuestionSpec {
                prompt: MCQ_PROMPT.to_string(),
                template: Shape::from_example(&serde_json::from_str(MCQ_TEMPLATE)?),
            },
            open_ended: QuestionSpec {
                prompt: OPEN_ENDED_PROMPT.to_string(),
                template: Shape::from_example(&serde_json::from_str(OPEN_ENDED_TEMPLATE)?),
            },
            quiz_title: QUIZ_TITLE_PROMPT.to_string(),
        })
    }

    /// Loads prompts from a specs index file. Relative paths inside the index
    /// resolve against the index's directory. `.json` files are parsed, every
    /// other file is taken as plain text.
    pub fn load(specs_path: impl AsRef<Path>) -> AppResult<Self> {
        let specs_path = specs_path.as_ref();
        let base_dir = specs_path.parent().unwrap_or_else(|| Path::new("."));

        let index: SpecsIndex = serde_json::from_str(&read_file(specs_path)?).map_err(|e| {
            AppError::ConfigurationError(format!(
                "Invalid prompt specs index {}: {}",
                specs_path.display(),
                e
            ))
        })?;

        log::info!("Loading system prompts from {}", specs_path.display());

        Ok(Self {
            mcq: load_question_spec(base_dir, &index.mcq)?,
            open_ended: load_question_spec(base_dir, &index.open_ended)?,
            quiz_title: read_file(&base_dir.join(&index.quiz_title))?,
        })
    }
}

fn load_question_spec(base_dir: &Path, paths: &SpecPaths) -> AppResult<QuestionSpec> {
    let prompt = match load_spec_file(&base_dir.join(&paths.prompt))? {
        SpecFile::Text(text) => text,
        SpecFile::Json(value) => value.to_string(),
    };
    let template = match load_spec_file(&base_dir.join(&paths.template))? {
        SpecFile::Json(value @ Value::Object(_)) => Shape::from_example(&value),
        _ => {
            return Err(AppError::ConfigurationError(format!(
                "Template {} must be a JSON object",
                paths.template.display()
            )))
        }
    };
    Ok(QuestionSpec { prompt, template })
}

fn load_spec_file(path: &Path) -> AppResult<SpecFile> {
    let content = read_file(path)?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if !is_json {
        return Ok(SpecFile::Text(content));
    }
    serde_json::from_str(&content).map(SpecFile::Json).map_err(|e| {
        AppError::ConfigurationError(format!("Invalid JSON in {}: {}", path.display(), e))
    })
}

fn read_file(path: &Path) -> AppResult<String> {
    fs::read_to_string(path).map_err(|e| {
        AppError::ConfigurationError(format!("Failed to read {}: {}", path.display(), e))
    })
}
