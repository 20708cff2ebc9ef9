//! Interview question generation — trait seam plus the Gemini-backed default.
//!
//! `AppState` holds an `Arc<dyn QuestionGenerator>`, so tests and future
//! backends swap in without touching the handler or pipeline code.

use async_trait::async_trait;
use tracing::warn;

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::questions::prompts::{build_question_prompt, QUESTION_SYSTEM};

/// Max LLM retries when a response parses to zero questions.
const MAX_QUESTION_RETRIES: u32 = 2;

/// Generates interview questions from extracted resume text.
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    async fn generate(&self, resume_text: &str) -> Result<Vec<String>, AppError>;
}

/// Default generator backed by the Gemini client.
pub struct GeminiQuestionGenerator {
    llm: LlmClient,
}

impl GeminiQuestionGenerator {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl QuestionGenerator for GeminiQuestionGenerator {
    async fn generate(&self, resume_text: &str) -> Result<Vec<String>, AppError> {
        let prompt = build_question_prompt(resume_text);

        for attempt in 0..=MAX_QUESTION_RETRIES {
            let raw = self
                .llm
                .call_text(&prompt, QUESTION_SYSTEM)
                .await
                .map_err(|e| AppError::Llm(format!("Question generation failed: {e}")))?;

            let questions = parse_questions(&raw);
            if !questions.is_empty() {
                return Ok(questions);
            }

            warn!(
                "Question generation attempt {}/{} parsed zero questions, retrying",
                attempt + 1,
                MAX_QUESTION_RETRIES + 1
            );
        }

        Err(AppError::Llm(format!(
            "Question generation produced no questions after {} attempts",
            MAX_QUESTION_RETRIES + 1
        )))
    }
}

/// Splits LLM output into one question per line. Blank lines are dropped and
/// leading list markers are stripped, since the browser clients number the
/// questions themselves.
fn parse_questions(raw: &str) -> Vec<String> {
    raw.lines()
        .map(|line| strip_list_marker(line).trim_end())
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Strips a leading list marker: `1.`, `10)`, `-`, `*`, or `•`.
fn strip_list_marker(line: &str) -> &str {
    let line = line.trim();

    for prefix in ["- ", "* ", "• "] {
        if let Some(rest) = line.strip_prefix(prefix) {
            return rest.trim_start();
        }
    }

    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(rest) = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
            return rest.trim_start();
        }
    }

    line
}
