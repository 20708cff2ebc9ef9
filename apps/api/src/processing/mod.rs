//! Resume processing — orchestrates the upload pipeline.
//!
//! Flow: read upload → extract text (embedded, OCR fallback) →
//!       store original in S3 → generate interview questions.
//!
//! The original file is persisted before the LLM call so a failed
//! generation never loses the upload.

pub mod handlers;

use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::{extract_resume_text, ExtractedText};
use crate::state::AppState;
use crate::storage::{store_resume, StoredResume};

/// Everything the pipeline produced for one upload.
#[derive(Debug)]
pub struct ProcessedResume {
    pub questions: Vec<String>,
    pub stored: StoredResume,
    pub extracted: ExtractedText,
}

/// Runs the full pipeline for one uploaded resume.
pub async fn process_resume(
    state: &AppState,
    user_id: Uuid,
    pdf_bytes: Bytes,
) -> Result<ProcessedResume, AppError> {
    let extracted = extract_resume_text(pdf_bytes.clone(), &state.ocr).await?;
    info!(
        "Extracted {} chars from resume (source: {:?})",
        extracted.text.len(),
        extracted.source
    );

    let stored = store_resume(
        &state.s3,
        &state.config.s3_bucket,
        &state.config.s3_public_url,
        user_id,
        pdf_bytes,
    )
    .await?;

    let questions = state.questions.generate(&extracted.text).await?;
    info!(
        "Generated {} interview questions for resume {}",
        questions.len(),
        stored.resume_id
    );

    Ok(ProcessedResume {
        questions,
        stored,
        extracted,
    })
}
