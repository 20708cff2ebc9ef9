//! Axum route handlers for resume processing.

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::extraction::TextSource;
use crate::processing::process_resume;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Response body for POST /process-resume.
/// Field names are camelCase because the browser clients read them directly.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessResumeResponse {
    pub questions: Vec<String>,
    pub file_url: String,
    pub resume_id: Uuid,
    pub source: TextSource,
    pub uploaded_at: DateTime<Utc>,
}

struct ResumeUpload {
    filename: String,
    bytes: Bytes,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /process-resume
///
/// Accepts a multipart upload with a `resume` PDF field, extracts its text
/// (OCR when the text layer is empty), stores the original, and returns
/// interview questions plus the stored file URL.
pub async fn handle_process_resume(
    State(state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> Result<Json<ProcessResumeResponse>, AppError> {
    let upload = read_resume_field(&mut multipart).await?;

    info!(
        "Processing resume '{}' ({} bytes) for user {}",
        upload.filename,
        upload.bytes.len(),
        user.id
    );

    let processed = process_resume(&state, user.id, upload.bytes).await?;

    Ok(Json(ProcessResumeResponse {
        questions: processed.questions,
        file_url: processed.stored.public_url,
        resume_id: processed.stored.resume_id,
        source: processed.extracted.source,
        uploaded_at: processed.stored.uploaded_at,
    }))
}

/// Pulls the `resume` field out of the multipart body and validates it.
async fn read_resume_field(multipart: &mut Multipart) -> Result<ResumeUpload, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(map_multipart_error)? {
        if field.name() != Some("resume") {
            continue;
        }

        let filename = field.file_name().unwrap_or("resume.pdf").to_string();
        if !filename.to_lowercase().ends_with(".pdf") {
            return Err(AppError::Validation(
                "Only PDF files are allowed".to_string(),
            ));
        }

        let bytes = field.bytes().await.map_err(map_multipart_error)?;
        if bytes.is_empty() {
            return Err(AppError::Validation("Uploaded file is empty".to_string()));
        }
        if !bytes.starts_with(b"%PDF-") {
            return Err(AppError::Validation(
                "File is not a valid PDF".to_string(),
            ));
        }

        return Ok(ResumeUpload { filename, bytes });
    }

    Err(AppError::Validation("No file uploaded".to_string()))
}

fn map_multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge;
    }
    AppError::Validation(format!("Invalid multipart upload: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_serializes_camel_case() {
        let response = ProcessResumeResponse {
            questions: vec!["What did you build?".to_string()],
            file_url: "http://localhost:9000/resumes/resumes/u/r.pdf".to_string(),
            resume_id: Uuid::new_v4(),
            source: TextSource::Embedded,
            uploaded_at: Utc::now(),
        };

        let value = serde_json::to_value(&response).unwrap();
        assert!(value.get("fileUrl").is_some());
        assert!(value.get("resumeId").is_some());
        assert!(value.get("uploadedAt").is_some());
        assert_eq!(value["source"], "embedded");
        assert_eq!(value["questions"][0], "What did you build?");
    }
}
