//! Embedded PDF text extraction via `pdf_extract`.

use bytes::Bytes;

use crate::errors::AppError;

/// Pulls the embedded text layer out of a PDF.
///
/// `pdf_extract` is CPU-bound and can panic on malformed files, so the parse
/// runs on a blocking thread. A panicked parse surfaces as a 422 for the
/// uploader instead of taking the worker down.
pub async fn extract_embedded_text(pdf_bytes: Bytes) -> Result<String, AppError> {
    let parsed =
        tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&pdf_bytes)).await;

    match parsed {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => {
            tracing::warn!("PDF text extraction failed: {e}");
            Err(AppError::UnprocessableEntity(
                "Could not parse the uploaded PDF".to_string(),
            ))
        }
        Err(join_err) => {
            tracing::warn!("PDF extraction task panicked: {join_err}");
            Err(AppError::UnprocessableEntity(
                "Could not parse the uploaded PDF".to_string(),
            ))
        }
    }
}
