//! Resume text extraction — embedded PDF text first, OCR as fallback.
//!
//! Flow: pdf::extract_embedded_text → if the result trims to empty →
//!       ocr::OcrEngine::recognize (rasterize pages, Tesseract per page).
//!
//! OCR runs ONLY when embedded extraction succeeds with empty output. A
//! scanned resume has no text layer, so `pdf_extract` returns zero
//! characters and the fallback picks it up. A PDF that fails to parse at
//! all is rejected without attempting OCR.

pub mod ocr;
pub mod pdf;

use bytes::Bytes;
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use ocr::OcrEngine;

/// Which extraction path produced the text. Reported in the API response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextSource {
    Embedded,
    Ocr,
}

/// Extracted resume text plus the path that produced it.
#[derive(Debug, Clone)]
pub struct ExtractedText {
    pub text: String,
    pub source: TextSource,
}

/// Extracts text from PDF bytes, falling back to OCR when the embedded
/// text layer is empty.
pub async fn extract_resume_text(
    pdf_bytes: Bytes,
    ocr: &OcrEngine,
) -> Result<ExtractedText, AppError> {
    let embedded = pdf::extract_embedded_text(pdf_bytes.clone()).await?;

    if !needs_ocr(&embedded) {
        return Ok(ExtractedText {
            text: embedded,
            source: TextSource::Embedded,
        });
    }

    info!("Embedded text layer is empty, falling back to OCR");

    let recognized = ocr.recognize(&pdf_bytes).await?;
    if recognized.trim().is_empty() {
        return Err(AppError::UnprocessableEntity(
            "No extractable text found in the uploaded PDF".to_string(),
        ));
    }

    Ok(ExtractedText {
        text: recognized,
        source: TextSource::Ocr,
    })
}

/// The fallback policy: OCR only when the embedded layer trims to nothing.
fn needs_ocr(embedded: &str) -> bool {
    embedded.trim().is_empty()
}
