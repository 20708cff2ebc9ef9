//! OCR fallback for scanned resumes.
//!
//! Rasterizes the PDF with `pdftoppm` (poppler-utils) and feeds each page PNG
//! to the `tesseract` CLI. Both binaries must be on PATH; `is_available`
//! probes for them at startup so a missing install surfaces as a log line
//! instead of a mid-request failure.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use crate::errors::AppError;

/// Runs `pdftoppm` + `tesseract` against a per-request scratch directory.
#[derive(Debug, Clone)]
pub struct OcrEngine {
    dpi: u32,
    language: String,
    timeout: Duration,
}

impl OcrEngine {
    pub fn new(dpi: u32, language: String, timeout_secs: u64) -> Self {
        Self {
            dpi,
            language,
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// Returns true when both `pdftoppm` and `tesseract` respond to a version probe.
    pub async fn is_available() -> bool {
        let pdftoppm = Command::new("pdftoppm")
            .arg("-v")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;
        let tesseract = Command::new("tesseract")
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        matches!(pdftoppm, Ok(s) if s.success()) && matches!(tesseract, Ok(s) if s.success())
    }

    /// Recognizes text in a scanned PDF. Pages are rasterized to PNG and
    /// OCR'd in order; page texts are joined with blank lines. The whole
    /// run is bounded by the configured timeout.
    pub async fn recognize(&self, pdf_bytes: &[u8]) -> Result<String, AppError> {
        tokio::time::timeout(self.timeout, self.recognize_inner(pdf_bytes))
            .await
            .map_err(|_| {
                AppError::UnprocessableEntity(format!(
                    "OCR timed out after {}s",
                    self.timeout.as_secs()
                ))
            })?
    }

    async fn recognize_inner(&self, pdf_bytes: &[u8]) -> Result<String, AppError> {
        let scratch = tempfile::Builder::new()
            .prefix("resumeradar-ocr-")
            .tempdir()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to create OCR scratch dir: {e}")))?;

        let pdf_path = scratch.path().join("resume.pdf");
        tokio::fs::write(&pdf_path, pdf_bytes)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to write OCR input: {e}")))?;

        rasterize(&pdf_path, scratch.path(), self.dpi).await?;

        let mut pages = page_images(scratch.path()).await?;
        // pdftoppm zero-pads page numbers, so a lexicographic sort keeps page order
        pages.sort();

        if pages.is_empty() {
            return Err(AppError::UnprocessableEntity(
                "PDF produced no pages to OCR".to_string(),
            ));
        }

        let mut texts = Vec::with_capacity(pages.len());
        for (index, page) in pages.iter().enumerate() {
            let text = run_tesseract(page, &self.language).await?;
            tracing::debug!("OCR page {} produced {} chars", index + 1, text.len());
            texts.push(text);
        }

        Ok(texts.join("\n\n"))
    }
}

/// Renders every page of the PDF as `page-N.png` into `out_dir`.
async fn rasterize(pdf: &Path, out_dir: &Path, dpi: u32) -> Result<(), AppError> {
    let output = Command::new("pdftoppm")
        .arg("-png")
        .arg("-r")
        .arg(dpi.to_string())
        .arg(pdf)
        .arg(out_dir.join("page"))
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| spawn_error("pdftoppm", e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        tracing::warn!("pdftoppm failed: {stderr}");
        return Err(AppError::UnprocessableEntity(
            "Could not rasterize the uploaded PDF".to_string(),
        ));
    }

    Ok(())
}

/// A binary missing from PATH is a deployment problem, not a bad upload.
fn spawn_error(binary: &str, e: std::io::Error) -> AppError {
    if e.kind() == std::io::ErrorKind::NotFound {
        AppError::DependencyUnavailable(format!("{binary} is not installed"))
    } else {
        AppError::Internal(anyhow::anyhow!("Failed to run {binary}: {e}"))
    }
}

/// Collects the page PNGs that `pdftoppm` wrote into the scratch directory.
async fn page_images(dir: &Path) -> Result<Vec<PathBuf>, AppError> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to read OCR scratch dir: {e}")))?;

    let mut pages = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to read OCR scratch dir: {e}")))?
    {
        let path = entry.path();
        if path.extension().map(|ext| ext == "png").unwrap_or(false) {
            pages.push(path);
        }
    }

    Ok(pages)
}

async fn run_tesseract(image: &Path, language: &str) -> Result<String, AppError> {
    let output = Command::new("tesseract")
        .arg(image)
        .arg("stdout")
        .arg("-l")
        .arg(language)
        .arg("--psm")
        .arg("1")
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| spawn_error("tesseract", e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        tracing::warn!("tesseract failed on {}: {stderr}", image.display());
        return Err(AppError::UnprocessableEntity(
            "OCR failed on a rasterized page".to_string(),
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_binary_maps_to_dependency_error() {
        let err = spawn_error("pdftoppm", std::io::ErrorKind::NotFound.into());
        assert!(matches!(err, AppError::DependencyUnavailable(_)));
    }

    #[test]
    fn test_other_spawn_failures_are_internal() {
        let err = spawn_error("tesseract", std::io::ErrorKind::PermissionDenied.into());
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[tokio::test]
    async fn test_page_images_finds_only_pngs() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["page-01.png", "page-02.png", "resume.pdf", "notes.txt"] {
            tokio::fs::write(dir.path().join(name), b"").await.unwrap();
        }

        let pages = page_images(dir.path()).await.unwrap();
        assert_eq!(pages.len(), 2);
        assert!(pages.iter().all(|p| p.extension().unwrap() == "png"));
    }

    #[tokio::test]
    async fn test_zero_padded_pages_sort_in_order() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["page-10.png", "page-02.png", "page-01.png"] {
            tokio::fs::write(dir.path().join(name), b"").await.unwrap();
        }

        let mut pages = page_images(dir.path()).await.unwrap();
        pages.sort();

        let names: Vec<_> = pages
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["page-01.png", "page-02.png", "page-10.png"]);
    }
}
