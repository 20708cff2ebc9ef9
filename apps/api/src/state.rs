use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;

use crate::config::Config;
use crate::extraction::ocr::OcrEngine;
use crate::questions::generator::QuestionGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub s3: S3Client,
    /// Pluggable question generator. Default: GeminiQuestionGenerator.
    pub questions: Arc<dyn QuestionGenerator>,
    pub ocr: OcrEngine,
    pub config: Config,
}
