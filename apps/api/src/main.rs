mod auth;
mod config;
mod errors;
mod extraction;
mod llm_client;
mod processing;
mod questions;
mod routes;
mod state;
mod storage;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use axum::http::{header, HeaderValue, Method};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::extraction::ocr::OcrEngine;
use crate::llm_client::LlmClient;
use crate::questions::generator::GeminiQuestionGenerator;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ResumeRadar API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize S3 / MinIO
    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized (bucket: {})", config.s3_bucket);

    // Initialize LLM client
    let llm = LlmClient::new(config.gemini_api_key.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let questions = Arc::new(GeminiQuestionGenerator::new(llm));

    // OCR engine: probe for the poppler + tesseract binaries once at startup
    let ocr = OcrEngine::new(
        config.ocr_dpi,
        config.ocr_language.clone(),
        config.ocr_timeout_secs,
    );
    if OcrEngine::is_available().await {
        info!("OCR fallback available (pdftoppm + tesseract found)");
    } else {
        warn!("pdftoppm or tesseract not found on PATH; scanned resumes will be rejected");
    }

    // Build app state
    let state = AppState {
        s3,
        questions,
        ocr,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(&config)?);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "resumeradar-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}

/// CORS for a separately hosted browser client. The bundled static client is
/// same-origin and never needs it; the allowed origin comes from config so
/// local dev and production can differ.
fn build_cors_layer(config: &Config) -> Result<CorsLayer> {
    let origin: HeaderValue = config.cors_allowed_origin.parse().with_context(|| {
        format!(
            "Invalid CORS_ALLOWED_ORIGIN '{}'",
            config.cors_allowed_origin
        )
    })?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]))
}
