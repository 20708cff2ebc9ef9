pub mod health;

use std::path::Path;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

use crate::processing::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let static_dir = state.config.static_dir.clone();
    let index = Path::new(&static_dir).join("index.html");

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/process-resume", post(handlers::handle_process_resume))
        // Alias kept for older clients that call the /api suffix path.
        .route(
            "/process-resume/api",
            post(handlers::handle_process_resume),
        )
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        // Everything else serves the browser client; unknown paths get index.html.
        .fallback_service(ServeDir::new(&static_dir).not_found_service(ServeFile::new(index)))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
    use serde::Serialize;
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::config::Config;
    use crate::errors::AppError;
    use crate::extraction::ocr::OcrEngine;
    use crate::questions::generator::QuestionGenerator;
    use crate::state::AppState;

    const JWT_SECRET: &str = "test-jwt-secret-that-is-long-enough-for-hs256";
    const SUPABASE_URL: &str = "https://testproj.supabase.co";
    const BOUNDARY: &str = "test-boundary";

    struct CannedQuestions;

    #[async_trait]
    impl QuestionGenerator for CannedQuestions {
        async fn generate(&self, _resume_text: &str) -> Result<Vec<String>, AppError> {
            Ok(vec!["What did you build?".to_string()])
        }
    }

    fn make_config() -> Config {
        Config {
            gemini_api_key: "test-key".to_string(),
            supabase_url: SUPABASE_URL.to_string(),
            supabase_jwt_secret: JWT_SECRET.to_string(),
            s3_bucket: "resumes".to_string(),
            s3_endpoint: "http://127.0.0.1:1".to_string(),
            s3_public_url: "http://127.0.0.1:1".to_string(),
            aws_access_key_id: "minioadmin".to_string(),
            aws_secret_access_key: "minioadmin".to_string(),
            port: 5000,
            cors_allowed_origin: "http://localhost:3000".to_string(),
            static_dir: "static".to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
            ocr_dpi: 300,
            ocr_language: "eng".to_string(),
            ocr_timeout_secs: 120,
            rust_log: "info".to_string(),
        }
    }

    async fn make_state() -> AppState {
        let config = make_config();

        let credentials = aws_sdk_s3::config::Credentials::new(
            &config.aws_access_key_id,
            &config.aws_secret_access_key,
            None,
            None,
            "test",
        );
        let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new("us-east-1"))
            .credentials_provider(credentials)
            .endpoint_url(&config.s3_endpoint)
            .load()
            .await;

        AppState {
            s3: aws_sdk_s3::Client::new(&s3_config),
            questions: Arc::new(CannedQuestions),
            ocr: OcrEngine::new(config.ocr_dpi, config.ocr_language.clone(), 1),
            config,
        }
    }

    #[derive(Serialize)]
    struct MintedClaims {
        sub: Uuid,
        email: String,
        aud: String,
        iss: String,
        exp: usize,
    }

    fn mint_token() -> String {
        let claims = MintedClaims {
            sub: Uuid::new_v4(),
            email: "candidate@example.com".to_string(),
            aud: "authenticated".to_string(),
            iss: format!("{SUPABASE_URL}/auth/v1"),
            exp: (chrono::Utc::now().timestamp() + 3600) as usize,
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
        )
        .unwrap()
    }

    fn multipart_body(field_name: &str, filename: &str, content: &[u8]) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field_name}\"; \
                 filename=\"{filename}\"\r\nContent-Type: application/pdf\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn upload_request(token: Option<&str>, body: Vec<u8>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/process-resume")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            );
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::from(body)).unwrap()
    }

    async fn error_code(response: axum::response::Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        value["error"]["code"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health_returns_ok() {
        let app = build_router(make_state().await);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["status"], "ok");
        assert_eq!(value["service"], "resumeradar-api");
    }

    #[tokio::test]
    async fn test_unknown_path_serves_browser_client() {
        let app = build_router(make_state().await);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/dashboard")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        assert!(content_type.starts_with("text/html"));
    }

    #[tokio::test]
    async fn test_process_resume_requires_auth() {
        let app = build_router(make_state().await);
        let body = multipart_body("resume", "resume.pdf", b"%PDF-1.4 fake");

        let response = app.oneshot(upload_request(None, body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(error_code(response).await, "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_process_resume_rejects_bad_token() {
        let app = build_router(make_state().await);
        let body = multipart_body("resume", "resume.pdf", b"%PDF-1.4 fake");

        let response = app
            .oneshot(upload_request(Some("not.a.jwt"), body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_process_resume_rejects_missing_file() {
        let app = build_router(make_state().await);
        let body = multipart_body("attachment", "resume.pdf", b"%PDF-1.4 fake");
        let token = mint_token();

        let response = app
            .oneshot(upload_request(Some(&token), body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_code(response).await, "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_process_resume_rejects_non_pdf_filename() {
        let app = build_router(make_state().await);
        let body = multipart_body("resume", "resume.docx", b"%PDF-1.4 fake");
        let token = mint_token();

        let response = app
            .oneshot(upload_request(Some(&token), body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_process_resume_rejects_non_pdf_content() {
        let app = build_router(make_state().await);
        let body = multipart_body("resume", "resume.pdf", b"plain text pretending");
        let token = mint_token();

        let response = app
            .oneshot(upload_request(Some(&token), body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_process_resume_rejects_unparseable_pdf() {
        let app = build_router(make_state().await);
        // Carries the magic bytes but is not a parseable document
        let body = multipart_body("resume", "resume.pdf", b"%PDF-1.4\ngarbage");
        let token = mint_token();

        let response = app
            .oneshot(upload_request(Some(&token), body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(error_code(response).await, "UNPROCESSABLE_ENTITY");
    }

    #[tokio::test]
    async fn test_process_resume_rejects_oversized_upload() {
        let mut state = make_state().await;
        state.config.max_upload_bytes = 64;
        let app = build_router(state);

        let body = multipart_body("resume", "resume.pdf", &[b'a'; 1024]);
        let token = mint_token();

        let response = app
            .oneshot(upload_request(Some(&token), body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(error_code(response).await, "PAYLOAD_TOO_LARGE");
    }

    #[tokio::test]
    async fn test_alias_path_reaches_same_handler() {
        let app = build_router(make_state().await);
        let body = multipart_body("attachment", "resume.pdf", b"%PDF-1.4 fake");
        let token = mint_token();

        let request = Request::builder()
            .method("POST")
            .uri("/process-resume/api")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::from(body))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        // Same validation as the canonical path: no `resume` field → 400
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
