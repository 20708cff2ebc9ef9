use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Missing required variables fail startup with an error naming the variable.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub supabase_url: String,
    pub supabase_jwt_secret: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub s3_public_url: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub port: u16,
    pub cors_allowed_origin: String,
    pub static_dir: String,
    pub max_upload_bytes: usize,
    pub ocr_dpi: u32,
    pub ocr_language: String,
    pub ocr_timeout_secs: u64,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            supabase_url: require_env("SUPABASE_URL")?,
            supabase_jwt_secret: require_env("SUPABASE_JWT_SECRET")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            s3_public_url: require_env("S3_PUBLIC_URL")?,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            cors_allowed_origin: std::env::var("CORS_ALLOWED_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            static_dir: std::env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string()),
            max_upload_bytes: std::env::var("MAX_UPLOAD_BYTES")
                .unwrap_or_else(|_| "10485760".to_string())
                .parse::<usize>()
                .context("MAX_UPLOAD_BYTES must be a byte count")?,
            ocr_dpi: std::env::var("OCR_DPI")
                .unwrap_or_else(|_| "300".to_string())
                .parse::<u32>()
                .context("OCR_DPI must be a positive integer")?,
            ocr_language: std::env::var("OCR_LANGUAGE").unwrap_or_else(|_| "eng".to_string()),
            ocr_timeout_secs: std::env::var("OCR_TIMEOUT_SECS")
                .unwrap_or_else(|_| "120".to_string())
                .parse::<u64>()
                .context("OCR_TIMEOUT_SECS must be a number of seconds")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_env_error_names_the_variable() {
        let err = require_env("RESUMERADAR_UNSET_TEST_VAR").unwrap_err();
        assert!(err.to_string().contains("RESUMERADAR_UNSET_TEST_VAR"));
    }
}
