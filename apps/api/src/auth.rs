//! Supabase JWT verification for protected routes.
//!
//! The browser client signs in through Supabase (Google OAuth) and sends the
//! session access token as `Authorization: Bearer <token>`. Supabase signs
//! access tokens with HS256 using the project JWT secret; audience is
//! `authenticated` and issuer is `{SUPABASE_URL}/auth/v1`.

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

/// Claims carried in a Supabase access token. Only the fields we read.
#[derive(Debug, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: Option<String>,
    #[allow(dead_code)]
    pub aud: String,
    #[allow(dead_code)]
    pub exp: usize,
}

/// The authenticated user behind a request. Extracted from the bearer token,
/// so adding this as a handler argument is what gates an endpoint.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    /// Email claim from the access token.
    #[allow(dead_code)]
    pub email: Option<String>,
}

/// Verifies a Supabase access token and returns its claims.
pub fn verify_token(
    token: &str,
    jwt_secret: &str,
    supabase_url: &str,
) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&["authenticated"]);
    validation.set_issuer(&[format!(
        "{}/auth/v1",
        supabase_url.trim_end_matches('/')
    )]);

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::warn!("JWT verification failed: {e}");
        AppError::Unauthorized
    })?;

    Ok(data.claims)
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AppError::Unauthorized)?;
        let claims = verify_token(
            token,
            &state.config.supabase_jwt_secret,
            &state.config.supabase_url,
        )?;

        Ok(AuthUser {
            id: claims.sub,
            email: claims.email,
        })
    }
}
