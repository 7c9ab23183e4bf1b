//! Session-token authentication middleware
//!
//! Protected routes expect `Authorization: Bearer <token>` where the
//! token was issued by the session endpoint. On success the participant
//! id is injected into request extensions for handlers to extract.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::warn;

use paircomp_common::api::auth::verify_token;

use crate::AppState;

/// Participant identity extracted from a verified session token.
#[derive(Debug, Clone)]
pub struct SessionParticipant(pub String);

/// Authentication middleware
///
/// Returns 401 Unauthorized when the header is missing or the token does
/// not verify. The health endpoint and session opening do NOT use this
/// middleware.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingToken)?;

    let token = header.strip_prefix("Bearer ").ok_or(AuthError::MissingToken)?;

    let participant_id = verify_token(token, state.session_secret).ok_or_else(|| {
        warn!("rejected session token");
        AuthError::InvalidToken
    })?;

    request
        .extensions_mut()
        .insert(SessionParticipant(participant_id));

    Ok(next.run(request).await)
}

/// Authentication error types for HTTP responses
#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::MissingToken => "Missing bearer token".to_string(),
            AuthError::InvalidToken => "Invalid session token".to_string(),
        };

        let body = Json(json!({
            "error": message,
        }));

        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}
