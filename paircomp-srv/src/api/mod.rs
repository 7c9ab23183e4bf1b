//! HTTP API handlers for paircomp-srv

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

pub mod auth;
pub mod health;
pub mod manifest;
pub mod pair;
pub mod session;
pub mod votes;

pub use auth::{auth_middleware, SessionParticipant};
pub use health::health_routes;
pub use manifest::{get_manifest, get_method_content};
pub use pair::get_next_pair;
pub use session::open_session;
pub use votes::{list_votes, submit_vote, sync_votes};

/// Error type shared by the API handlers
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    NotFound(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

impl From<paircomp_common::Error> for ApiError {
    fn from(err: paircomp_common::Error) -> Self {
        use paircomp_common::Error;
        match err {
            Error::InvalidPreference(msg) | Error::MissingResolution(msg) => {
                ApiError::BadRequest(msg)
            }
            Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            Error::NotFound(msg) => ApiError::NotFound(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}
