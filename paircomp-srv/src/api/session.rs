//! Session opening: access code to bearer token exchange

use axum::{extract::State, Json};
use tracing::{info, warn};

use paircomp_common::api::auth::sign_token;
use paircomp_common::api::types::{SessionRequest, SessionResponse};

use crate::api::ApiError;
use crate::{db, AppState};

/// POST /api/session
///
/// Exchanges an access code for a session token. The code is matched
/// against the participants table; unknown codes are rejected without
/// detail.
pub async fn open_session(
    State(state): State<AppState>,
    Json(req): Json<SessionRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let code = req.access_code.trim();
    if code.is_empty() {
        return Err(ApiError::BadRequest("access code is required".to_string()));
    }

    let participant = db::participant_by_access_code(&state.db, code)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let participant = participant.ok_or_else(|| {
        warn!("session attempt with unrecognized access code");
        ApiError::Unauthorized("unrecognized access code".to_string())
    })?;

    info!(participant_id = %participant.participant_id, "session opened");

    let token = sign_token(&participant.participant_id, state.session_secret);
    Ok(Json(SessionResponse {
        token,
        participant_id: participant.participant_id,
    }))
}
