//! Vote submission, listing and offline-log sync

use axum::{extract::State, Extension, Json};
use tracing::info;

use paircomp_common::api::types::{
    SubmitVoteRequest, SubmitVoteResponse, SyncRequest, VoteLogResponse,
};
use paircomp_common::db::models::Vote;
use paircomp_common::vote::{validate_for_persist, Preference, Side};
use paircomp_common::{make_vote_id, reconcile, time};

use crate::api::{ApiError, SessionParticipant};
use crate::{db, AppState};

/// POST /api/vote
///
/// Validates and persists one trial. The preference is normalized at
/// this boundary; unrecognized values are rejected, never coerced. Ties
/// are bound to a resolved outcome here: a client-resolved value is
/// validated if supplied, otherwise the tie policy resolves it with the
/// same deterministic answer the scheduler would derive later.
///
/// Persisting is an upsert by vote identity, so resubmitting a trial
/// overwrites its earlier row.
pub async fn submit_vote(
    State(state): State<AppState>,
    Extension(SessionParticipant(participant_id)): Extension<SessionParticipant>,
    Json(req): Json<SubmitVoteRequest>,
) -> Result<Json<SubmitVoteResponse>, ApiError> {
    if !state.manifest.components.contains(&req.component) {
        return Err(ApiError::BadRequest(format!(
            "unknown component '{}'",
            req.component
        )));
    }

    let preferred = Preference::parse(&req.preferred)?;

    let resolved = match preferred {
        Preference::Left => Side::Left,
        Preference::Right => Side::Right,
        Preference::Tie => match req.resolved_preferred.as_deref() {
            Some(raw) => Side::parse(raw)?,
            None => state.tie_policy.resolve(
                &participant_id,
                &req.component,
                req.trial_id,
                &req.left_method_id,
                &req.right_method_id,
            ),
        },
    };

    let vote = Vote {
        id: make_vote_id(&participant_id, &req.component, req.trial_id),
        participant_id,
        component: req.component,
        trial_id: req.trial_id,
        left_method_id: req.left_method_id,
        right_method_id: req.right_method_id,
        preferred: preferred.as_str().to_string(),
        resolved_preferred: Some(resolved.as_str().to_string()),
        feedback: req.feedback,
        client_timestamp: req.client_timestamp,
        submitted_at: Some(time::now()),
    };

    validate_for_persist(&vote)?;

    db::upsert_vote(&state.db, &vote)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    info!(vote_id = %vote.id, "vote persisted");

    Ok(Json(SubmitVoteResponse { vote }))
}

/// GET /api/votes
///
/// The participant's canonical vote log, ordered by component then
/// trial. Used to hydrate a fresh device.
pub async fn list_votes(
    State(state): State<AppState>,
    Extension(SessionParticipant(participant_id)): Extension<SessionParticipant>,
) -> Result<Json<VoteLogResponse>, ApiError> {
    let votes = db::votes_for_participant(&state.db, &participant_id)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(Json(VoteLogResponse { votes }))
}

/// POST /api/votes/sync
///
/// Reconciles the client's offline-cached log with the server log.
/// Rows claiming another participant are dropped; the rest are validated
/// at the persistence boundary before anything is written. The server is
/// authoritative on key collision; local-only rows are persisted. Runs
/// once per session, before the first scheduling call.
pub async fn sync_votes(
    State(state): State<AppState>,
    Extension(SessionParticipant(participant_id)): Extension<SessionParticipant>,
    Json(req): Json<SyncRequest>,
) -> Result<Json<VoteLogResponse>, ApiError> {
    let local: Vec<Vote> = req
        .votes
        .into_iter()
        .filter(|v| v.participant_id == participant_id)
        .collect();

    for row in &local {
        validate_for_persist(row)?;
    }

    let remote = db::votes_for_participant(&state.db, &participant_id)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let merged = reconcile::merge(&local, &remote);

    // Persist rows the server has not seen; colliding keys already hold
    // the server's version.
    let known: std::collections::HashSet<&str> = remote.iter().map(|v| v.id.as_str()).collect();
    let mut persisted = 0;
    for row in &merged {
        if !known.contains(row.id.as_str()) {
            db::upsert_vote(&state.db, row)
                .await
                .map_err(|e| ApiError::Internal(e.to_string()))?;
            persisted += 1;
        }
    }

    if persisted > 0 {
        info!(participant_id = %participant_id, persisted, "synced offline votes");
    }

    Ok(Json(VoteLogResponse { votes: merged }))
}
