//! Next-pair scheduling endpoint

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;

use paircomp_common::api::types::{NextPairResponse, PairInfo};
use paircomp_common::schedule;

use crate::api::{ApiError, SessionParticipant};
use crate::{db, AppState};

/// Query parameters for pair scheduling
#[derive(Debug, Deserialize)]
pub struct PairQuery {
    pub component: String,
}

/// GET /api/pair?component=X
///
/// Computes the next pair for the calling participant from the eligible
/// method set and the server-held history. `pair` is null both when the
/// tournament is complete and when fewer than two methods are eligible;
/// `complete` distinguishes the former.
pub async fn get_next_pair(
    State(state): State<AppState>,
    Extension(SessionParticipant(participant_id)): Extension<SessionParticipant>,
    Query(query): Query<PairQuery>,
) -> Result<Json<NextPairResponse>, ApiError> {
    if !state.manifest.components.contains(&query.component) {
        return Err(ApiError::NotFound(format!(
            "unknown component '{}'",
            query.component
        )));
    }

    let eligible = state
        .contents
        .eligible_methods(&state.manifest, &query.component);

    let history = db::votes_for_participant(&state.db, &participant_id)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let trials_so_far = history
        .iter()
        .filter(|v| v.component == query.component)
        .count() as i64;

    let pair = schedule::next_pair(
        &participant_id,
        &query.component,
        &eligible,
        &history,
        &state.tie_policy,
    );

    let complete = pair.is_none() && eligible.len() >= 2;

    Ok(Json(NextPairResponse {
        component: query.component,
        pair: pair.map(|(left, right)| PairInfo {
            left_method_id: left,
            right_method_id: right,
        }),
        complete,
        trial_id: trials_so_far + 1,
    }))
}
