//! Manifest and method content retrieval

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use paircomp_common::api::types::{ManifestResponse, MethodInfo};

use crate::api::ApiError;
use crate::AppState;

/// GET /api/manifest
///
/// Components and methods for this survey. Public: clients need it to
/// render the access screen before a session exists.
pub async fn get_manifest(State(state): State<AppState>) -> Json<ManifestResponse> {
    Json(ManifestResponse {
        components: state.manifest.components.clone(),
        methods: state
            .manifest
            .methods
            .iter()
            .map(|m| MethodInfo {
                id: m.id.clone(),
                name: m.name.clone(),
            })
            .collect(),
    })
}

/// GET /api/content/:method_id
///
/// The full content document of one method, for client-side rendering.
pub async fn get_method_content(
    State(state): State<AppState>,
    Path(method_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    if state.manifest.method(&method_id).is_none() {
        return Err(ApiError::NotFound(format!(
            "unknown method '{}'",
            method_id
        )));
    }

    let doc = state
        .contents
        .document(&method_id)
        .cloned()
        .ok_or_else(|| ApiError::NotFound(format!("no content for method '{}'", method_id)))?;

    Ok(Json(doc))
}
