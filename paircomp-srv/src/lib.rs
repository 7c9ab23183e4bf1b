//! paircomp-srv library - pairwise comparison survey server
//!
//! Thin application shell around the scheduling core: session opening,
//! manifest and method content retrieval, next-pair computation, vote
//! submission and offline-log sync.

use std::sync::Arc;

use axum::Router;
use sqlx::SqlitePool;

use paircomp_common::content::ContentStore;
use paircomp_common::manifest::Manifest;
use paircomp_common::tie::TiePolicy;

pub mod api;
pub mod db;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Survey manifest, loaded once at startup
    pub manifest: Arc<Manifest>,
    /// Per-method content documents, loaded once at startup
    pub contents: Arc<ContentStore>,
    /// Favorites ordering used for tie breaking
    pub tie_policy: Arc<TiePolicy>,
    /// Secret for session token signing
    pub session_secret: i64,
}

impl AppState {
    /// Create new application state
    pub fn new(
        db: SqlitePool,
        manifest: Manifest,
        contents: ContentStore,
        tie_policy: TiePolicy,
        session_secret: i64,
    ) -> Self {
        Self {
            db,
            manifest: Arc::new(manifest),
            contents: Arc::new(contents),
            tie_policy: Arc::new(tie_policy),
            session_secret,
        }
    }
}

/// Build application router
///
/// Session opening, the manifest and the health endpoint are public;
/// everything that reads or writes a participant's data requires a
/// session token.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{get, post};

    // Protected routes (require a session token)
    let protected = Router::new()
        .route("/api/pair", get(api::get_next_pair))
        .route("/api/vote", post(api::submit_vote))
        .route("/api/votes", get(api::list_votes))
        .route("/api/votes/sync", post(api::sync_votes))
        .route("/api/content/:method_id", get(api::get_method_content))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::auth_middleware,
        ));

    // Public routes (no authentication)
    let public = Router::new()
        .route("/api/session", post(api::open_session))
        .route("/api/manifest", get(api::get_manifest))
        .merge(api::health_routes());

    // Combine routers
    Router::new()
        .merge(protected)
        .merge(public)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}
