//! Shared API request/response types
//!
//! Types exchanged between the survey server and its clients. Any client
//! that preserves these fields round-trips votes losslessly; no other
//! wire format is assumed.

use serde::{Deserialize, Serialize};

use crate::db::models::Vote;

// ========================================
// Session
// ========================================

/// POST /api/session request: exchange an access code for a token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRequest {
    pub access_code: String,
}

/// POST /api/session response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    /// Opaque bearer token for subsequent requests.
    pub token: String,
    pub participant_id: String,
}

// ========================================
// Manifest
// ========================================

/// GET /api/manifest response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestResponse {
    pub components: Vec<String>,
    pub methods: Vec<MethodInfo>,
}

/// Method entry as exposed to clients (file reference omitted).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodInfo {
    pub id: String,
    pub name: String,
}

// ========================================
// Scheduling
// ========================================

/// GET /api/pair response.
///
/// `pair` is absent both when the tournament is complete and when fewer
/// than two methods are eligible; `complete` is true only in the former
/// case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NextPairResponse {
    pub component: String,
    pub pair: Option<PairInfo>,
    pub complete: bool,
    /// 1-based trial number to use when submitting the presented pair.
    pub trial_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairInfo {
    pub left_method_id: String,
    pub right_method_id: String,
}

// ========================================
// Votes
// ========================================

/// POST /api/vote request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitVoteRequest {
    pub component: String,
    pub trial_id: i64,
    pub left_method_id: String,
    pub right_method_id: String,
    /// Raw preference; synonyms accepted (left/top, right/bottom,
    /// tie/none/no_preference).
    pub preferred: String,
    /// Client-resolved tie outcome, if the client already broke the tie.
    pub resolved_preferred: Option<String>,
    pub feedback: Option<String>,
    pub client_timestamp: Option<String>,
}

/// POST /api/vote response: the vote as persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitVoteResponse {
    pub vote: Vote,
}

/// GET /api/votes and POST /api/votes/sync response: the canonical log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteLogResponse {
    pub votes: Vec<Vote>,
}

/// POST /api/votes/sync request: the client's offline-cached log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncRequest {
    pub votes: Vec<Vote>,
}
