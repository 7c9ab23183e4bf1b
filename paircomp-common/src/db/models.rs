//! Database models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Setting {
    pub key: String,
    pub value: String,
}

/// A survey participant, gated by an access code handed out out-of-band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub participant_id: String,
    pub access_code: String,
    pub display_name: Option<String>,
}

/// One pairwise comparison trial.
///
/// `preferred` and `resolved_preferred` are carried as raw strings rather
/// than enums: rows can arrive from an offline cache written by an older
/// client, and scheduling must stay available over rows it cannot fully
/// interpret (see `schedule::winner_of`). New rows are validated at the
/// persistence boundary by `vote::validate_for_persist`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    /// Composed identity: `participant__component-slug__trial`.
    pub id: String,
    pub participant_id: String,
    pub component: String,
    /// 1-based, contiguous per (participant, component).
    pub trial_id: i64,
    pub left_method_id: String,
    pub right_method_id: String,
    /// Raw participant input: "left", "right" or "tie".
    pub preferred: String,
    /// Binding outcome after tie breaking: "left" or "right".
    pub resolved_preferred: Option<String>,
    /// Optional free-text feedback entered with the vote.
    pub feedback: Option<String>,
    /// Submission time as reported by the participant's device.
    pub client_timestamp: Option<String>,
    /// Server-side persistence time.
    pub submitted_at: Option<DateTime<Utc>>,
}

impl Vote {
    /// Reconciliation key: one row per (participant, component, trial).
    pub fn key(&self) -> (String, String, i64) {
        (
            self.participant_id.clone(),
            self.component.clone(),
            self.trial_id,
        )
    }
}
