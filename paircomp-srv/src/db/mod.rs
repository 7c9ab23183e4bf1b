//! Database access layer for paircomp-srv
//!
//! Schema creation lives in paircomp-common (db::init); this module owns
//! the queries the survey server needs: vote upsert/fetch and participant
//! lookup/provisioning.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use paircomp_common::db::models::{Participant, Vote};
use paircomp_common::Result;

/// Insert or replace a vote by its identity.
///
/// Resubmitting the same (participant, component, trial) overwrites the
/// earlier row; the submission is idempotent for retrying clients.
pub async fn upsert_vote(db: &SqlitePool, vote: &Vote) -> Result<()> {
    sqlx::query(
        "INSERT INTO votes (id, participant_id, component, trial_id,
            left_method_id, right_method_id, preferred, resolved_preferred,
            feedback, client_timestamp, submitted_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(id) DO UPDATE SET
            left_method_id = excluded.left_method_id,
            right_method_id = excluded.right_method_id,
            preferred = excluded.preferred,
            resolved_preferred = excluded.resolved_preferred,
            feedback = excluded.feedback,
            client_timestamp = excluded.client_timestamp,
            submitted_at = excluded.submitted_at",
    )
    .bind(&vote.id)
    .bind(&vote.participant_id)
    .bind(&vote.component)
    .bind(vote.trial_id)
    .bind(&vote.left_method_id)
    .bind(&vote.right_method_id)
    .bind(&vote.preferred)
    .bind(&vote.resolved_preferred)
    .bind(&vote.feedback)
    .bind(&vote.client_timestamp)
    .bind(vote.submitted_at.map(|t| t.to_rfc3339()))
    .execute(db)
    .await?;
    Ok(())
}

/// All votes of one participant, ordered by component then trial.
pub async fn votes_for_participant(db: &SqlitePool, participant_id: &str) -> Result<Vec<Vote>> {
    type VoteRow = (
        String,
        String,
        String,
        i64,
        String,
        String,
        String,
        Option<String>,
        Option<String>,
        Option<String>,
        Option<String>,
    );

    let rows: Vec<VoteRow> = sqlx::query_as(
        "SELECT id, participant_id, component, trial_id,
            left_method_id, right_method_id, preferred, resolved_preferred,
            feedback, client_timestamp, submitted_at
         FROM votes
         WHERE participant_id = ?
         ORDER BY component ASC, trial_id ASC",
    )
    .bind(participant_id)
    .fetch_all(db)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| Vote {
            id: row.0,
            participant_id: row.1,
            component: row.2,
            trial_id: row.3,
            left_method_id: row.4,
            right_method_id: row.5,
            preferred: row.6,
            resolved_preferred: row.7,
            feedback: row.8,
            client_timestamp: row.9,
            submitted_at: row.10.and_then(parse_timestamp),
        })
        .collect())
}

/// Look up a participant by access code.
pub async fn participant_by_access_code(
    db: &SqlitePool,
    access_code: &str,
) -> Result<Option<Participant>> {
    let row: Option<(String, String, Option<String>)> = sqlx::query_as(
        "SELECT participant_id, access_code, display_name
         FROM participants WHERE access_code = ?",
    )
    .bind(access_code)
    .fetch_optional(db)
    .await?;

    Ok(row.map(|(participant_id, access_code, display_name)| Participant {
        participant_id,
        access_code,
        display_name,
    }))
}

/// Provision a new participant with a sequential id and a fresh access
/// code.
pub async fn create_participant(
    db: &SqlitePool,
    display_name: Option<&str>,
) -> Result<Participant> {
    use rand::distributions::Alphanumeric;
    use rand::Rng;

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM participants")
        .fetch_one(db)
        .await?;

    let participant_id = format!("P{:05}", count + 1);
    let access_code: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(char::from)
        .collect::<String>()
        .to_uppercase();

    sqlx::query(
        "INSERT INTO participants (participant_id, access_code, display_name)
         VALUES (?, ?, ?)",
    )
    .bind(&participant_id)
    .bind(&access_code)
    .bind(display_name)
    .execute(db)
    .await?;

    Ok(Participant {
        participant_id,
        access_code,
        display_name: display_name.map(|s| s.to_string()),
    })
}

fn parse_timestamp(raw: String) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&raw)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}
