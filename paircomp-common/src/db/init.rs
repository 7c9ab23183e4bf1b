//! Database initialization
//!
//! Creates the schema on first run; safe to call on every startup. The
//! vote table enforces one row per (participant, component, trial) in
//! addition to the composed primary key, so resubmissions land as
//! replacements rather than duplicates.

use std::path::Path;

use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tracing::info;

use crate::Result;

/// Initialize database connection and create tables if needed.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Enable foreign keys
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL mode allows concurrent readers with one writer
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    // Schema creation (idempotent - safe to call multiple times)
    create_settings_table(&pool).await?;
    create_participants_table(&pool).await?;
    create_votes_table(&pool).await?;

    Ok(pool)
}

async fn create_settings_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_participants_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS participants (
            participant_id TEXT PRIMARY KEY,
            access_code TEXT NOT NULL UNIQUE,
            display_name TEXT
        )",
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_votes_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS votes (
            id TEXT PRIMARY KEY,
            participant_id TEXT NOT NULL,
            component TEXT NOT NULL,
            trial_id INTEGER NOT NULL,
            left_method_id TEXT NOT NULL,
            right_method_id TEXT NOT NULL,
            preferred TEXT NOT NULL,
            resolved_preferred TEXT,
            feedback TEXT,
            client_timestamp TEXT,
            submitted_at TEXT,
            UNIQUE(participant_id, component, trial_id)
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_votes_participant
         ON votes(participant_id)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
