//! Session token signing and verification
//!
//! Access codes gate the survey; a successful code exchange yields an
//! opaque bearer token binding the session to one participant. Tokens
//! are `<participant_id>.<sig>` where the signature is a SHA-256 over the
//! participant id and a server-held secret.
//!
//! This is gating, not hardened authentication: it keeps casual URL
//! sharing from writing votes under someone else's id. The secret is a
//! random non-zero i64 stored in the settings table, generated on first
//! use.

use sha2::{Digest, Sha256};

#[cfg(feature = "sqlx")]
use sqlx::SqlitePool;

/// Sign a participant id into a bearer token.
pub fn sign_token(participant_id: &str, secret: i64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(participant_id.as_bytes());
    hasher.update(b":");
    hasher.update(secret.to_string().as_bytes());
    let sig = format!("{:x}", hasher.finalize());
    format!("{}.{}", participant_id, sig)
}

/// Verify a bearer token, returning the participant id it binds.
///
/// Participant ids never contain '.', so the last dot separates id from
/// signature.
pub fn verify_token(token: &str, secret: i64) -> Option<String> {
    let (participant_id, _sig) = token.rsplit_once('.')?;
    if participant_id.is_empty() {
        return None;
    }
    if sign_token(participant_id, secret) == token {
        Some(participant_id.to_string())
    } else {
        None
    }
}

/// Load the session secret from database settings.
///
/// Key: `session_secret`, value: i64. Generated and stored on first use.
#[cfg(feature = "sqlx")]
pub async fn load_session_secret(db: &SqlitePool) -> crate::Result<i64> {
    let result: Option<(String,)> =
        sqlx::query_as("SELECT value FROM settings WHERE key = 'session_secret'")
            .fetch_optional(db)
            .await?;

    match result {
        Some((value,)) => value
            .parse::<i64>()
            .map_err(|e| crate::Error::Internal(format!("invalid session secret: {}", e))),
        None => initialize_session_secret(db).await,
    }
}

/// Generate and store a fresh session secret (random non-zero i64).
#[cfg(feature = "sqlx")]
pub async fn initialize_session_secret(db: &SqlitePool) -> crate::Result<i64> {
    use rand::Rng;

    let mut rng = rand::thread_rng();
    let secret: i64 = loop {
        let val = rng.gen::<i64>();
        if val != 0 {
            break val;
        }
    };

    sqlx::query("INSERT OR REPLACE INTO settings (key, value) VALUES ('session_secret', ?)")
        .bind(secret.to_string())
        .execute(db)
        .await?;

    Ok(secret)
}
