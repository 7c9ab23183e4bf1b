//! Vote log reconciliation
//!
//! A participant may vote offline; the browser cache and the server then
//! hold diverging logs. Reconciliation combines them into one canonical
//! log before any scheduling decision. The server is authoritative for
//! any (participant, component, trial) key present in both; local-only
//! rows survive so unsynced offline progress is not lost.

use std::collections::HashMap;

use crate::db::models::Vote;

/// Merge a locally cached vote log with the server-retrieved log.
///
/// Output is deduplicated by key and sorted by component (lexicographic),
/// then trial id, with participant id as a final tie-break so the order
/// is total. Merging a log with itself returns an equivalent log.
pub fn merge(local: &[Vote], remote: &[Vote]) -> Vec<Vote> {
    let mut by_key: HashMap<(String, String, i64), Vote> =
        HashMap::with_capacity(local.len() + remote.len());

    // Remote rows first: authoritative on key collision.
    for row in remote {
        by_key.insert(row.key(), row.clone());
    }
    for row in local {
        by_key.entry(row.key()).or_insert_with(|| row.clone());
    }

    let mut rows: Vec<Vote> = by_key.into_values().collect();
    rows.sort_by(|a, b| {
        a.component
            .cmp(&b.component)
            .then_with(|| a.trial_id.cmp(&b.trial_id))
            .then_with(|| a.participant_id.cmp(&b.participant_id))
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::make_vote_id;

    fn vote(participant: &str, component: &str, trial: i64, feedback: &str) -> Vote {
        Vote {
            id: make_vote_id(participant, component, trial),
            participant_id: participant.to_string(),
            component: component.to_string(),
            trial_id: trial,
            left_method_id: "a".to_string(),
            right_method_id: "b".to_string(),
            preferred: "left".to_string(),
            resolved_preferred: Some("left".to_string()),
            feedback: Some(feedback.to_string()),
            client_timestamp: None,
            submitted_at: None,
        }
    }

    #[test]
    fn test_merge_unions_disjoint_logs() {
        let local = vec![vote("P1", "cautions", 2, "local")];
        let remote = vec![vote("P1", "cautions", 1, "remote")];
        let merged = merge(&local, &remote);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].trial_id, 1);
        assert_eq!(merged[1].trial_id, 2);
    }

    #[test]
    fn test_remote_wins_on_collision() {
        let local = vec![vote("P1", "cautions", 3, "local-edit")];
        let remote = vec![vote("P1", "cautions", 3, "remote-truth")];
        let merged = merge(&local, &remote);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].feedback.as_deref(), Some("remote-truth"));
    }

    #[test]
    fn test_local_only_progress_preserved() {
        let local = vec![
            vote("P1", "cautions", 1, "synced"),
            vote("P1", "cautions", 2, "offline-only"),
        ];
        let remote = vec![vote("P1", "cautions", 1, "synced")];
        let merged = merge(&local, &remote);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[1].feedback.as_deref(), Some("offline-only"));
    }

    #[test]
    fn test_ordering_by_component_then_trial() {
        let local = vec![
            vote("P1", "user_profile", 1, ""),
            vote("P1", "action_space", 2, ""),
        ];
        let remote = vec![
            vote("P1", "cautions", 1, ""),
            vote("P1", "action_space", 1, ""),
        ];
        let merged = merge(&local, &remote);
        let keys: Vec<(String, i64)> = merged
            .iter()
            .map(|v| (v.component.clone(), v.trial_id))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("action_space".to_string(), 1),
                ("action_space".to_string(), 2),
                ("cautions".to_string(), 1),
                ("user_profile".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_merge_idempotent() {
        let local = vec![
            vote("P1", "cautions", 1, "a"),
            vote("P1", "cautions", 2, "b"),
        ];
        let remote = vec![
            vote("P1", "cautions", 2, "b-remote"),
            vote("P1", "user_profile", 1, "c"),
        ];
        let once = merge(&local, &remote);
        let twice = merge(&once, &once);
        assert_eq!(once, twice, "merging a log with itself must be a no-op");
    }
}
