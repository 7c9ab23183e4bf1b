//! Champion-challenger pair scheduling
//!
//! Each (participant, component) runs a single-elimination tournament:
//! the winner of the latest trial stays on as champion and faces one
//! not-yet-seen method per trial, so a set of N eligible methods finishes
//! after exactly N-1 trials.
//!
//! Tournament state is re-derived from the flattened vote history on
//! every call rather than cached; history is the single source of truth,
//! which lets a participant resume from any device that holds the same
//! history.

use std::collections::HashSet;

use tracing::warn;

use crate::db::models::Vote;
use crate::prng::{stable_shuffle, SeededRng};
use crate::tie::TiePolicy;
use crate::vote::{Preference, Side};

/// Winner of a single historical trial.
///
/// Interpretation order: the stored `resolved_preferred` if it parses,
/// then the raw `preferred`, with stored ties re-resolved through
/// `policy` using the row's own trial tuple. A row whose outcome fields
/// are unrecognized counts as a win for the left method; that keeps
/// scheduling available over corrupt or foreign rows, but can crown the
/// wrong champion, so the path is logged rather than treated as normal.
pub fn winner_of(vote: &Vote, policy: &TiePolicy) -> String {
    if let Some(resolved) = vote.resolved_preferred.as_deref() {
        if let Ok(side) = Side::parse(resolved) {
            return side
                .method_of(&vote.left_method_id, &vote.right_method_id)
                .to_string();
        }
    }

    match Preference::parse(&vote.preferred) {
        Ok(Preference::Left) => vote.left_method_id.clone(),
        Ok(Preference::Right) => vote.right_method_id.clone(),
        Ok(Preference::Tie) => {
            let side = policy.resolve(
                &vote.participant_id,
                &vote.component,
                vote.trial_id,
                &vote.left_method_id,
                &vote.right_method_id,
            );
            side.method_of(&vote.left_method_id, &vote.right_method_id)
                .to_string()
        }
        Err(_) => {
            warn!(
                vote_id = %vote.id,
                preferred = %vote.preferred,
                "unparseable trial outcome, treating left method as winner"
            );
            vote.left_method_id.clone()
        }
    }
}

/// Compute the next pair to present, or `None` when there is nothing to
/// show.
///
/// `None` covers two cases: fewer than two eligible methods (or a missing
/// participant id), and a finished tournament. Callers that need to tell
/// them apart check the eligible count before calling; both mean "nothing
/// to show".
///
/// Pure function of its inputs: all required state arrives in `history`.
pub fn next_pair(
    participant_id: &str,
    component: &str,
    eligible: &[String],
    history: &[Vote],
    policy: &TiePolicy,
) -> Option<(String, String)> {
    if participant_id.is_empty() || eligible.len() < 2 {
        return None;
    }

    let mut rows: Vec<&Vote> = history
        .iter()
        .filter(|v| v.participant_id == participant_id && v.component == component)
        .collect();
    rows.sort_by_key(|v| v.trial_id);

    // Opening matchup: participant- and component-specific, but
    // reproducible.
    if rows.is_empty() {
        let seed = format!("{}{}", participant_id, component);
        let seeded = stable_shuffle(eligible, &seed);
        return Some((seeded[0].clone(), seeded[1].clone()));
    }

    let last = rows[rows.len() - 1];
    let champion = winner_of(last, policy);

    let mut appeared: HashSet<&str> = HashSet::new();
    for row in &rows {
        appeared.insert(row.left_method_id.as_str());
        appeared.insert(row.right_method_id.as_str());
    }

    let unseen: Vec<&String> = eligible
        .iter()
        .filter(|m| !appeared.contains(m.as_str()) && **m != champion)
        .collect();
    if unseen.is_empty() {
        // Every eligible method has faced a champion: tournament complete.
        return None;
    }

    // Seed varies with how many methods have been seen so far, keeping
    // the challenger pick reproducible per history length.
    let seed = format!("{}::{}::{}", participant_id, component, appeared.len());
    let mut rng = SeededRng::from_seed_str(&seed);
    let challenger = unseen[rng.next_index(unseen.len())].clone();

    Some((champion, challenger))
}
