//! Vote identity and preference normalization
//!
//! Votes are keyed by a composed identifier rather than a surrogate, so a
//! resubmitted trial overwrites its earlier row instead of duplicating it,
//! both on the server and in the offline cache.

use serde::{Deserialize, Serialize};

use crate::db::models::Vote;
use crate::error::{Error, Result};

/// Which side of a pairwise presentation won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Canonical storage value: "left" or "right".
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }

    /// Parse a resolved outcome.
    ///
    /// Accepts the vertical-layout synonyms the survey UI submits
    /// ("top"/"bottom"). A tie is not a resolved outcome and is rejected.
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "left" | "top" => Ok(Side::Left),
            "right" | "bottom" => Ok(Side::Right),
            other => Err(Error::InvalidPreference(format!(
                "unrecognized resolved outcome '{}'",
                other
            ))),
        }
    }

    /// The method id this side refers to within a trial.
    pub fn method_of<'a>(&self, left_method_id: &'a str, right_method_id: &'a str) -> &'a str {
        match self {
            Side::Left => left_method_id,
            Side::Right => right_method_id,
        }
    }
}

/// Raw participant preference for one trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preference {
    Left,
    Right,
    Tie,
}

impl Preference {
    /// Canonical storage value: "left", "right" or "tie".
    pub fn as_str(&self) -> &'static str {
        match self {
            Preference::Left => "left",
            Preference::Right => "right",
            Preference::Tie => "tie",
        }
    }

    /// Parse a raw preference, case-insensitive.
    ///
    /// Synonyms: left/top, right/bottom, tie/none/no_preference/
    /// nopreference. Anything else is rejected, never coerced.
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "left" | "top" => Ok(Preference::Left),
            "right" | "bottom" => Ok(Preference::Right),
            "tie" | "none" | "no_preference" | "nopreference" => Ok(Preference::Tie),
            other => Err(Error::InvalidPreference(format!(
                "unrecognized preference '{}'",
                other
            ))),
        }
    }
}

/// Build the stable identifier for a vote row.
///
/// Component names come from the manifest and may carry spaces or
/// punctuation; the id keeps only `[A-Za-z0-9_-]`, with whitespace runs
/// collapsed to single underscores:
/// `make_vote_id("P00001", "Action Space!", 4)` is
/// `"P00001__Action_Space__4"`.
pub fn make_vote_id(participant_id: &str, component: &str, trial_id: i64) -> String {
    let slug: String = component
        .trim()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect();
    format!("{}__{}__{}", participant_id, slug, trial_id)
}

/// Persistence-boundary validation for a vote row.
///
/// Rejects rows before they reach storage:
/// - participant id and both method ids must be non-empty, methods distinct
/// - trial ids are 1-based
/// - `preferred` must be a recognized value
/// - every row must carry a parseable `resolved_preferred`; for a tie vote
///   a missing resolution is reported as [`Error::MissingResolution`]
/// - the row id must match the composed identity
pub fn validate_for_persist(vote: &Vote) -> Result<()> {
    if vote.participant_id.is_empty() {
        return Err(Error::InvalidInput("participant id is required".into()));
    }
    if vote.left_method_id.is_empty() || vote.right_method_id.is_empty() {
        return Err(Error::InvalidInput(format!(
            "vote {} must reference two methods",
            vote.id
        )));
    }
    if vote.left_method_id == vote.right_method_id {
        return Err(Error::InvalidInput(format!(
            "vote {} compares method '{}' against itself",
            vote.id, vote.left_method_id
        )));
    }
    if vote.trial_id < 1 {
        return Err(Error::InvalidInput(format!(
            "vote {} has non-positive trial id {}",
            vote.id, vote.trial_id
        )));
    }

    let preferred = Preference::parse(&vote.preferred)?;

    match vote.resolved_preferred.as_deref() {
        Some(raw) => {
            Side::parse(raw)?;
        }
        None if preferred == Preference::Tie => {
            return Err(Error::MissingResolution(format!(
                "tie vote {} has no resolved outcome",
                vote.id
            )));
        }
        None => {
            return Err(Error::MissingResolution(format!(
                "vote {} has no resolved outcome",
                vote.id
            )));
        }
    }

    let expected_id = make_vote_id(&vote.participant_id, &vote.component, vote.trial_id);
    if vote.id != expected_id {
        return Err(Error::InvalidInput(format!(
            "vote id '{}' does not match its identity '{}'",
            vote.id, expected_id
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_vote() -> Vote {
        Vote {
            id: make_vote_id("P00001", "cautions", 1),
            participant_id: "P00001".to_string(),
            component: "cautions".to_string(),
            trial_id: 1,
            left_method_id: "hybrid".to_string(),
            right_method_id: "rule_based".to_string(),
            preferred: "left".to_string(),
            resolved_preferred: Some("left".to_string()),
            feedback: None,
            client_timestamp: None,
            submitted_at: None,
        }
    }

    #[test]
    fn test_vote_id_stability() {
        assert_eq!(
            make_vote_id("P00001", "Action Space!", 4),
            "P00001__Action_Space__4"
        );
    }

    #[test]
    fn test_vote_id_sanitizes_component() {
        // Whitespace runs collapse, non [A-Za-z0-9_-] characters are stripped
        assert_eq!(
            make_vote_id("P00002", "  conversation   state  ", 12),
            "P00002__conversation_state__12"
        );
        assert_eq!(make_vote_id("P00002", "a/b%c", 1), "P00002__abc__1");
        assert_eq!(make_vote_id("P00002", "user-profile", 2), "P00002__user-profile__2");
    }

    #[test]
    fn test_vote_id_distinct_per_trial() {
        let a = make_vote_id("P00001", "cautions", 1);
        let b = make_vote_id("P00001", "cautions", 2);
        let c = make_vote_id("P00001", "user_profile", 1);
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_preference_synonyms() {
        assert_eq!(Preference::parse("left").unwrap(), Preference::Left);
        assert_eq!(Preference::parse("TOP").unwrap(), Preference::Left);
        assert_eq!(Preference::parse("right").unwrap(), Preference::Right);
        assert_eq!(Preference::parse("Bottom").unwrap(), Preference::Right);
        assert_eq!(Preference::parse("tie").unwrap(), Preference::Tie);
        assert_eq!(Preference::parse("none").unwrap(), Preference::Tie);
        assert_eq!(Preference::parse("no_preference").unwrap(), Preference::Tie);
        assert_eq!(Preference::parse("NoPreference").unwrap(), Preference::Tie);
    }

    #[test]
    fn test_preference_rejects_unknown() {
        assert!(Preference::parse("middle").is_err());
        assert!(Preference::parse("").is_err());
        assert!(matches!(
            Preference::parse("maybe"),
            Err(Error::InvalidPreference(_))
        ));
    }

    #[test]
    fn test_side_rejects_tie() {
        assert_eq!(Side::parse("top").unwrap(), Side::Left);
        assert_eq!(Side::parse("bottom").unwrap(), Side::Right);
        assert!(Side::parse("tie").is_err());
        assert!(Side::parse("none").is_err());
    }

    #[test]
    fn test_validate_accepts_well_formed() {
        assert!(validate_for_persist(&sample_vote()).is_ok());
    }

    #[test]
    fn test_validate_rejects_tie_without_resolution() {
        let mut vote = sample_vote();
        vote.preferred = "tie".to_string();
        vote.resolved_preferred = None;
        assert!(matches!(
            validate_for_persist(&vote),
            Err(Error::MissingResolution(_))
        ));
    }

    #[test]
    fn test_validate_rejects_self_comparison() {
        let mut vote = sample_vote();
        vote.right_method_id = vote.left_method_id.clone();
        assert!(validate_for_persist(&vote).is_err());
    }

    #[test]
    fn test_validate_rejects_mismatched_id() {
        let mut vote = sample_vote();
        vote.id = "P00001__cautions__9".to_string();
        assert!(validate_for_persist(&vote).is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_preference() {
        let mut vote = sample_vote();
        vote.preferred = "favourite".to_string();
        assert!(matches!(
            validate_for_persist(&vote),
            Err(Error::InvalidPreference(_))
        ));
    }
}
