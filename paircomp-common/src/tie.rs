//! Tie resolution policy
//!
//! A "no preference" vote still needs a binding winner: the scheduler
//! treats the winner of the most recent trial as the reigning champion, so
//! every trial must resolve to one side. Favored methods win ties
//! outright; a tie between two unranked methods falls to a deterministic
//! coin flip, so replaying history crowns the same champion every time.

use crate::prng::SeededRng;
use crate::vote::Side;

/// Rank assigned to any method outside the favorites list.
const UNRANKED: usize = 999;

/// Ordered favorites list used to break ties, best first.
///
/// Injectable so tests and alternative tournaments can substitute their
/// own ordering; [`TiePolicy::default`] carries the production list.
#[derive(Debug, Clone)]
pub struct TiePolicy {
    favorites: Vec<String>,
}

impl TiePolicy {
    pub fn new(favorites: Vec<String>) -> Self {
        Self { favorites }
    }

    /// Rank of a method within the favorites, lower is better.
    /// Methods outside the list share the fallback rank 999.
    pub fn rank(&self, method_id: &str) -> usize {
        self.favorites
            .iter()
            .position(|f| f == method_id)
            .unwrap_or(UNRANKED)
    }

    /// Resolve a tie into a binding left/right outcome.
    ///
    /// If either compared method is favored, the better-ranked one wins.
    /// Otherwise the outcome is a deterministic draw seeded by the full
    /// trial tuple, so calling twice with identical arguments always
    /// returns the identical side. The scheduler relies on this when it
    /// re-resolves historical ties to infer a past champion.
    pub fn resolve(
        &self,
        participant_id: &str,
        component: &str,
        trial_id: i64,
        left_method_id: &str,
        right_method_id: &str,
    ) -> Side {
        let left_rank = self.rank(left_method_id);
        let right_rank = self.rank(right_method_id);

        if left_rank != UNRANKED || right_rank != UNRANKED {
            return if left_rank <= right_rank {
                Side::Left
            } else {
                Side::Right
            };
        }

        let seed = format!(
            "{}::{}::{}::{}::{}",
            participant_id, component, trial_id, left_method_id, right_method_id
        );
        let mut rng = SeededRng::from_seed_str(&seed);
        if rng.next_f64() < 0.5 {
            Side::Left
        } else {
            Side::Right
        }
    }
}

impl Default for TiePolicy {
    /// Production favorites, best first.
    fn default() -> Self {
        Self::new(vec![
            "hybrid".to_string(),
            "llm_multi".to_string(),
            "llm_single".to_string(),
        ])
    }
}
