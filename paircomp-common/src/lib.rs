//! # Paircomp Common Library
//!
//! Shared code for the pairwise comparison survey:
//! - Pair scheduling (champion-challenger tournament)
//! - Tie resolution policy and deterministic randomness
//! - Vote log reconciliation (offline cache vs server)
//! - Vote identity and preference normalization
//! - Survey manifest and per-method content loading
//! - Database models and initialization
//! - Session token utilities
//! - Configuration loading

pub mod api;
pub mod config;
pub mod content;
pub mod db;
pub mod error;
pub mod manifest;
pub mod prng;
pub mod reconcile;
pub mod schedule;
pub mod tie;
pub mod time;
pub mod vote;

pub use error::{Error, Result};
pub use tie::TiePolicy;
pub use vote::{make_vote_id, Preference, Side};
