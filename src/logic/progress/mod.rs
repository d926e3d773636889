//! Progress Module - Per-User Progression Store
//!
//! Pluggable backing storage behind one contract: a volatile in-process
//! table for tests and demos, SQLite for durability. Callers depend only on
//! the `ProgressionStore` trait, never on backend identity.

pub mod memory;
pub mod sqlite;
pub mod types;

pub use memory::MemoryProgressionStore;
pub use sqlite::SqliteProgressionStore;
pub use types::{LeaderboardEntry, UserProgress};

use crate::error::StoreError;

/// Capability interface for progression storage.
///
/// Every operation is observably atomic per user record. Invariants the
/// implementations uphold:
/// - score never drops below 0 (`increment_score` clamps)
/// - badge sets only grow; re-awarding is a no-op
/// - leaderboard order is deterministic: score descending, ties broken by
///   creation order, so repeated queries over unchanged data agree
pub trait ProgressionStore: Send + Sync {
    /// Fetch the user's record, creating a zeroed one on first access
    fn get_or_create(&self, user_id: &str) -> Result<UserProgress, StoreError>;

    /// Apply a score delta; the new score is `max(0, old + delta)` and is
    /// returned
    fn increment_score(&self, user_id: &str, delta: i64) -> Result<i64, StoreError>;

    /// Overwrite the streak counter
    fn set_streak(&self, user_id: &str, value: u32) -> Result<(), StoreError>;

    /// Bump the lifetime correct-guess counter by one
    fn increment_total_correct(&self, user_id: &str) -> Result<(), StoreError>;

    /// Award a badge idempotently; returns true only when newly inserted
    fn award_badge(&self, user_id: &str, name: &str) -> Result<bool, StoreError>;

    /// Top-N users by score (descending; creation-order tie-break)
    fn leaderboard(&self, top_n: usize) -> Result<Vec<LeaderboardEntry>, StoreError>;
}
