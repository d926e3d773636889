//! Progression Record Types

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-user progression record.
///
/// Fixed fields only - anything new gets a named, typed field here, never an
/// open map. Created zeroed on first reference; mutated only through
/// `ProgressionStore` operations; never deleted by the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProgress {
    pub user_id: String,
    /// Total score, clamped at 0 by the store
    pub score: i64,
    /// Consecutive correct guesses; resets to 0 on any miss
    pub streak: u32,
    /// Lifetime count of correct guesses; never decreases
    pub total_correct: u64,
    /// Awarded badges; monotonically non-decreasing
    pub badges: BTreeSet<String>,
    pub last_active: DateTime<Utc>,
}

impl UserProgress {
    /// Zeroed record for a first-seen user
    pub fn new(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            score: 0,
            streak: 0,
            total_correct: 0,
            badges: BTreeSet::new(),
            last_active: Utc::now(),
        }
    }
}

/// One leaderboard row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub user_id: String,
    pub score: i64,
    pub streak: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_is_zeroed() {
        let user = UserProgress::new("u1");
        assert_eq!(user.user_id, "u1");
        assert_eq!(user.score, 0);
        assert_eq!(user.streak, 0);
        assert_eq!(user.total_correct, 0);
        assert!(user.badges.is_empty());
    }
}
