//! Badge Rules
//!
//! Independent predicates over the user's current record. Each rule is
//! checked after every reward and awarded through the store's idempotent
//! `award_badge`; badges are permanent.

use serde::{Deserialize, Serialize};

use crate::logic::progress::UserProgress;

/// Predicate kinds a badge rule can use
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BadgeCondition {
    /// Current streak reached N
    StreakAtLeast(u32),
    /// Lifetime correct guesses reached M
    TotalCorrectAtLeast(u64),
}

/// One badge rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BadgeRule {
    pub name: String,
    pub condition: BadgeCondition,
}

impl BadgeRule {
    pub fn new(name: &str, condition: BadgeCondition) -> Self {
        Self { name: name.to_string(), condition }
    }

    /// Does the user's current record satisfy this rule?
    pub fn matches(&self, user: &UserProgress) -> bool {
        match self.condition {
            BadgeCondition::StreakAtLeast(min) => user.streak >= min,
            BadgeCondition::TotalCorrectAtLeast(min) => user.total_correct >= min,
        }
    }
}

/// Default badge table
pub fn default_badge_rules() -> Vec<BadgeRule> {
    vec![
        BadgeRule::new("Rare Candidate", BadgeCondition::StreakAtLeast(7)),
        BadgeRule::new("Consistent", BadgeCondition::TotalCorrectAtLeast(50)),
    ]
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_streak_rule() {
        let rule = BadgeRule::new("Rare Candidate", BadgeCondition::StreakAtLeast(7));
        let mut user = UserProgress::new("u1");

        user.streak = 6;
        assert!(!rule.matches(&user));

        user.streak = 7;
        assert!(rule.matches(&user));

        user.streak = 12;
        assert!(rule.matches(&user));
    }

    #[test]
    fn test_total_correct_rule() {
        let rule = BadgeRule::new("Consistent", BadgeCondition::TotalCorrectAtLeast(50));
        let mut user = UserProgress::new("u1");

        user.total_correct = 49;
        assert!(!rule.matches(&user));

        user.total_correct = 50;
        assert!(rule.matches(&user));
    }

    #[test]
    fn test_rules_are_independent() {
        let rules = default_badge_rules();
        let mut user = UserProgress::new("u1");
        user.streak = 10;
        user.total_correct = 3;

        let matched: Vec<&str> = rules
            .iter()
            .filter(|r| r.matches(&user))
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(matched, vec!["Rare Candidate"]);
    }
}
