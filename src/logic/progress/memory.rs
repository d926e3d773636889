//! Volatile Progression Store
//!
//! In-process table behind a parking_lot RwLock. Records carry an insertion
//! sequence number so leaderboard ties break deterministically.

use std::collections::HashMap;

use chrono::Utc;
use parking_lot::RwLock;

use crate::error::StoreError;
use super::types::{LeaderboardEntry, UserProgress};
use super::ProgressionStore;

struct Entry {
    progress: UserProgress,
    /// Creation order, used as the leaderboard tie-break
    seq: u64,
}

struct Inner {
    users: HashMap<String, Entry>,
    next_seq: u64,
}

/// In-memory `ProgressionStore` implementation
pub struct MemoryProgressionStore {
    inner: RwLock<Inner>,
}

impl MemoryProgressionStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                users: HashMap::new(),
                next_seq: 0,
            }),
        }
    }

    /// Number of known users
    pub fn user_count(&self) -> usize {
        self.inner.read().users.len()
    }
}

impl Default for MemoryProgressionStore {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure<'a>(inner: &'a mut Inner, user_id: &str) -> &'a mut Entry {
    let Inner { users, next_seq } = inner;
    users.entry(user_id.to_string()).or_insert_with(|| {
        let seq = *next_seq;
        *next_seq += 1;
        log::debug!("Creating progression record for user '{}'", user_id);
        Entry {
            progress: UserProgress::new(user_id),
            seq,
        }
    })
}

impl ProgressionStore for MemoryProgressionStore {
    fn get_or_create(&self, user_id: &str) -> Result<UserProgress, StoreError> {
        let mut inner = self.inner.write();
        Ok(ensure(&mut inner, user_id).progress.clone())
    }

    fn increment_score(&self, user_id: &str, delta: i64) -> Result<i64, StoreError> {
        let mut inner = self.inner.write();
        let entry = ensure(&mut inner, user_id);
        entry.progress.score = (entry.progress.score + delta).max(0);
        entry.progress.last_active = Utc::now();
        Ok(entry.progress.score)
    }

    fn set_streak(&self, user_id: &str, value: u32) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        let entry = ensure(&mut inner, user_id);
        entry.progress.streak = value;
        entry.progress.last_active = Utc::now();
        Ok(())
    }

    fn increment_total_correct(&self, user_id: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        let entry = ensure(&mut inner, user_id);
        entry.progress.total_correct += 1;
        entry.progress.last_active = Utc::now();
        Ok(())
    }

    fn award_badge(&self, user_id: &str, name: &str) -> Result<bool, StoreError> {
        let mut inner = self.inner.write();
        let entry = ensure(&mut inner, user_id);
        let inserted = entry.progress.badges.insert(name.to_string());
        if inserted {
            entry.progress.last_active = Utc::now();
            log::info!("User '{}' earned badge '{}'", user_id, name);
        }
        Ok(inserted)
    }

    fn leaderboard(&self, top_n: usize) -> Result<Vec<LeaderboardEntry>, StoreError> {
        let inner = self.inner.read();

        let mut rows: Vec<(&Entry, &str)> = inner
            .users
            .iter()
            .map(|(id, entry)| (entry, id.as_str()))
            .collect();

        // Score descending; creation order breaks ties deterministically
        rows.sort_by(|(a, _), (b, _)| {
            b.progress
                .score
                .cmp(&a.progress.score)
                .then(a.seq.cmp(&b.seq))
        });
        rows.truncate(top_n);

        Ok(rows
            .into_iter()
            .map(|(entry, id)| LeaderboardEntry {
                user_id: id.to_string(),
                score: entry.progress.score,
                streak: entry.progress.streak,
            })
            .collect())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_or_create_zeroed() {
        let store = MemoryProgressionStore::new();
        let user = store.get_or_create("u1").unwrap();
        assert_eq!(user.score, 0);
        assert_eq!(user.streak, 0);
        assert!(user.badges.is_empty());
        assert_eq!(store.user_count(), 1);

        // Second access returns the same record, not a fresh one
        store.increment_score("u1", 10).unwrap();
        assert_eq!(store.get_or_create("u1").unwrap().score, 10);
        assert_eq!(store.user_count(), 1);
    }

    #[test]
    fn test_score_never_negative() {
        let store = MemoryProgressionStore::new();
        assert_eq!(store.increment_score("u1", -50).unwrap(), 0);
        store.increment_score("u1", 7).unwrap();
        assert_eq!(store.increment_score("u1", -100).unwrap(), 0);
        assert_eq!(store.increment_score("u1", 3).unwrap(), 3);
    }

    #[test]
    fn test_streak_and_total_correct() {
        let store = MemoryProgressionStore::new();
        store.set_streak("u1", 4).unwrap();
        store.increment_total_correct("u1").unwrap();
        store.increment_total_correct("u1").unwrap();

        let user = store.get_or_create("u1").unwrap();
        assert_eq!(user.streak, 4);
        assert_eq!(user.total_correct, 2);

        store.set_streak("u1", 0).unwrap();
        assert_eq!(store.get_or_create("u1").unwrap().streak, 0);
        // Resetting the streak does not touch total_correct
        assert_eq!(store.get_or_create("u1").unwrap().total_correct, 2);
    }

    #[test]
    fn test_badge_idempotent_and_monotonic() {
        let store = MemoryProgressionStore::new();
        assert!(store.award_badge("u1", "Rare Candidate").unwrap());
        assert!(!store.award_badge("u1", "Rare Candidate").unwrap());

        let user = store.get_or_create("u1").unwrap();
        assert_eq!(user.badges.len(), 1);
        assert!(user.badges.contains("Rare Candidate"));
    }

    #[test]
    fn test_leaderboard_sorted_descending() {
        let store = MemoryProgressionStore::new();
        store.increment_score("low", 5).unwrap();
        store.increment_score("high", 100).unwrap();
        store.increment_score("mid", 50).unwrap();

        let board = store.leaderboard(10).unwrap();
        let ids: Vec<&str> = board.iter().map(|e| e.user_id.as_str()).collect();
        assert_eq!(ids, vec!["high", "mid", "low"]);
    }

    #[test]
    fn test_leaderboard_top_n_larger_than_population() {
        let store = MemoryProgressionStore::new();
        store.increment_score("a", 1).unwrap();
        store.increment_score("b", 2).unwrap();
        store.increment_score("c", 3).unwrap();

        let board = store.leaderboard(5).unwrap();
        assert_eq!(board.len(), 3);
        assert_eq!(board[0].user_id, "c");
        assert_eq!(board[2].user_id, "a");
    }

    #[test]
    fn test_leaderboard_tie_break_is_creation_order() {
        let store = MemoryProgressionStore::new();
        store.increment_score("first", 10).unwrap();
        store.increment_score("second", 10).unwrap();
        store.increment_score("third", 10).unwrap();

        for _ in 0..5 {
            let board = store.leaderboard(3).unwrap();
            let ids: Vec<&str> = board.iter().map(|e| e.user_id.as_str()).collect();
            assert_eq!(ids, vec!["first", "second", "third"]);
        }
    }

    #[test]
    fn test_leaderboard_zero() {
        let store = MemoryProgressionStore::new();
        store.increment_score("a", 1).unwrap();
        assert!(store.leaderboard(0).unwrap().is_empty());
    }
}
