//! Durable Progression Store - SQLite
//!
//! Same observable contract as the volatile store, backed by two tables.
//! `rowid` of `user_progress` doubles as the creation-order tie-break for
//! the leaderboard; badge idempotency is `INSERT OR IGNORE` on a composite
//! primary key.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection};

use crate::error::StoreError;
use super::types::{LeaderboardEntry, UserProgress};
use super::ProgressionStore;

/// SQLite-backed `ProgressionStore` implementation
pub struct SqliteProgressionStore {
    conn: Mutex<Connection>,
}

impl SqliteProgressionStore {
    /// Open (or create) the database at `path`
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| StoreError::Backend(format!("cannot create db directory: {}", e)))?;
        }

        let conn = Connection::open(path)?;
        init_schema(&conn)?;
        log::info!("Opened progression database at {:?}", path);

        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Fully in-memory database (tests, ephemeral sessions)
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Self { conn: Mutex::new(conn) })
    }
}

fn init_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS user_progress (
            user_id        TEXT PRIMARY KEY,
            score          INTEGER NOT NULL DEFAULT 0,
            streak         INTEGER NOT NULL DEFAULT 0,
            total_correct  INTEGER NOT NULL DEFAULT 0,
            last_active    TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS user_badges (
            user_id    TEXT NOT NULL,
            badge      TEXT NOT NULL,
            awarded_at TEXT NOT NULL,
            PRIMARY KEY (user_id, badge)
        );",
    )?;
    Ok(())
}

/// Insert a zeroed row if the user is unknown
fn ensure_user(conn: &Connection, user_id: &str) -> Result<(), StoreError> {
    conn.execute(
        "INSERT OR IGNORE INTO user_progress (user_id, score, streak, total_correct, last_active)
         VALUES (?1, 0, 0, 0, ?2)",
        params![user_id, Utc::now().to_rfc3339()],
    )?;
    Ok(())
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Backend(format!("bad timestamp '{}': {}", raw, e)))
}

impl ProgressionStore for SqliteProgressionStore {
    fn get_or_create(&self, user_id: &str) -> Result<UserProgress, StoreError> {
        let conn = self.conn.lock();
        ensure_user(&conn, user_id)?;

        let (score, streak, total_correct, last_active): (i64, i64, i64, String) = conn.query_row(
            "SELECT score, streak, total_correct, last_active
             FROM user_progress WHERE user_id = ?1",
            params![user_id],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
        )?;

        let mut stmt = conn.prepare(
            "SELECT badge FROM user_badges WHERE user_id = ?1 ORDER BY badge",
        )?;
        let badges = stmt
            .query_map(params![user_id], |row| row.get::<_, String>(0))?
            .collect::<Result<_, _>>()?;

        Ok(UserProgress {
            user_id: user_id.to_string(),
            score,
            streak: streak as u32,
            total_correct: total_correct as u64,
            badges,
            last_active: parse_timestamp(&last_active)?,
        })
    }

    fn increment_score(&self, user_id: &str, delta: i64) -> Result<i64, StoreError> {
        let conn = self.conn.lock();
        ensure_user(&conn, user_id)?;

        conn.execute(
            "UPDATE user_progress
             SET score = MAX(0, score + ?2), last_active = ?3
             WHERE user_id = ?1",
            params![user_id, delta, Utc::now().to_rfc3339()],
        )?;

        let score = conn.query_row(
            "SELECT score FROM user_progress WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(score)
    }

    fn set_streak(&self, user_id: &str, value: u32) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        ensure_user(&conn, user_id)?;
        conn.execute(
            "UPDATE user_progress SET streak = ?2, last_active = ?3 WHERE user_id = ?1",
            params![user_id, value as i64, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn increment_total_correct(&self, user_id: &str) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        ensure_user(&conn, user_id)?;
        conn.execute(
            "UPDATE user_progress
             SET total_correct = total_correct + 1, last_active = ?2
             WHERE user_id = ?1",
            params![user_id, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn award_badge(&self, user_id: &str, name: &str) -> Result<bool, StoreError> {
        let conn = self.conn.lock();
        ensure_user(&conn, user_id)?;

        let now = Utc::now().to_rfc3339();
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO user_badges (user_id, badge, awarded_at) VALUES (?1, ?2, ?3)",
            params![user_id, name, now],
        )?;

        if inserted > 0 {
            conn.execute(
                "UPDATE user_progress SET last_active = ?2 WHERE user_id = ?1",
                params![user_id, now],
            )?;
            log::info!("User '{}' earned badge '{}'", user_id, name);
        }
        Ok(inserted > 0)
    }

    fn leaderboard(&self, top_n: usize) -> Result<Vec<LeaderboardEntry>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT user_id, score, streak FROM user_progress
             ORDER BY score DESC, rowid ASC LIMIT ?1",
        )?;

        let rows = stmt
            .query_map(params![top_n as i64], |row| {
                Ok(LeaderboardEntry {
                    user_id: row.get(0)?,
                    score: row.get(1)?,
                    streak: row.get::<_, i64>(2)? as u32,
                })
            })?
            .collect::<Result<_, _>>()?;
        Ok(rows)
    }
}

// ============================================================================
// TESTS
// ============================================================================
