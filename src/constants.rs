//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! To change default scoring parameters, only edit this file.

use std::path::PathBuf;

/// App name (used for the data directory)
pub const APP_NAME: &str = "transit-hunt";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Points gained per correct guess, multiplied by the current streak
pub const DEFAULT_BASE_POINTS: i64 = 10;

/// Points lost per incorrect guess (score floors at 0)
pub const DEFAULT_PENALTY: i64 = 5;

/// Default leaderboard size
pub const DEFAULT_LEADERBOARD_SIZE: usize = 10;

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get base points from environment or use default
pub fn get_base_points() -> i64 {
    std::env::var("TRANSIT_BASE_POINTS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_BASE_POINTS)
}

/// Get penalty from environment or use default
pub fn get_penalty() -> i64 {
    std::env::var("TRANSIT_PENALTY")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_PENALTY)
}

/// Get dataset path from environment, if set
pub fn get_dataset_path() -> Option<PathBuf> {
    std::env::var("TRANSIT_DATASET").ok().map(PathBuf::from)
}

/// Get SQLite database path from environment, if set.
/// Unset means the volatile in-memory progression store is used.
pub fn get_db_path() -> Option<PathBuf> {
    std::env::var("TRANSIT_DB").ok().map(PathBuf::from)
}

/// App data directory (model snapshots, default database location)
pub fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}
