//! Error handling
//!
//! Central error taxonomy for the scoring core.
//!
//! Propagation policy: `NotFound` and `OutOfRange` abort a guess before any
//! state mutation. `Store` errors are hard failures - progression cannot be
//! trusted afterwards. Classifier update failures are NOT part of this
//! taxonomy: they travel through `ModelHealth` in the guess outcome and
//! never abort the scoring flow.

use thiserror::Error;

pub type GameResult<T> = Result<T, GameError>;

/// Errors surfaced to callers of the boundary operations
#[derive(Debug, Error)]
pub enum GameError {
    /// Unknown light-curve identifier
    #[error("light curve {0} not found")]
    NotFound(u32),

    /// Click index outside the light curve bounds
    #[error("click index {index} out of range for light curve {id} (length {len})")]
    OutOfRange { id: u32, index: usize, len: usize },

    /// Progression backend unavailable or inconsistent
    #[error("progression store failure: {0}")]
    Store(#[from] StoreError),

    /// Dataset could not be loaded or is malformed
    #[error("dataset error: {0}")]
    Dataset(String),
}

/// Progression store backend errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("store backend error: {0}")]
    Backend(String),
}
