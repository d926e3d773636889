//! Transit Hunt Core - Adaptive Scoring Engine
//!
//! Human-in-the-loop labeling game core: a player clicks a point on a light
//! curve, the engine judges the guess against ground truth, updates the
//! player's progression and incrementally retrains a shared classifier from
//! the labeled example.
//!
//! ## Architecture
//! - `logic/features` - Feature extraction from a clicked time-series point
//! - `logic/model` - Online binary classifier (cold start, partial_fit)
//! - `logic/progress` - Per-user progression store (volatile or SQLite)
//! - `logic/dataset` - Light-curve provider
//! - `logic/game` - Scoring engine, level and badge rules

pub mod constants;
pub mod error;
pub mod logic;

pub use error::{GameError, StoreError};
pub use logic::config::GameConfig;
pub use logic::game::engine::GameEngine;
