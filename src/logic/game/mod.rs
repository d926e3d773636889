//! Game Layer
//!
//! Rules (levels, badges), boundary types, and the scoring engine that
//! orchestrates a guess end to end.

pub mod badges;
pub mod engine;
pub mod levels;
pub mod types;

pub use badges::{default_badge_rules, BadgeCondition, BadgeRule};
pub use engine::GameEngine;
pub use levels::{compute_level, default_levels, LevelTier};
pub use types::{GuessOutcome, Hint, LightCurveView, ModelHealth};
