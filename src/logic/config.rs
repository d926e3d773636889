//! Game Configuration
//!
//! Values only - scoring constants, level thresholds, badge rules, optional
//! model snapshot path. Can be loaded from a config file or built from env.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants;
use super::game::badges::{default_badge_rules, BadgeRule};
use super::game::levels::{default_levels, LevelTier};

/// Configuration surface of the scoring engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Points per correct guess, multiplied by the new streak
    pub base_points: i64,
    /// Points lost per incorrect guess (score floors at 0)
    pub penalty: i64,
    /// Level tiers, ordered by ascending minimum score
    pub levels: Vec<LevelTier>,
    /// Badge rules, each evaluated independently after every reward
    pub badge_rules: Vec<BadgeRule>,
    /// Where to snapshot the classifier after updates; None disables
    /// persistence
    pub model_path: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            base_points: constants::DEFAULT_BASE_POINTS,
            penalty: constants::DEFAULT_PENALTY,
            levels: default_levels(),
            badge_rules: default_badge_rules(),
            model_path: None,
        }
    }
}

impl GameConfig {
    /// Defaults with scoring constants overridable from the environment
    pub fn from_env() -> Self {
        Self {
            base_points: constants::get_base_points(),
            penalty: constants::get_penalty(),
            ..Default::default()
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
