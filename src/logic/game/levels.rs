//! Level Rules
//!
//! A level is derived purely from the current score: the highest tier whose
//! threshold does not exceed it. Tier labels and thresholds are
//! configuration, not logic.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// One level tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelTier {
    pub name: String,
    pub min_score: i64,
}

impl LevelTier {
    pub fn new(name: &str, min_score: i64) -> Self {
        Self { name: name.to_string(), min_score }
    }
}

static DEFAULT_LEVELS: Lazy<Vec<LevelTier>> = Lazy::new(|| {
    vec![
        LevelTier::new("Novice Seeker", 0),
        LevelTier::new("Certified Hunter", 500),
        LevelTier::new("Guild Master", 2500),
    ]
});

/// The default three-tier table
pub fn default_levels() -> Vec<LevelTier> {
    DEFAULT_LEVELS.clone()
}

/// Highest tier whose threshold does not exceed `score`.
///
/// `tiers` must be ordered by ascending `min_score`, with the base tier at 0.
pub fn compute_level(score: i64, tiers: &[LevelTier]) -> String {
    let mut current = tiers.first().map(|t| t.name.as_str()).unwrap_or("Unranked");
    for tier in tiers {
        if score >= tier.min_score {
            current = &tier.name;
        }
    }
    current.to_string()
}

// ============================================================================
// TESTS
// ============================================================================
