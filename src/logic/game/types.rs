//! Game Boundary Types
//!
//! Read-only snapshots returned to callers. None of these are persisted as
//! their own entities.

use serde::{Deserialize, Serialize};

use crate::logic::dataset::LightCurve;

/// Health of the classifier update step for one guess.
///
/// The retraining step is deliberately kept out of the error taxonomy: a
/// failed model update is reported here, in the outcome, and never blocks
/// the guess result itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ModelHealth {
    /// The classifier absorbed the labeled example
    Updated,
    /// The update failed; the model is unchanged since before this guess
    UpdateFailed { reason: String },
}

impl ModelHealth {
    pub fn is_updated(&self) -> bool {
        matches!(self, ModelHealth::Updated)
    }
}

/// Composite result of one scored guess.
///
/// `ai_probability` is always the pre-update probability - the model's
/// opinion the player actually played against, before this guess was fed
/// back into training.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuessOutcome {
    pub is_correct: bool,
    pub ai_probability: f32,
    pub new_score: i64,
    pub streak: u32,
    pub level: String,
    pub badges: Vec<String>,
    pub total_correct: u64,
    pub model: ModelHealth,
}

/// Light curve as shown to the player; ground-truth labels are withheld
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LightCurveView {
    pub id: u32,
    pub time: Vec<f32>,
    pub flux: Vec<f32>,
    pub length: usize,
}

impl LightCurveView {
    pub fn of(lc: &LightCurve) -> Self {
        Self {
            id: lc.id,
            time: lc.time.clone(),
            flux: lc.flux.clone(),
            length: lc.len(),
        }
    }
}

/// Classifier opinion about one point, offered to the player as a hint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hint {
    pub ai_probability: f32,
    /// Hard 0/1 call at the 0.5 threshold
    pub ai_prediction: u8,
}
