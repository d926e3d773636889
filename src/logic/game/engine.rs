//! Scoring Engine - Guess Orchestration
//!
//! Ties one player click to the whole pipeline, in strict stage order:
//!
//! Validate → Predict → Judge → Reward → Persist-Progression →
//! Retrain-Classifier → Respond
//!
//! Validation failures abort before any mutation. The classifier update is
//! the last mutating stage and is warning-only: its failure never changes
//! the outcome already computed.
//!
//! Concurrency: guesses by different users run in parallel. A per-user lock
//! serializes same-user guesses end to end so partial progression updates
//! never interleave. The classifier sits behind one RwLock shared by all
//! users - writers exclude each other, readers may see a slightly stale
//! model.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::error::{GameError, GameResult};
use crate::logic::config::GameConfig;
use crate::logic::dataset::{DatasetProvider, LightCurve};
use crate::logic::features::ExtractError;
use crate::logic::model::{self, OnlineClassifier};
use crate::logic::progress::{LeaderboardEntry, ProgressionStore};

use super::levels::compute_level;
use super::types::{GuessOutcome, Hint, LightCurveView, ModelHealth};

/// The adaptive scoring engine
pub struct GameEngine {
    dataset: Arc<dyn DatasetProvider>,
    store: Arc<dyn ProgressionStore>,
    /// One classifier for the whole system, shared across users
    classifier: Arc<RwLock<OnlineClassifier>>,
    /// Per-user guards serializing same-user guesses
    user_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    config: GameConfig,
}

impl GameEngine {
    /// Build an engine; the classifier starts from the configured snapshot
    /// when one exists, cold otherwise.
    pub fn new(
        dataset: Arc<dyn DatasetProvider>,
        store: Arc<dyn ProgressionStore>,
        config: GameConfig,
    ) -> Self {
        let classifier = match &config.model_path {
            Some(path) => model::load_or_default(path),
            None => OnlineClassifier::new(),
        };
        Self::with_classifier(dataset, store, classifier, config)
    }

    pub fn with_classifier(
        dataset: Arc<dyn DatasetProvider>,
        store: Arc<dyn ProgressionStore>,
        classifier: OnlineClassifier,
        config: GameConfig,
    ) -> Self {
        Self {
            dataset,
            store,
            classifier: Arc::new(RwLock::new(classifier)),
            user_locks: Mutex::new(HashMap::new()),
            config,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    // ========================================================================
    // BOUNDARY OPERATIONS
    // ========================================================================

    /// Light curve for display; a random one when no id is given.
    /// Ground-truth labels are withheld.
    pub fn get_lightcurve_view(&self, id: Option<u32>) -> GameResult<LightCurveView> {
        let id = match id {
            Some(id) => id,
            None => self
                .dataset
                .sample_random_id()
                .ok_or_else(|| GameError::Dataset("dataset is empty".to_string()))?,
        };
        let lc = self.dataset.get_lightcurve(id)?;
        Ok(LightCurveView::of(&lc))
    }

    /// Classifier opinion about one point. Read-only.
    pub fn get_hint(&self, id: u32, index: usize) -> GameResult<Hint> {
        let lc = self.dataset.get_lightcurve(id)?;
        let clf = self.classifier.read();
        Ok(Hint {
            ai_probability: clf
                .predict_proba(&lc.flux, index)
                .map_err(|e| range_err(&lc, e))?,
            ai_prediction: clf.predict(&lc.flux, index).map_err(|e| range_err(&lc, e))?,
        })
    }

    /// Score one guess end to end
    pub fn submit_guess(&self, user_id: &str, id: u32, index: usize) -> GameResult<GuessOutcome> {
        // Validate - fail fast, nothing mutated yet
        let lc = self.dataset.get_lightcurve(id)?;
        if index >= lc.len() {
            return Err(GameError::OutOfRange { id, index, len: lc.len() });
        }

        // Same-user guesses are processed one at a time, in arrival order
        let guard = self.user_lock(user_id);
        let _held = guard.lock();

        // Predict - the pre-update probability reported in the outcome
        let ai_probability = self.predict(&lc, index)?;

        // Judge
        let is_correct = lc.label[index] != 0;

        // Reward
        let before = self.store.get_or_create(user_id)?;
        let (new_streak, new_score) = if is_correct {
            let streak = before.streak + 1;
            self.store.set_streak(user_id, streak)?;
            let gained = self.config.base_points * streak as i64;
            let score = self.store.increment_score(user_id, gained)?;
            self.store.increment_total_correct(user_id)?;
            (streak, score)
        } else {
            self.store.set_streak(user_id, 0)?;
            let score = self.store.increment_score(user_id, -self.config.penalty)?;
            (0, score)
        };

        // Level / badge evaluation over the rewarded record
        let mut user = self.store.get_or_create(user_id)?;
        let level = compute_level(user.score, &self.config.levels);
        for rule in &self.config.badge_rules {
            if rule.matches(&user) && self.store.award_badge(user_id, &rule.name)? {
                user.badges.insert(rule.name.clone());
            }
        }

        // Retrain - human label feeds the shared model; warning-only
        let model = self.retrain(&lc, index, is_correct as u8);

        log::info!(
            "Guess by '{}' on lc {} idx {}: correct={}, score {} -> {}, streak {}",
            user_id,
            id,
            index,
            is_correct,
            before.score,
            new_score,
            new_streak
        );

        // Respond
        Ok(GuessOutcome {
            is_correct,
            ai_probability,
            new_score,
            streak: new_streak,
            level,
            badges: user.badges.iter().cloned().collect(),
            total_correct: user.total_correct,
            model,
        })
    }

    /// Ranked users by score, delegated to the store
    pub fn leaderboard(&self, top_n: usize) -> GameResult<Vec<LeaderboardEntry>> {
        Ok(self.store.leaderboard(top_n)?)
    }

    // ========================================================================
    // INTERNALS
    // ========================================================================

    fn predict(&self, lc: &LightCurve, index: usize) -> GameResult<f32> {
        self.classifier
            .read()
            .predict_proba(&lc.flux, index)
            .map_err(|e| range_err(lc, e))
    }

    fn retrain(&self, lc: &LightCurve, index: usize, label: u8) -> ModelHealth {
        let mut clf = self.classifier.write();
        match clf.partial_fit(&lc.flux, index, label) {
            Ok(()) => {
                if let Some(path) = &self.config.model_path {
                    if let Err(e) = model::save_model(&clf, path) {
                        log::warn!("Model snapshot save failed: {}", e);
                    }
                }
                ModelHealth::Updated
            }
            Err(e) => {
                log::warn!(
                    "Classifier update failed for lc {} idx {}: {} - scoring unaffected",
                    lc.id,
                    index,
                    e
                );
                ModelHealth::UpdateFailed { reason: e.to_string() }
            }
        }
    }

    fn user_lock(&self, user_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.user_locks.lock();
        locks
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

fn range_err(lc: &LightCurve, e: ExtractError) -> GameError {
    GameError::OutOfRange { id: lc.id, index: e.index, len: e.len }
}

// ============================================================================
// TESTS
// ============================================================================
