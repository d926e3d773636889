//! Online Classifier - Incremental Logistic Regression
//!
//! One shared binary classifier for the whole system, trained one labeled
//! example at a time as players submit guesses. Two states:
//! `Uninitialized` (cold start, neutral 0.5 probability) and `Trained`
//! (after the first partial_fit, which also fixes the {0,1} label domain).
//!
//! Updates are compute-then-commit: a gradient step that produces a
//! non-finite weight is discarded and the previous state stays in effect.

use ndarray::{aview1, Array1};

use crate::logic::features::{extract, ExtractError, FEATURE_COUNT};

/// Default SGD learning rate
pub const DEFAULT_LEARNING_RATE: f32 = 0.05;

/// Probability reported before any training example has been seen
pub const COLD_START_PROBA: f32 = 0.5;

// ============================================================================
// ERROR HANDLING
// ============================================================================

/// Non-fatal classifier update failure.
///
/// Reported through `ModelHealth` in the guess outcome; never aborts scoring.
#[derive(Debug)]
pub struct ModelUpdateError(pub String);

impl std::fmt::Display for ModelUpdateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ModelUpdateError: {}", self.0)
    }
}

impl std::error::Error for ModelUpdateError {}

impl From<ExtractError> for ModelUpdateError {
    fn from(e: ExtractError) -> Self {
        ModelUpdateError(e.to_string())
    }
}

// ============================================================================
// CLASSIFIER
// ============================================================================

/// Online logistic regression over the point feature vector
#[derive(Debug, Clone)]
pub struct OnlineClassifier {
    weights: Array1<f32>,
    bias: f32,
    learning_rate: f32,
    initialized: bool,
    updates: u64,
}

impl OnlineClassifier {
    pub fn new() -> Self {
        Self::with_learning_rate(DEFAULT_LEARNING_RATE)
    }

    pub fn with_learning_rate(learning_rate: f32) -> Self {
        Self {
            weights: Array1::zeros(FEATURE_COUNT),
            bias: 0.0,
            learning_rate,
            initialized: false,
            updates: 0,
        }
    }

    /// Rebuild a classifier from persisted state (see `storage.rs`)
    pub(crate) fn from_parts(
        weights: Vec<f32>,
        bias: f32,
        learning_rate: f32,
        initialized: bool,
        updates: u64,
    ) -> Self {
        let mut w = Array1::zeros(FEATURE_COUNT);
        for (i, v) in weights.into_iter().take(FEATURE_COUNT).enumerate() {
            w[i] = v;
        }
        Self { weights: w, bias, learning_rate, initialized, updates }
    }

    /// Has the first training example been seen?
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Number of successful incremental updates
    pub fn updates(&self) -> u64 {
        self.updates
    }

    pub fn learning_rate(&self) -> f32 {
        self.learning_rate
    }

    pub(crate) fn weights(&self) -> &Array1<f32> {
        &self.weights
    }

    pub(crate) fn bias(&self) -> f32 {
        self.bias
    }

    /// Estimated probability that `flux[index]` is a transit point.
    ///
    /// Returns exactly `COLD_START_PROBA` while uninitialized - there is no
    /// data yet to discriminate with. Read-only.
    pub fn predict_proba(&self, flux: &[f32], index: usize) -> Result<f32, ExtractError> {
        let features = extract(flux, index)?;

        if !self.initialized {
            return Ok(COLD_START_PROBA);
        }

        let z = self.weights.dot(&aview1(&features.values)) + self.bias;
        Ok(sigmoid(z))
    }

    /// Hard 0/1 prediction at the conventional 0.5 threshold
    pub fn predict(&self, flux: &[f32], index: usize) -> Result<u8, ExtractError> {
        let p = self.predict_proba(flux, index)?;
        Ok(if p >= 0.5 { 1 } else { 0 })
    }

    /// One incremental gradient step against `(features(flux, index), label)`.
    ///
    /// The first successful call transitions the classifier to its trained
    /// state and fixes the label domain to {0, 1}; every later call is
    /// checked against that domain. On any failure the previous weights
    /// remain in effect.
    pub fn partial_fit(&mut self, flux: &[f32], index: usize, label: u8) -> Result<(), ModelUpdateError> {
        if label > 1 {
            return Err(ModelUpdateError(format!(
                "label {} outside the fixed {{0,1}} domain",
                label
            )));
        }

        let features = extract(flux, index)?;
        if !features.is_finite() {
            return Err(ModelUpdateError("non-finite feature vector".to_string()));
        }

        let x = aview1(&features.values);
        let z = self.weights.dot(&x) + self.bias;
        let p = sigmoid(z);

        // Log-loss gradient for a single example
        let g = p - label as f32;

        let mut new_weights = self.weights.clone();
        new_weights.scaled_add(-(self.learning_rate * g), &x);
        let new_bias = self.bias - self.learning_rate * g;

        if !new_bias.is_finite() || new_weights.iter().any(|w| !w.is_finite()) {
            return Err(ModelUpdateError("update produced non-finite parameters".to_string()));
        }

        // Commit
        self.weights = new_weights;
        self.bias = new_bias;
        self.initialized = true;
        self.updates += 1;

        log::debug!(
            "partial_fit #{}: label={}, p_before={:.3}",
            self.updates,
            label,
            p
        );

        Ok(())
    }
}

impl Default for OnlineClassifier {
    fn default() -> Self {
        Self::new()
    }
}

fn sigmoid(z: f32) -> f32 {
    1.0 / (1.0 + (-z).exp())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const FLUX: [f32; 8] = [1.0, 0.99, 1.01, 0.55, 0.98, 1.02, 1.0, 0.97];

    #[test]
    fn test_cold_start_returns_exactly_half() {
        let clf = OnlineClassifier::new();
        for index in 0..FLUX.len() {
            assert_eq!(clf.predict_proba(&FLUX, index).unwrap(), 0.5);
        }
        assert!(!clf.is_initialized());
    }

    #[test]
    fn test_first_fit_initializes() {
        let mut clf = OnlineClassifier::new();
        clf.partial_fit(&FLUX, 3, 1).unwrap();
        assert!(clf.is_initialized());
        assert_eq!(clf.updates(), 1);
    }

    #[test]
    fn test_repeated_fits_move_probability_toward_label() {
        let mut clf = OnlineClassifier::new();
        for _ in 0..200 {
            clf.partial_fit(&FLUX, 3, 1).unwrap();
        }
        let p = clf.predict_proba(&FLUX, 3).unwrap();
        assert!(p > 0.5, "probability {} should exceed 0.5 after positive fits", p);

        let mut clf = OnlineClassifier::new();
        for _ in 0..200 {
            clf.partial_fit(&FLUX, 3, 0).unwrap();
        }
        let p = clf.predict_proba(&FLUX, 3).unwrap();
        assert!(p < 0.5, "probability {} should drop below 0.5 after negative fits", p);
    }

    #[test]
    fn test_probability_stays_in_unit_interval() {
        let mut clf = OnlineClassifier::new();
        for i in 0..FLUX.len() {
            clf.partial_fit(&FLUX, i, (i % 2) as u8).unwrap();
            let p = clf.predict_proba(&FLUX, i).unwrap();
            assert!((0.0..=1.0).contains(&p));
        }
    }

    #[test]
    fn test_predict_thresholds_at_half() {
        // Cold start sits exactly on the threshold and rounds up
        let clf = OnlineClassifier::new();
        assert_eq!(clf.predict(&FLUX, 3).unwrap(), 1);

        let mut clf = OnlineClassifier::new();
        for _ in 0..200 {
            clf.partial_fit(&FLUX, 3, 0).unwrap();
        }
        assert!(clf.predict_proba(&FLUX, 3).unwrap() < 0.5);
        assert_eq!(clf.predict(&FLUX, 3).unwrap(), 0);
    }

    #[test]
    fn test_label_outside_domain_rejected() {
        let mut clf = OnlineClassifier::new();
        let err = clf.partial_fit(&FLUX, 0, 2).unwrap_err();
        assert!(err.0.contains("label"));
        // Failed update must not initialize
        assert!(!clf.is_initialized());
        assert_eq!(clf.updates(), 0);
    }

    #[test]
    fn test_non_finite_input_leaves_state_untouched() {
        let mut clf = OnlineClassifier::new();
        clf.partial_fit(&FLUX, 3, 1).unwrap();
        let weights_before = clf.weights().clone();
        let updates_before = clf.updates();

        let bad = [1.0, f32::NAN, 0.9, 1.0];
        assert!(clf.partial_fit(&bad, 1, 1).is_err());

        assert_eq!(clf.weights(), &weights_before);
        assert_eq!(clf.updates(), updates_before);
    }

    #[test]
    fn test_out_of_range_index_fails_fit() {
        let mut clf = OnlineClassifier::new();
        assert!(clf.partial_fit(&FLUX, FLUX.len(), 1).is_err());
        assert!(!clf.is_initialized());
    }
}
