//! Model Snapshot Persistence
//!
//! Saves the classifier's trained state as JSON and loads it at process
//! start. Snapshots carry the feature layout version + hash; loading against
//! a different layout is refused. Persistence is optional - the classifier
//! works identically without it, starting cold.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants;
use crate::logic::features::layout::{
    layout_hash, validate_layout, LayoutMismatchError, FEATURE_COUNT, FEATURE_VERSION,
};
use super::classifier::OnlineClassifier;

const MODEL_FILE_NAME: &str = "model_v1.json";

/// Default snapshot path under the app data directory
pub fn default_model_path() -> PathBuf {
    constants::data_dir().join(MODEL_FILE_NAME)
}

// ============================================================================
// SNAPSHOT
// ============================================================================

/// Serialized classifier state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSnapshot {
    pub version: u8,
    pub layout_hash: u32,
    pub weights: Vec<f32>,
    pub bias: f32,
    pub learning_rate: f32,
    pub initialized: bool,
    pub updates: u64,
    pub saved_at: DateTime<Utc>,
}

impl ModelSnapshot {
    pub fn of(classifier: &OnlineClassifier) -> Self {
        Self {
            version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            weights: classifier.weights().to_vec(),
            bias: classifier.bias(),
            learning_rate: classifier.learning_rate(),
            initialized: classifier.is_initialized(),
            updates: classifier.updates(),
            saved_at: Utc::now(),
        }
    }

    pub fn into_classifier(self) -> OnlineClassifier {
        OnlineClassifier::from_parts(
            self.weights,
            self.bias,
            self.learning_rate,
            self.initialized,
            self.updates,
        )
    }
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ModelStorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error(transparent)]
    Layout(#[from] LayoutMismatchError),

    #[error("snapshot weight vector has {found} entries, expected {expected}")]
    WeightShape { found: usize, expected: usize },
}

// ============================================================================
// SAVE / LOAD
// ============================================================================

/// Save classifier state to disk
pub fn save_model(classifier: &OnlineClassifier, path: &Path) -> Result<(), ModelStorageError> {
    // Ensure directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let snapshot = ModelSnapshot::of(classifier);
    let json = serde_json::to_vec_pretty(&snapshot)?;
    fs::write(path, json)?;

    log::debug!("Saved model snapshot ({} updates) to {:?}", snapshot.updates, path);
    Ok(())
}

/// Load classifier state from disk with layout validation
pub fn load_model(path: &Path) -> Result<OnlineClassifier, ModelStorageError> {
    let data = fs::read(path)?;
    let snapshot: ModelSnapshot = serde_json::from_slice(&data)?;

    validate_layout(snapshot.version, snapshot.layout_hash)?;

    // A snapshot that passed layout validation must still carry one weight
    // per feature; anything else is a corrupt or hand-edited file
    if snapshot.weights.len() != FEATURE_COUNT {
        return Err(ModelStorageError::WeightShape {
            found: snapshot.weights.len(),
            expected: FEATURE_COUNT,
        });
    }

    log::info!(
        "Loaded model snapshot from {:?} ({} updates, saved {})",
        path,
        snapshot.updates,
        snapshot.saved_at
    );
    Ok(snapshot.into_classifier())
}

/// Load the snapshot if one exists, otherwise start cold.
///
/// An unreadable or incompatible snapshot is logged and ignored - a cold
/// classifier is always a safe starting point.
pub fn load_or_default(path: &Path) -> OnlineClassifier {
    if !path.exists() {
        log::info!("No model snapshot at {:?} - starting cold", path);
        return OnlineClassifier::new();
    }

    match load_model(path) {
        Ok(clf) => clf,
        Err(e) => {
            log::warn!("Ignoring model snapshot at {:?}: {}", path, e);
            OnlineClassifier::new()
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const FLUX: [f32; 6] = [1.0, 0.99, 0.52, 0.98, 1.01, 1.0];

    #[test]
    fn test_snapshot_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("model.json");

        let mut clf = OnlineClassifier::new();
        for _ in 0..10 {
            clf.partial_fit(&FLUX, 2, 1).unwrap();
        }
        let expected = clf.predict_proba(&FLUX, 2).unwrap();

        save_model(&clf, &path).unwrap();
        let loaded = load_model(&path).unwrap();

        assert!(loaded.is_initialized());
        assert_eq!(loaded.updates(), 10);
        assert_eq!(loaded.predict_proba(&FLUX, 2).unwrap(), expected);
    }

    #[test]
    fn test_load_rejects_layout_mismatch() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("model.json");

        let clf = OnlineClassifier::new();
        let mut snapshot = ModelSnapshot::of(&clf);
        snapshot.version += 1;
        fs::write(&path, serde_json::to_vec(&snapshot).unwrap()).unwrap();

        assert!(matches!(load_model(&path), Err(ModelStorageError::Layout(_))));
    }

    #[test]
    fn test_load_rejects_wrong_weight_count() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("model.json");

        let mut snapshot = ModelSnapshot::of(&OnlineClassifier::new());
        snapshot.weights.pop();
        fs::write(&path, serde_json::to_vec(&snapshot).unwrap()).unwrap();

        assert!(matches!(
            load_model(&path),
            Err(ModelStorageError::WeightShape { found: 3, expected: 4 })
        ));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let temp = TempDir::new().unwrap();
        let clf = load_or_default(&temp.path().join("missing.json"));
        assert!(!clf.is_initialized());
        assert_eq!(clf.predict_proba(&FLUX, 0).unwrap(), 0.5);
    }

    #[test]
    fn test_load_or_default_corrupt_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("model.json");
        fs::write(&path, b"not json").unwrap();

        let clf = load_or_default(&path);
        assert!(!clf.is_initialized());
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("dir").join("model.json");
        save_model(&OnlineClassifier::new(), &path).unwrap();
        assert!(path.exists());
    }
}
