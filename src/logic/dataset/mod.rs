//! Dataset Module - Light-Curve Provider
//!
//! The scoring core only reads light curves; loading and ownership live
//! here, behind the `DatasetProvider` capability interface. Curves are
//! immutable once loaded.

pub mod loader;

pub use loader::{load_jsonl, InMemoryDataset};

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, GameResult};

/// One light curve: parallel time / flux / label sequences of equal length.
/// `label` is per-sample ground truth (1 = transit point).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LightCurve {
    pub id: u32,
    pub time: Vec<f32>,
    pub flux: Vec<f32>,
    pub label: Vec<u8>,
}

impl LightCurve {
    pub fn len(&self) -> usize {
        self.flux.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flux.is_empty()
    }

    /// Shape check: non-empty, parallel sequences, binary labels
    pub fn validate(&self) -> GameResult<()> {
        if self.flux.is_empty() {
            return Err(GameError::Dataset(format!("light curve {} is empty", self.id)));
        }
        if self.time.len() != self.flux.len() || self.label.len() != self.flux.len() {
            return Err(GameError::Dataset(format!(
                "light curve {}: time/flux/label lengths differ ({}/{}/{})",
                self.id,
                self.time.len(),
                self.flux.len(),
                self.label.len()
            )));
        }
        if self.label.iter().any(|&l| l > 1) {
            return Err(GameError::Dataset(format!(
                "light curve {}: labels must be 0 or 1",
                self.id
            )));
        }
        Ok(())
    }
}

/// Read-only light-curve source consumed by the scoring engine
pub trait DatasetProvider: Send + Sync {
    /// Fetch a curve by id; `NotFound` for an unknown id
    fn get_lightcurve(&self, id: u32) -> GameResult<Arc<LightCurve>>;

    /// Pick a random curve id, `None` when the dataset is empty
    fn sample_random_id(&self) -> Option<u32>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_well_formed_curve() {
        let lc = LightCurve {
            id: 1,
            time: vec![0.0, 1.0, 2.0],
            flux: vec![1.0, 0.6, 1.0],
            label: vec![0, 1, 0],
        };
        assert!(lc.validate().is_ok());
        assert_eq!(lc.len(), 3);
    }

    #[test]
    fn test_validate_rejects_length_mismatch() {
        let lc = LightCurve {
            id: 2,
            time: vec![0.0, 1.0],
            flux: vec![1.0, 0.6, 1.0],
            label: vec![0, 1, 0],
        };
        assert!(matches!(lc.validate(), Err(GameError::Dataset(_))));
    }

    #[test]
    fn test_validate_rejects_non_binary_labels() {
        let lc = LightCurve {
            id: 3,
            time: vec![0.0],
            flux: vec![1.0],
            label: vec![2],
        };
        assert!(lc.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_curve() {
        let lc = LightCurve { id: 4, time: vec![], flux: vec![], label: vec![] };
        assert!(lc.validate().is_err());
    }
}
