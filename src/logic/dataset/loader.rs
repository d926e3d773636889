//! Light-Curve Loading
//!
//! JSONL dataset files: one serialized `LightCurve` per line. Curves are
//! validated on load and held immutably behind `Arc`s.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use rand::seq::SliceRandom;

use crate::error::{GameError, GameResult};
use super::{DatasetProvider, LightCurve};

/// In-memory dataset built from loaded curves
pub struct InMemoryDataset {
    curves: HashMap<u32, Arc<LightCurve>>,
    /// Ids in load order, for random sampling
    ids: Vec<u32>,
}

impl InMemoryDataset {
    /// Build from validated curves; duplicate ids are rejected
    pub fn new(curves: Vec<LightCurve>) -> GameResult<Self> {
        let mut map = HashMap::with_capacity(curves.len());
        let mut ids = Vec::with_capacity(curves.len());

        for lc in curves {
            lc.validate()?;
            let id = lc.id;
            if map.insert(id, Arc::new(lc)).is_some() {
                return Err(GameError::Dataset(format!("duplicate light curve id {}", id)));
            }
            ids.push(id);
        }

        log::info!("Dataset loaded: {} light curves", ids.len());
        Ok(Self { curves: map, ids })
    }

    /// Load a JSONL dataset file
    pub fn from_jsonl(path: &Path) -> GameResult<Self> {
        Self::new(load_jsonl(path)?)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl DatasetProvider for InMemoryDataset {
    fn get_lightcurve(&self, id: u32) -> GameResult<Arc<LightCurve>> {
        self.curves
            .get(&id)
            .cloned()
            .ok_or(GameError::NotFound(id))
    }

    fn sample_random_id(&self) -> Option<u32> {
        self.ids.choose(&mut rand::thread_rng()).copied()
    }
}

/// Parse one `LightCurve` per line
pub fn load_jsonl(path: &Path) -> GameResult<Vec<LightCurve>> {
    let file = File::open(path)
        .map_err(|e| GameError::Dataset(format!("cannot open {:?}: {}", path, e)))?;
    let reader = BufReader::new(file);

    let mut curves = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| GameError::Dataset(format!("read error: {}", e)))?;
        if line.trim().is_empty() {
            continue;
        }
        let lc: LightCurve = serde_json::from_str(&line).map_err(|e| {
            GameError::Dataset(format!("{:?} line {}: {}", path, line_no + 1, e))
        })?;
        curves.push(lc);
    }

    Ok(curves)
}

// ============================================================================
// TESTS
// ============================================================================
