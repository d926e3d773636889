//! Features Module - Feature Extraction Engine
//!
//! Turns one clicked light-curve point into the fixed-size vector the
//! classifier consumes. The layout is versioned and hashed so persisted
//! model state can detect schema drift.

pub mod extract;
pub mod layout;
pub mod vector;

// Re-export common types
pub use extract::{extract, ExtractError};
pub use layout::{FEATURE_COUNT, FEATURE_VERSION};
pub use vector::FeatureVector;
