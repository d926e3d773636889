//! Logic Module - Business Logic & Engines
//!
//! - `features/` - Feature extraction from a clicked light-curve point
//! - `model/` - Online binary classifier + snapshot persistence
//! - `progress/` - Per-user progression store (volatile / SQLite)
//! - `dataset/` - Light-curve provider
//! - `game/` - Scoring engine, levels, badges

pub mod config;
pub mod dataset;
pub mod features;
pub mod game;
pub mod model;
pub mod progress;
