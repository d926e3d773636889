//! Model Module - Online Classifier
//!
//! One shared classifier instance for the whole system. Ownership and
//! locking live in the game engine; this module is the model itself plus
//! optional snapshot persistence.

pub mod classifier;
pub mod storage;

pub use classifier::{ModelUpdateError, OnlineClassifier, COLD_START_PROBA};
pub use storage::{default_model_path, load_or_default, save_model, ModelSnapshot};
