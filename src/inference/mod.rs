//! Inference Module - image classification pipeline
//!
//! Artifacts are loaded once at startup, then shared read-only by every
//! request: decode -> preprocess -> forward pass -> top-K.

pub mod artifacts;
pub mod engine;
pub mod labels;
pub mod preprocess;
pub mod ranking;

use std::path::PathBuf;

// Re-export common types
pub use artifacts::{Artifacts, PredictError};
pub use engine::{Classifier, InferenceError};
pub use labels::Labels;
pub use preprocess::PreprocessError;

/// Startup failure: the service cannot run without both artifacts.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("cannot read labels file {path}: {source}")]
    LabelsIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("labels file {path} is not a JSON array of strings: {source}")]
    LabelsFormat {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("cannot load model {path}: {reason}")]
    Model { path: PathBuf, reason: String },
}
