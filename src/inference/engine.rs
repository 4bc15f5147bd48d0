//! Inference Engine - ONNX Runtime Integration
//!
//! The model is opaque: a batch of `(1, H, W, 3)` pixels goes in, one
//! probability per class comes out.

use std::path::Path;
use std::time::Instant;

use ndarray::Array4;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;

use super::ArtifactError;

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("inference failed: {0}")]
    Runtime(String),

    #[error("model produced no output named {0:?}")]
    MissingOutput(String),

    #[error("model output index {index} has no label ({labels} labels loaded)")]
    UnknownClass { index: usize, labels: usize },

    #[error("model produced a non-finite score at index {index}")]
    NonFiniteScore { index: usize },
}

// ============================================================================
// INFERENCE ENGINE TRAIT
// ============================================================================

/// Trait for classifier backends (ONNX, test doubles, ...).
///
/// Implementations are shared read-only across in-flight requests.
pub trait Classifier: Send + Sync {
    /// Run one forward pass and return the first batch row's scores.
    fn classify(&self, batch: Array4<f32>) -> Result<Vec<f32>, InferenceError>;
}

// ============================================================================
// ONNX IMPLEMENTATION
// ============================================================================

pub struct OnnxClassifier {
    // `Session::run` needs exclusive access.
    session: Mutex<Session>,
    output_name: String,
}

impl OnnxClassifier {
    /// Load an ONNX model from file.
    pub fn load(model_path: &Path, intra_threads: Option<usize>) -> Result<Self, ArtifactError> {
        let fail = |reason: String| ArtifactError::Model {
            path: model_path.to_path_buf(),
            reason,
        };

        if !model_path.exists() {
            return Err(fail("file not found".to_string()));
        }

        let start = Instant::now();
        tracing::info!("Loading ONNX model from: {}", model_path.display());

        let mut builder = Session::builder()
            .map_err(|e| fail(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| fail(format!("Failed to set optimization: {}", e)))?;

        if let Some(threads) = intra_threads {
            builder = builder
                .with_intra_threads(threads)
                .map_err(|e| fail(format!("Failed to set intra threads: {}", e)))?;
        }

        let session = builder
            .commit_from_file(model_path)
            .map_err(|e| fail(format!("Failed to load model: {}", e)))?;

        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| fail("model declares no outputs".to_string()))?;

        tracing::info!(
            "ONNX model loaded in {:.2}ms (output: {})",
            start.elapsed().as_secs_f64() * 1000.0,
            output_name
        );

        Ok(Self {
            session: Mutex::new(session),
            output_name,
        })
    }
}

impl Classifier for OnnxClassifier {
    fn classify(&self, batch: Array4<f32>) -> Result<Vec<f32>, InferenceError> {
        let input = Value::from_array(batch)
            .map_err(|e| InferenceError::Runtime(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![input])
            .map_err(|e| InferenceError::Runtime(e.to_string()))?;

        let output = outputs
            .get(self.output_name.as_str())
            .ok_or_else(|| InferenceError::MissingOutput(self.output_name.clone()))?;

        let (_, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| InferenceError::Runtime(format!("Extract error: {}", e)))?;

        Ok(data.to_vec())
    }
}
