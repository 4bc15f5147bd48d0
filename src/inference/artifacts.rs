//! Startup artifacts: label list + loaded classifier

use std::time::Instant;

use crate::config::Config;
use crate::models::{Prediction, ScoredLabel};

use super::engine::OnnxClassifier;
use super::preprocess::{self, PreprocessError};
use super::ranking::top_k;
use super::{ArtifactError, Classifier, InferenceError, Labels};

/// Failure while serving a single prediction.
#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    #[error(transparent)]
    Preprocess(#[from] PreprocessError),

    #[error(transparent)]
    Inference(#[from] InferenceError),
}

/// Everything loaded once at startup. Immutable afterwards.
pub struct Artifacts {
    labels: Labels,
    classifier: Box<dyn Classifier>,
}

impl Artifacts {
    pub fn new(labels: Labels, classifier: Box<dyn Classifier>) -> Self {
        Self { labels, classifier }
    }

    /// Load labels, then the model. Any failure aborts startup.
    pub fn load(config: &Config) -> Result<Self, ArtifactError> {
        let labels = Labels::load(&config.classes_path)?;
        tracing::info!(
            "Loaded {} class labels from {}",
            labels.len(),
            config.classes_path.display()
        );

        let classifier = OnnxClassifier::load(&config.model_path, config.intra_threads)?;

        Ok(Self::new(labels, Box::new(classifier)))
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    /// Decode, preprocess, run the model and rank the result.
    pub fn predict(
        &self,
        upload: &[u8],
        img_size: u32,
        k: usize,
    ) -> Result<Prediction, PredictError> {
        let start = Instant::now();

        let batch = preprocess::preprocess(upload, img_size)?;
        let probs = self.classifier.classify(batch)?;

        let top = top_k(&probs, k)
            .into_iter()
            .map(|(index, prob)| -> Result<ScoredLabel, InferenceError> {
                let label = self.labels.get(index).ok_or(InferenceError::UnknownClass {
                    index,
                    labels: self.labels.len(),
                })?;
                if !prob.is_finite() {
                    return Err(InferenceError::NonFiniteScore { index });
                }
                Ok(ScoredLabel {
                    label: label.to_string(),
                    prob: f64::from(prob),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            "Predicted {} bytes in {:.2}ms",
            upload.len(),
            start.elapsed().as_secs_f64() * 1000.0
        );

        Ok(Prediction {
            top,
            all_count: self.labels.len(),
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::inference::preprocess::tests::solid_png;
    use ndarray::Array4;

    /// Returns fixed scores and checks the batch shape it was given.
    pub(crate) struct FixedClassifier {
        pub scores: Vec<f32>,
        pub edge: usize,
    }

    impl Classifier for FixedClassifier {
        fn classify(&self, batch: Array4<f32>) -> Result<Vec<f32>, InferenceError> {
            if batch.shape() != [1, self.edge, self.edge, 3] {
                return Err(InferenceError::Runtime(format!(
                    "unexpected input shape {:?}",
                    batch.shape()
                )));
            }
            Ok(self.scores.clone())
        }
    }

    /// Scores every class by mean red intensity so output depends on pixels.
    pub(crate) struct RednessClassifier {
        pub classes: usize,
    }

    impl Classifier for RednessClassifier {
        fn classify(&self, batch: Array4<f32>) -> Result<Vec<f32>, InferenceError> {
            let red = batch
                .index_axis(ndarray::Axis(3), 0)
                .mean()
                .unwrap_or(0.0)
                / 255.0;
            Ok((0..self.classes)
                .map(|i| (red * (i + 1) as f32).fract())
                .collect())
        }
    }

    pub(crate) fn labels(names: &[&str]) -> Labels {
        Labels::new(names.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_predict_ranks_and_labels() {
        let artifacts = Artifacts::new(
            labels(&["beagle", "pug", "husky", "corgi"]),
            Box::new(FixedClassifier {
                scores: vec![0.1, 0.5, 0.3, 0.1],
                edge: 16,
            }),
        );

        let prediction = artifacts
            .predict(&solid_png(40, 30, [1, 2, 3]), 16, 2)
            .unwrap();

        assert_eq!(prediction.all_count, 4);
        assert_eq!(prediction.top.len(), 2);
        assert_eq!(prediction.top[0].label, "pug");
        assert_eq!(prediction.top[1].label, "husky");
        assert!(prediction.top[0].prob >= prediction.top[1].prob);
    }

    #[test]
    fn test_predict_deterministic() {
        let artifacts = Artifacts::new(
            labels(&["a", "b", "c", "d", "e", "f"]),
            Box::new(RednessClassifier { classes: 6 }),
        );
        let upload = solid_png(64, 48, [170, 20, 90]);

        let first = artifacts.predict(&upload, 8, 3).unwrap();
        let second = artifacts.predict(&upload, 8, 3).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_output_longer_than_labels() {
        let artifacts = Artifacts::new(
            labels(&["only"]),
            Box::new(FixedClassifier {
                scores: vec![0.2, 0.8],
                edge: 4,
            }),
        );

        let err = artifacts
            .predict(&solid_png(4, 4, [0, 0, 0]), 4, 2)
            .unwrap_err();
        assert!(matches!(
            err,
            PredictError::Inference(InferenceError::UnknownClass { index: 1, labels: 1 })
        ));
    }

    #[test]
    fn test_nan_score_rejected() {
        let artifacts = Artifacts::new(
            labels(&["beagle", "pug", "husky"]),
            Box::new(FixedClassifier {
                scores: vec![0.2, f32::NAN, 0.5],
                edge: 4,
            }),
        );

        let err = artifacts
            .predict(&solid_png(4, 4, [9, 9, 9]), 4, 3)
            .unwrap_err();
        assert!(matches!(
            err,
            PredictError::Inference(InferenceError::NonFiniteScore { index: 1 })
        ));
    }

    #[test]
    fn test_undecodable_upload() {
        let artifacts = Artifacts::new(
            labels(&["a"]),
            Box::new(FixedClassifier {
                scores: vec![1.0],
                edge: 4,
            }),
        );

        let err = artifacts.predict(b"hello", 4, 1).unwrap_err();
        assert!(matches!(err, PredictError::Preprocess(_)));
    }

    #[test]
    fn test_load_fails_without_model() {
        let dir = tempfile::tempdir().unwrap();
        let classes = dir.path().join("classes.json");
        std::fs::write(&classes, r#"["a", "b"]"#).unwrap();

        let config = Config {
            classes_path: classes,
            model_path: dir.path().join("missing.onnx"),
            ..Config::default()
        };

        let err = Artifacts::load(&config).err().unwrap();
        assert!(matches!(err, ArtifactError::Model { .. }));
    }
}
