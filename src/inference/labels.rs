//! Class label list

use std::path::Path;

use super::ArtifactError;

/// Ordered class names, index-aligned with the model output vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels(Vec<String>);

impl Labels {
    pub fn new(names: Vec<String>) -> Self {
        Self(names)
    }

    /// Read a JSON array of strings from disk.
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let raw = std::fs::read(path).map_err(|source| ArtifactError::LabelsIo {
            path: path.to_path_buf(),
            source,
        })?;

        let names: Vec<String> =
            serde_json::from_slice(&raw).map_err(|source| ArtifactError::LabelsFormat {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Self::new(names))
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}
