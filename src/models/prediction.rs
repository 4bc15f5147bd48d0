//! Prediction payloads

use serde::Serialize;

/// One ranked class.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct ScoredLabel {
    pub label: String,
    pub prob: f64,
}

/// Response of `POST /predict`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct Prediction {
    /// Best first, at most `top_k` entries
    pub top: Vec<ScoredLabel>,

    /// Size of the loaded label list
    pub all_count: usize,
}
