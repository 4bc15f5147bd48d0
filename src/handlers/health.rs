//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    classes: usize,
    img_size: u32,
}

/// Only reachable once artifacts are loaded, so always "ok".
pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        classes: state.artifacts.labels().len(),
        img_size: state.config.img_size,
    })
}
