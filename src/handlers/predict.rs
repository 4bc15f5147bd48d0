//! Prediction handler

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};

use crate::models::Prediction;
use crate::{AppError, AppResult, AppState};

/// Multipart field carrying the image.
pub const FILE_FIELD: &str = "file";

/// Classify one uploaded image
pub async fn predict(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<Prediction>> {
    let upload = read_file_field(multipart?).await?;

    let artifacts = state.artifacts.clone();
    let img_size = state.config.img_size;
    let top_k = state.config.top_k;

    // Decode, resize and the forward pass are CPU bound.
    let prediction =
        tokio::task::spawn_blocking(move || artifacts.predict(&upload, img_size, top_k)).await??;

    Ok(Json(prediction))
}

async fn read_file_field(mut multipart: Multipart) -> AppResult<Vec<u8>> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(FILE_FIELD) {
            return Ok(field.bytes().await?.to_vec());
        }
    }
    Err(AppError::MissingFile)
}
