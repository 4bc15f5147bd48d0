//! Error handling

use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::inference::{PredictError, PreprocessError};

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    // Upload errors
    MissingFile,
    InvalidUpload(String),
    InvalidImage(String),
    PayloadTooLarge,

    // Model errors
    InferenceError(String),

    // Generic errors
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::MissingFile => (StatusCode::BAD_REQUEST, "Missing multipart field 'file'"),
            AppError::InvalidUpload(msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
            AppError::InvalidImage(msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
            AppError::PayloadTooLarge => (StatusCode::PAYLOAD_TOO_LARGE, "Upload too large"),
            AppError::InferenceError(msg) => {
                tracing::error!("Inference error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Inference failed")
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<PredictError> for AppError {
    fn from(err: PredictError) -> Self {
        match err {
            PredictError::Preprocess(PreprocessError::Shape(e)) => {
                AppError::InternalError(e.to_string())
            }
            PredictError::Preprocess(e) => AppError::InvalidImage(e.to_string()),
            PredictError::Inference(e) => AppError::InferenceError(e.to_string()),
        }
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge
        } else {
            AppError::InvalidUpload(err.body_text())
        }
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::InvalidUpload(rejection.body_text())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::InternalError(format!("Prediction task failed: {}", err))
    }
}
