//! Service descriptor

use axum::Json;
use serde_json::{json, Value};

pub const SERVICE_TITLE: &str = "AAT Dog Breed Classifier API";

pub async fn index() -> Json<Value> {
    Json(json!({
        "service": SERVICE_TITLE,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/health",
            "predict": "/predict (POST multipart, field 'file')"
        }
    }))
}
