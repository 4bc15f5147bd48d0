//! AAT Dog Breed Classifier - Inference API
//!
//! Loads an image-classification model and its label list once, then serves
//! top-K predictions for uploaded images.
//!
//! # Lifecycle
//!
//! ```text
//!   Config::from_env ──► Artifacts::load ──► create_router ──► serve
//!    (env / .env)        (labels + model)     (AppState)
//! ```
//!
//! The router can only be built from loaded artifacts; a process that fails
//! to load them never binds its port.

mod config;
mod error;
mod handlers;
mod inference;
mod models;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{AppError, AppResult};

use inference::Artifacts;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "breed_classifier=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    tracing::info!("{} starting...", handlers::root::SERVICE_TITLE);
    tracing::info!("Model: {}", config.model_path.display());
    tracing::info!("Classes: {}", config.classes_path.display());
    tracing::info!("Input size: {0}x{0}, top_k: {1}", config.img_size, config.top_k);

    // Load artifacts (fatal on failure)
    let artifacts = Artifacts::load(&config)?;

    let state = AppState {
        config: Arc::new(config),
        artifacts: Arc::new(artifacts),
    };
    let addr = state.config.bind_addr();

    let app = create_router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Shared application state. Exists only after artifacts loaded.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<config::Config>,
    pub artifacts: Arc<Artifacts>,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(handlers::root::index))
        .route("/health", get(handlers::health::check))
        .route("/predict", post(handlers::predict::predict))
        .layer(DefaultBodyLimit::max(upload_limit))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
