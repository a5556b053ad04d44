//! Exoscore API Server
//!
//! HTTP service scoring exoplanet observations for habitability.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       EXOSCORE API                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌──────────────┐  ┌─────────────────────┐  │
//! │  │  HTTP     │  │  Prediction  │  │  Ranking & Stats    │  │
//! │  │  Gateway  │  │  Service     │  │  (CSV Analytics)    │  │
//! │  │  (Axum)   │  │  (Fusion)    │  │                     │  │
//! │  └─────┬─────┘  └──────┬───────┘  └──────────┬──────────┘  │
//! │        └───────────────┼─────────────────────┘             │
//! │                        ▼                                    │
//! │      ┌──────────────────────────────────────────┐          │
//! │      │  models/*.json    data/processed/*.csv   │          │
//! │      └──────────────────────────────────────────┘          │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod handlers;
mod logic;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use std::net::SocketAddr;
use std::sync::Arc;

use logic::model::ModelOracle;
use logic::service::PredictionService;

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "exoscore=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    tracing::info!("Exoscore server starting...");
    tracing::info!("Model artifact: {}", config.model_path);
    tracing::info!("Ranked dataset: {}", config.ranked_data_path);

    // Warm the model cache; a missing artifact is not fatal.
    let oracle = Arc::new(ModelOracle::new(&config.model_path));
    match oracle.model() {
        Ok(model) => tracing::info!("Model ready: {}", model.name),
        Err(error) => tracing::warn!("Predictions disabled until reload: {}", error),
    }

    // Build application state
    let state = AppState {
        prediction: PredictionService::new(oracle.clone()),
        oracle,
        config: config.clone(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub oracle: Arc<ModelOracle>,
    pub prediction: PredictionService,
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::check))
        .route("/predict", post(handlers::predict::predict))
        .route("/rank", get(handlers::rank::rank))
        .route("/stats", get(handlers::stats::stats))
        .route("/importance", get(handlers::importance::importance))
        .route("/model/status", get(handlers::engine::status))
        .route("/model/reload", post(handlers::engine::reload))
        .route("/docs", get(handlers::docs::docs))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
