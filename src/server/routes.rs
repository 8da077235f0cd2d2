// HTTP routes configuration

use super::handlers::{generate_handler, health_handler, metrics_handler};
use super::middleware::request_id_layers;
use crate::config::AppConfig;
use crate::error::Result;
use crate::gate::Gate;
use crate::provider::OpenAiClient;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub gate: Arc<Gate<OpenAiClient>>,
}

pub fn create_router(config: AppConfig, gate: Gate<OpenAiClient>) -> Result<Router> {
    let state = AppState {
        config,
        gate: Arc::new(gate),
    };

    let (set_request_id, propagate_request_id) = request_id_layers();

    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route("/api/generate", post(generate_handler))
        // Inputs are capped at a few hundred characters; 16 KiB leaves
        // headroom for the JSON envelope
        .layer(tower_http::limit::RequestBodyLimitLayer::new(16 * 1024))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(propagate_request_id)
        .layer(set_request_id)
        .with_state(state);

    Ok(app)
}
