//! Axum-based HTTP server implementation for the nl2formula service.
//!
//! This module is responsible for setting up the HTTP server, configuring
//! routes, and handling incoming requests. Every user-initiated action enters
//! the gate through the single `/api/generate` endpoint.
//!
//! # Components
//!
//! - `handlers`: Implementation of individual API endpoints (generate, health, metrics).
//! - `middleware`: Custom tower/axum middleware for request ID tracking.
//! - `routes`: The main router configuration that ties everything together.

mod handlers;
mod middleware;
mod routes;

pub use handlers::client_identity;
pub use routes::{create_router, AppState};
