// HTTP request handlers

use super::routes::AppState;
use crate::error::GateError;
use crate::gate::GateResponse;
use crate::metrics;
use axum::extract::{ConnectInfo, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Instant;
use tracing::debug;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub input: String,
}

/// Handler for the `/api/generate` endpoint.
pub async fn generate_handler(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<GateResponse>, GateError> {
    let client_id = client_identity(&headers, Some(addr));
    debug!(client_id, "received generate request");

    let started = Instant::now();
    let result = state.gate.handle(&client_id, &req.input).await;

    let status = match &result {
        Ok(_) => 200,
        Err(e) => e.status_code().as_u16(),
    };
    metrics::record_request("/api/generate", status, started.elapsed().as_secs_f64());

    result.map(Json)
}

/// Derive the limiter identity for a request.
///
/// First `x-forwarded-for` hop, then `x-real-ip`, then the peer address.
/// Unidentifiable clients all share the `"unknown"` bucket, so they throttle
/// each other rather than bypassing the limit. The headers are trusted as-is;
/// deploy behind a proxy that controls them.
pub fn client_identity(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    if let Some(real_ip) = headers.get("x-real-ip").and_then(|v| v.to_str().ok()) {
        let real_ip = real_ip.trim();
        if !real_ip.is_empty() {
            return real_ip.to_string();
        }
    }

    match peer {
        Some(addr) => addr.ip().to_string(),
        None => "unknown".to_string(),
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub checks: HashMap<String, HealthCheck>,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheck {
    pub status: String,
    pub message: String,
}

pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let mut checks = HashMap::new();
    let mut overall_status = HealthStatus::Healthy;

    // Check daily quota headroom
    let (used, limit) = state.gate.quota_usage();
    let quota_check = if used >= limit {
        overall_status = HealthStatus::Unhealthy;
        HealthCheck {
            status: "error".to_string(),
            message: format!("daily quota exhausted ({}/{})", used, limit),
        }
    } else if u64::from(used) * 10 >= u64::from(limit) * 9 {
        overall_status = HealthStatus::Degraded;
        HealthCheck {
            status: "warning".to_string(),
            message: format!("daily quota nearly exhausted ({}/{})", used, limit),
        }
    } else {
        HealthCheck {
            status: "ok".to_string(),
            message: format!("{}/{} generations used today", used, limit),
        }
    };
    checks.insert("daily_quota".to_string(), quota_check);

    // Check response cache occupancy
    let stats = state.gate.cache_stats();
    let cache_check = HealthCheck {
        status: "ok".to_string(),
        message: format!(
            "{} entries, {} hits / {} misses",
            stats.entries, stats.hits, stats.misses
        ),
    };
    checks.insert("response_cache".to_string(), cache_check);

    // Check provider configuration
    let provider_check = HealthCheck {
        status: "ok".to_string(),
        message: format!(
            "{} via {}",
            state.config.provider.model, state.config.provider.api_base_url
        ),
    };
    checks.insert("provider".to_string(), provider_check);

    Json(HealthResponse {
        status: overall_status,
        checks,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Handler for the Prometheus scrape endpoint.
pub async fn metrics_handler() -> impl IntoResponse {
    (
        [(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        metrics::gather_metrics(),
    )
}
