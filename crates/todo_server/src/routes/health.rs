//! Liveness endpoint.
//!
//! # Responsibility
//! - Answer `GET /health` without touching the store.
//!
//! # Invariants
//! - The body is exactly `{"status":"ok","message":"Todo API is running"}`.

use axum::{routing::get, Json, Router};
use serde::Serialize;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    message: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        message: "Todo API is running",
    })
}

pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/health", get(health_check))
}
