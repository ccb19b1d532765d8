//! HTTP boundary for the todo service.
//!
//! # Responsibility
//! - Route HTTP requests to `todo_core` use cases.
//! - Map use-case errors to status codes and the error envelope.
//! - Apply CORS and per-request logging.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use axum::extract::Request;
use axum::http::header::{ACCEPT, CONTENT_TYPE, ORIGIN};
use axum::http::Method;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::Router;
use log::info;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};

pub use config::{ConfigError, ServerConfig};
pub use error::{AppError, AppResult};
pub use state::AppState;

/// Builds the application router around shared state.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::todos::router())
        .layer(middleware::from_fn(log_request))
        .layer(build_cors_layer())
        .with_state(state)
}

fn build_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([ORIGIN, CONTENT_TYPE, ACCEPT])
}

async fn log_request(request: Request, next: Next) -> Response {
    let started_at = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    info!(
        "event=http_request module=http status={} method={} path={} duration_ms={}",
        response.status().as_u16(),
        method,
        path,
        started_at.elapsed().as_millis()
    );
    response
}
