//! HTTP transport for [`MythService`].
//!
//! This module provides:
//! - The axum router and its handlers (`handlers`)
//! - Timing and request-logging middleware (`middleware`)
//! - Configuration types (`config`)
//!
//! | Route | Method | Body |
//! |---|---|---|
//! | `/` | GET | service banner |
//! | `/api/v1/health` | GET, HEAD | [`HealthStatus`](crate::types::HealthStatus) |
//! | `/api/v1/generate-myth` | POST | [`ScenarioRequest`](crate::types::ScenarioRequest) → [`MythArtifact`](crate::types::MythArtifact) |
//!
//! Errors are JSON `{"detail": "..."}`: 400 for client-class errors, 500
//! with an opaque message for everything else.

pub mod config;
mod handlers;
mod middleware;

pub use handlers::ApiError;
pub use middleware::PROCESS_TIME_HEADER;

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tokio::net::TcpListener;

use crate::service::MythService;

/// Build the application router.
pub fn router(service: Arc<MythService>) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/api/v1/health", get(handlers::health))
        .route("/api/v1/generate-myth", post(handlers::generate_myth))
        .with_state(service)
        .layer(axum::middleware::from_fn(middleware::process_time))
        .layer(axum::middleware::from_fn(middleware::log_requests))
}

/// Serve until `shutdown` resolves, then drain in-flight requests.
pub async fn serve<F>(
    listener: TcpListener,
    service: Arc<MythService>,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown)
        .await
}
