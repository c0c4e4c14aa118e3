//! Route handlers and error mapping.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::{error, info};

use crate::service::MythService;
use crate::types::{HealthStatus, MythArtifact, ScenarioRequest};
use crate::MythError;

/// Error returned by HTTP handlers.
#[derive(Debug)]
pub enum ApiError {
    /// Body was not a valid request payload.
    Payload(JsonRejection),
    Myth(MythError),
}

impl From<MythError> for ApiError {
    fn from(e: MythError) -> Self {
        ApiError::Myth(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        ApiError::Payload(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::Payload(rejection) => (rejection.status(), rejection.body_text()),
            ApiError::Myth(e) if e.is_client_error() => (StatusCode::BAD_REQUEST, e.client_message()),
            ApiError::Myth(e) => {
                error!(error = %e, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, e.client_message())
            }
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

pub(super) async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "message": "MythWeaver API",
        "version": crate::PKG_VERSION,
    }))
}

pub(super) async fn health(State(service): State<Arc<MythService>>) -> Json<HealthStatus> {
    Json(service.health())
}

pub(super) async fn generate_myth(
    State(service): State<Arc<MythService>>,
    payload: Result<Json<ScenarioRequest>, JsonRejection>,
) -> Result<Json<MythArtifact>, ApiError> {
    let Json(request) = payload?;
    info!(culture = %request.culture, "myth generation requested");
    let artifact = service.generate(request).await?;
    Ok(Json(artifact))
}
