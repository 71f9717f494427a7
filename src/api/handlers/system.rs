//! System endpoints: health check, status, mirror activation.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::dto::{AutoServerStatusDto, StatusResponse};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, PlaygroundError};

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /health` — Gateway health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns gateway health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Gateway is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// `GET /status` — Gateway and auto-server status.
///
/// The UI polls this to decide whether the playground is ready to accept
/// actions.
#[utoipa::path(
    get,
    path = "/status",
    tag = "System",
    summary = "Gateway status",
    description = "Returns gateway status together with the auto-server's reachability and supervision detail.",
    responses(
        (status = 200, description = "Current status", body = StatusResponse),
    )
)]
pub async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    let reachable = state.supervisor.is_running().await;
    let snapshot = state.supervisor.state().await;
    Json(StatusResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        auto_server: AutoServerStatusDto::from_state(
            snapshot,
            state.supervisor.port(),
            reachable,
        ),
    })
}

/// `POST /activate-mirror` — Bring the mirroring window to the foreground.
///
/// Forwards to the auto-server and relays its window-detection payload.
/// Unlike the implicit pre-action activation, failure here is surfaced to
/// the caller.
///
/// # Errors
///
/// Returns [`PlaygroundError::ActivationFailed`] (502) when the
/// auto-server is unreachable or reports a non-2xx status.
#[utoipa::path(
    post,
    path = "/activate-mirror",
    tag = "System",
    summary = "Activate the mirroring window",
    description = "Activates the screen-mirroring app and re-detects the window position so automation coordinates resolve correctly.",
    responses(
        (status = 200, description = "Window detection payload"),
        (status = 502, description = "Activation failed", body = ErrorResponse),
    )
)]
pub async fn activate_mirror_handler(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, PlaygroundError> {
    let detection = state.executor.activate().await?;
    Ok(Json(detection))
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/status", get(status_handler))
        .route("/activate-mirror", post(activate_mirror_handler))
}
