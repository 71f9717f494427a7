//! Auto-server supervision endpoints.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{AutoServerStatusDto, EnsureResponse};
use crate::app_state::AppState;

/// `GET /api/v1/auto-server` — Auto-server supervision detail.
#[utoipa::path(
    get,
    path = "/api/v1/auto-server",
    tag = "AutoServer",
    summary = "Auto-server status",
    description = "Returns the supervisor's view of the auto-server: reachability, child PID, and spawn attempts.",
    responses(
        (status = 200, description = "Supervisor snapshot", body = AutoServerStatusDto),
    )
)]
pub async fn auto_server_status(State(state): State<AppState>) -> impl IntoResponse {
    let reachable = state.supervisor.is_running().await;
    let snapshot = state.supervisor.state().await;
    Json(AutoServerStatusDto::from_state(
        snapshot,
        state.supervisor.port(),
        reachable,
    ))
}

/// `POST /api/v1/auto-server/ensure` — Start the auto-server if it is
/// not running.
///
/// The outcome is reported as a boolean; a failed start never takes the
/// gateway down.
#[utoipa::path(
    post,
    path = "/api/v1/auto-server/ensure",
    tag = "AutoServer",
    summary = "Ensure the auto-server is running",
    description = "Spawns the automation process if the port is dark, waits the startup grace period, and re-checks liveness.",
    responses(
        (status = 200, description = "Attempt outcome", body = EnsureResponse),
    )
)]
pub async fn ensure_auto_server(State(state): State<AppState>) -> impl IntoResponse {
    let started = state.supervisor.ensure_started().await;
    Json(EnsureResponse { started })
}

/// Supervision routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auto-server", get(auto_server_status))
        .route("/auto-server/ensure", post(ensure_auto_server))
}
