//! Action execution endpoint handlers.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;

use crate::api::dto::{ActionResponse, RunRequest};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, PlaygroundError};
use crate::service::ActionExecutor;

/// `POST /api/v1/actions` — Execute an action or batch of actions.
///
/// The mirror is activated first (non-fatal side call), then the payload
/// is forwarded to the auto-server.
///
/// # Errors
///
/// Returns [`PlaygroundError`] if the payload cannot be serialized or the
/// auto-server rejects the action.
#[utoipa::path(
    post,
    path = "/api/v1/actions",
    tag = "Actions",
    summary = "Execute actions",
    description = "Activates the mirroring window, then forwards one action or an ordered batch to the auto-server.",
    request_body = RunRequest,
    responses(
        (status = 200, description = "Action executed", body = ActionResponse),
        (status = 400, description = "Invalid action payload", body = ErrorResponse),
        (status = 502, description = "Auto-server rejected the action", body = ErrorResponse),
    )
)]
pub async fn run_actions(
    State(state): State<AppState>,
    Json(request): Json<RunRequest>,
) -> Result<impl IntoResponse, PlaygroundError> {
    let action_id = uuid::Uuid::new_v4();

    let payload = serde_json::to_value(&request)
        .map_err(|err| PlaygroundError::InvalidRequest(err.to_string()))?;

    tracing::info!(%action_id, "executing action");
    let result = state.executor.execute(payload).await?;

    Ok(Json(ActionResponse {
        action_id,
        result,
        executed_at: Utc::now(),
    }))
}

/// Action routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/actions", post(run_actions))
}
