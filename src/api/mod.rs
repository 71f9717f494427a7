//! REST API layer: route handlers, DTOs, and router composition.
//!
//! Action and supervision endpoints are mounted under `/api/v1`; the
//! system routes (`/health`, `/status`, `/activate-mirror`) stay at the
//! root so the UI can reach them without versioning.

pub mod dto;
pub mod handlers;

use axum::Router;

use crate::app_state::AppState;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::system::routes())
}
