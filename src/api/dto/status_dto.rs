//! Status and supervision DTOs.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::supervisor::AutoServerState;

/// Auto-server view included in status responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct AutoServerStatusDto {
    /// Whether the automation port currently accepts connections.
    pub reachable: bool,
    /// Probed TCP port.
    pub port: u16,
    /// PID of the supervised child, if the supervisor holds one.
    pub pid: Option<u32>,
    /// Spawn attempts performed by the supervisor since startup.
    pub spawn_attempts: u32,
    /// When the supervisor last spawned the child.
    pub last_spawned_at: Option<DateTime<Utc>>,
    /// Whether the supervisor is actively watching the auto-server.
    pub supervised: bool,
}

impl AutoServerStatusDto {
    /// Builds the DTO from a supervisor snapshot plus a fresh probe result.
    #[must_use]
    pub fn from_state(state: AutoServerState, port: u16, reachable: bool) -> Self {
        Self {
            reachable,
            port,
            pid: state.pid,
            spawn_attempts: state.spawn_attempts,
            last_spawned_at: state.last_spawned_at,
            supervised: state.supervised,
        }
    }
}

/// Response body for `GET /status`.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    /// Gateway status string (`"ok"`).
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Server timestamp.
    pub timestamp: DateTime<Utc>,
    /// Auto-server detail.
    pub auto_server: AutoServerStatusDto,
}

/// Response body for `POST /api/v1/auto-server/ensure`.
#[derive(Debug, Serialize, ToSchema)]
pub struct EnsureResponse {
    /// Whether the auto-server is up after the attempt.
    pub started: bool,
}
