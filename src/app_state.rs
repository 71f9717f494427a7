//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::service::{AutoServerExecutor, MirrorActivation};
use crate::supervisor::AutoServerSupervisor;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Execution pipeline: mirror activation wrapped around the
    /// auto-server forwarder.
    pub executor: Arc<MirrorActivation<AutoServerExecutor>>,
    /// Auto-server lifecycle supervisor.
    pub supervisor: Arc<AutoServerSupervisor>,
}
