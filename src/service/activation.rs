//! Mirror activation as a decorator around action execution.
//!
//! Coordinates only resolve correctly while the screen-mirroring window
//! is in the foreground, so every action is preceded by an activation
//! call. [`MirrorActivation`] wraps any [`ActionExecutor`] and performs
//! the side call before delegating; activation failure is logged and the
//! wrapped action still executes.

use async_trait::async_trait;
use serde_json::Value;

use super::executor::ActionExecutor;
use crate::error::PlaygroundError;

/// Decorator that brings the mirroring window to the foreground before
/// delegating to the inner executor.
#[derive(Debug, Clone)]
pub struct MirrorActivation<E> {
    inner: E,
    client: reqwest::Client,
    base_url: String,
}

impl<E> MirrorActivation<E> {
    /// Wraps `inner`, activating the mirror via the auto-server at
    /// `base_url` before each execution.
    #[must_use]
    pub fn new(inner: E, client: reqwest::Client, base_url: String) -> Self {
        Self {
            inner,
            client,
            base_url,
        }
    }

    /// Returns the wrapped executor.
    #[must_use]
    pub fn inner(&self) -> &E {
        &self.inner
    }

    /// Activates the mirroring window and re-detects its position.
    ///
    /// Any 2xx response counts as success and the upstream detection
    /// payload is returned.
    ///
    /// # Errors
    ///
    /// Returns [`PlaygroundError::ActivationFailed`] on transport failure
    /// or a non-2xx upstream response.
    pub async fn activate(&self) -> Result<Value, PlaygroundError> {
        let response = self
            .client
            .post(format!("{}/activate-mirror", self.base_url))
            .send()
            .await
            .map_err(|err| PlaygroundError::ActivationFailed(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlaygroundError::ActivationFailed(format!(
                "auto-server returned {status}"
            )));
        }

        Ok(response.json().await.unwrap_or(Value::Null))
    }
}

#[async_trait]
impl<E: ActionExecutor> ActionExecutor for MirrorActivation<E> {
    async fn execute(&self, payload: Value) -> Result<Value, PlaygroundError> {
        match self.activate().await {
            Ok(_) => tracing::debug!("mirror activated, window position re-detected"),
            Err(err) => {
                // Degraded mode: coordinates may be stale but the action
                // is still attempted.
                tracing::warn!(error = %err, "mirror activation failed, continuing");
            }
        }

        self.inner.execute(payload).await
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Records calls instead of touching a device.
    #[derive(Debug, Default)]
    struct RecordingExecutor {
        calls: AtomicU32,
    }

    #[async_trait]
    impl ActionExecutor for RecordingExecutor {
        async fn execute(&self, payload: Value) -> Result<Value, PlaygroundError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(payload)
        }
    }

    #[tokio::test]
    async fn activates_before_delegating() {
        let server = MockServer::start();
        let activate = server.mock(|when, then| {
            when.method(POST).path("/activate-mirror");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({"status": "ok", "width": 390}));
        });

        let wrapped = MirrorActivation::new(
            RecordingExecutor::default(),
            reqwest::Client::new(),
            server.base_url(),
        );

        let result = wrapped.execute(json!({"action": "tap"})).await;

        activate.assert();
        assert!(result.is_ok());
        assert_eq!(wrapped.inner().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn activation_failure_does_not_block_execution() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/activate-mirror");
            then.status(500);
        });

        let wrapped = MirrorActivation::new(
            RecordingExecutor::default(),
            reqwest::Client::new(),
            server.base_url(),
        );

        let result = wrapped.execute(json!({"action": "tap"})).await;

        assert!(result.is_ok());
        assert_eq!(wrapped.inner().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unreachable_activation_endpoint_is_non_fatal() {
        // Point at a port nothing listens on.
        let wrapped = MirrorActivation::new(
            RecordingExecutor::default(),
            reqwest::Client::new(),
            "http://localhost:1".to_string(),
        );

        let result = wrapped.execute(json!({"action": "type", "text": "hi"})).await;

        assert!(result.is_ok());
        assert_eq!(wrapped.inner().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn activate_maps_non_success_to_activation_failed() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/activate-mirror");
            then.status(503);
        });

        let wrapped = MirrorActivation::new(
            RecordingExecutor::default(),
            reqwest::Client::new(),
            server.base_url(),
        );

        let result = wrapped.activate().await;
        assert!(matches!(result, Err(PlaygroundError::ActivationFailed(_))));
    }
}
