//! Action forwarding to the auto-server.
//!
//! [`ActionExecutor`] is the seam between the HTTP surface and whatever
//! actually performs device actions. [`AutoServerExecutor`] is the real
//! implementation: it forwards the action payload to the auto-server's
//! `POST /run` endpoint and relays the result.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::PlaygroundError;

/// Executes a playground action, returning the upstream result payload.
#[async_trait]
pub trait ActionExecutor: Send + Sync {
    /// Executes the given action payload.
    ///
    /// # Errors
    ///
    /// Returns a [`PlaygroundError`] if the action could not be delivered
    /// or the upstream endpoint reported a failure.
    async fn execute(&self, payload: Value) -> Result<Value, PlaygroundError>;
}

/// Forwards actions to the auto-server over HTTP.
#[derive(Debug, Clone)]
pub struct AutoServerExecutor {
    client: reqwest::Client,
    base_url: String,
}

impl AutoServerExecutor {
    /// Creates an executor targeting the given auto-server base URL.
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// Returns the auto-server base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ActionExecutor for AutoServerExecutor {
    async fn execute(&self, payload: Value) -> Result<Value, PlaygroundError> {
        let response = self
            .client
            .post(format!("{}/run", self.base_url))
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlaygroundError::Upstream(format!(
                "auto-server returned {status}"
            )));
        }

        let body: Value = response.json().await?;

        // The auto-server reports failures with HTTP 200 and a
        // `"status": "error"` payload.
        if body.get("status").and_then(Value::as_str) == Some("error") {
            let message = body
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string();
            return Err(PlaygroundError::ActionRejected(message));
        }

        Ok(body)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn forwards_payload_and_returns_result() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/run")
                .json_body(json!({"action": "tap", "x": 100, "y": 200}));
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({"status": "ok"}));
        });

        let executor = AutoServerExecutor::new(reqwest::Client::new(), server.base_url());
        let result = executor
            .execute(json!({"action": "tap", "x": 100, "y": 200}))
            .await;

        mock.assert();
        let Ok(body) = result else {
            panic!("expected success");
        };
        assert_eq!(body, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn upstream_error_payload_becomes_action_rejected() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/run");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({"status": "error", "error": "unknown action"}));
        });

        let executor = AutoServerExecutor::new(reqwest::Client::new(), server.base_url());
        let result = executor.execute(json!({"action": "bogus"})).await;

        let Err(PlaygroundError::ActionRejected(message)) = result else {
            panic!("expected ActionRejected");
        };
        assert_eq!(message, "unknown action");
    }

    #[tokio::test]
    async fn non_success_status_becomes_upstream_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/run");
            then.status(500);
        });

        let executor = AutoServerExecutor::new(reqwest::Client::new(), server.base_url());
        let result = executor.execute(json!({"action": "tap"})).await;

        assert!(matches!(result, Err(PlaygroundError::Upstream(_))));
    }
}
