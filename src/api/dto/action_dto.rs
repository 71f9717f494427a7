//! Action execution DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// A single coordinate-automation action.
///
/// Everything beyond the `action` discriminator is passed through to the
/// auto-server untouched (`tap` takes `x`/`y`, `type` takes `text`, and
/// so on — the contract is owned by the automation endpoint).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ActionRequest {
    /// Action discriminator (e.g. `"tap"`, `"type"`, `"swipe"`).
    pub action: String,
    /// Action-specific parameters, forwarded verbatim.
    #[serde(flatten)]
    pub params: serde_json::Map<String, Value>,
}

/// Request body for `POST /api/v1/actions`: one action or a batch.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum RunRequest {
    /// A single action.
    Single(ActionRequest),
    /// An ordered batch of actions, executed upstream in sequence.
    Batch(Vec<ActionRequest>),
}

/// Response body for `POST /api/v1/actions`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActionResponse {
    /// Server-assigned id for this execution.
    pub action_id: uuid::Uuid,
    /// Result payload relayed from the auto-server.
    pub result: Value,
    /// When the execution completed.
    pub executed_at: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn single_action_deserializes_with_flattened_params() {
        let value = json!({"action": "tap", "x": 100, "y": 200});
        let Ok(request) = serde_json::from_value::<RunRequest>(value) else {
            panic!("deserialization failed");
        };
        let RunRequest::Single(action) = request else {
            panic!("expected single action");
        };
        assert_eq!(action.action, "tap");
        assert_eq!(action.params.get("x"), Some(&json!(100)));
    }

    #[test]
    fn batch_deserializes_from_array() {
        let value = json!([
            {"action": "tap", "x": 1, "y": 2},
            {"action": "type", "text": "hello"}
        ]);
        let Ok(request) = serde_json::from_value::<RunRequest>(value) else {
            panic!("deserialization failed");
        };
        let RunRequest::Batch(actions) = request else {
            panic!("expected batch");
        };
        assert_eq!(actions.len(), 2);
    }
}
