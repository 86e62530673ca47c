/**
 * Wire types for the Langfuse batch ingestion endpoint.
 *
 * The client itself is generic over request and response payloads, so
 * nothing here is mandatory. These types describe the envelope Langfuse
 * documents for `POST /api/public/ingestion`:
 *
 * ```json
 * {
 *   "batch": [
 *     { "id": "...", "timestamp": "...", "type": "trace-create", "body": { ... } }
 *   ],
 *   "metadata": { ... }
 * }
 * ```
 *
 * The server answers with HTTP 207 and a per-event result list:
 * `{ "successes": [{ "id", "status" }], "errors": [{ "id", "status", "message", "error" }] }`.
 */
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

/// Values accepted in the `type` field of an [`IngestionEvent`].
pub mod event_types {
    pub const TRACE_CREATE: &str = "trace-create";
    pub const SPAN_CREATE: &str = "span-create";
    pub const SPAN_UPDATE: &str = "span-update";
    pub const GENERATION_CREATE: &str = "generation-create";
    pub const GENERATION_UPDATE: &str = "generation-update";
    pub const EVENT_CREATE: &str = "event-create";
    pub const SCORE_CREATE: &str = "score-create";
    pub const SDK_LOG: &str = "sdk-log";
}

// ---------------------------------------------------------------------------
// Request envelope
// ---------------------------------------------------------------------------

/**
 * The top-level body POSTed to the ingestion endpoint.
 *
 * `B` is the event body type. Use `serde_json::Value` when one batch mixes
 * several event kinds.
 */
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IngestionBatch<B> {
    /// Events in submission order.
    pub batch: Vec<IngestionEvent<B>>,

    /// Optional batch-level metadata, passed through untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl<B> IngestionBatch<B> {
    pub fn new(batch: Vec<IngestionEvent<B>>) -> Self {
        Self {
            batch,
            metadata: None,
        }
    }

    /// Appends an event to the batch.
    pub fn push(&mut self, event: IngestionEvent<B>) {
        self.batch.push(event);
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn len(&self) -> usize {
        self.batch.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batch.is_empty()
    }
}

impl<B> Default for IngestionBatch<B> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/**
 * A single event inside an [`IngestionBatch`].
 *
 * `id` is the idempotency key Langfuse uses to deduplicate retried events;
 * it is echoed back in the matching [`IngestionSuccess`] / [`IngestionFailure`].
 */
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IngestionEvent<B> {
    pub id: String,

    /// RFC 3339 timestamp of when the event was produced.
    pub timestamp: String,

    /// One of the [`event_types`] constants.
    #[serde(rename = "type")]
    pub event_type: String,

    pub body: B,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl<B> IngestionEvent<B> {
    /**
     * Creates an event with a fresh UUID v4 id and the current UTC time
     * (millisecond precision, `Z` suffix).
     */
    pub fn new(event_type: impl Into<String>, body: B) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            event_type: event_type.into(),
            body,
            metadata: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/**
 * Per-event outcome returned by the ingestion endpoint.
 *
 * Both lists default to empty so that a bare `{}` (or an unrelated JSON
 * object) still decodes.
 */
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IngestionResponse {
    #[serde(default)]
    pub successes: Vec<IngestionSuccess>,

    #[serde(default)]
    pub errors: Vec<IngestionFailure>,
}

impl IngestionResponse {
    /// `true` when at least one event of the batch was rejected.
    pub fn is_partial_failure(&self) -> bool {
        !self.errors.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IngestionSuccess {
    pub id: String,
    pub status: u16,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IngestionFailure {
    pub id: String,
    pub status: u16,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Free-form error detail; shape varies by failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_event_serializes_type_field() {
        let event = IngestionEvent::new(event_types::TRACE_CREATE, json!({ "name": "t" }))
            .with_id("evt-1");
        let value = serde_json::to_value(&event).expect("serializable");

        assert_eq!(value["id"], "evt-1");
        assert_eq!(value["type"], "trace-create");
        assert_eq!(value["body"]["name"], "t");
        assert!(value.get("metadata").is_none());
    }

    /**
     * Fresh events get distinct ids and a UTC timestamp that parses back.
     */
    #[test]
    fn test_event_new_generates_id_and_timestamp() {
        let a = IngestionEvent::new(event_types::SDK_LOG, ());
        let b = IngestionEvent::new(event_types::SDK_LOG, ());

        assert_ne!(a.id, b.id);
        assert!(a.timestamp.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&a.timestamp).is_ok());
    }

    #[test]
    fn test_batch_omits_absent_metadata() {
        let mut batch = IngestionBatch::default();
        batch.push(IngestionEvent::new(event_types::EVENT_CREATE, 1).with_id("a"));

        let value = serde_json::to_value(&batch).expect("serializable");
        assert_eq!(value["batch"].as_array().map(Vec::len), Some(1));
        assert!(value.get("metadata").is_none());
    }

    #[test]
    fn test_response_decodes_multi_status_body() {
        let body = r#"{
            "successes": [{ "id": "a", "status": 201 }],
            "errors": [{ "id": "b", "status": 400, "message": "Invalid request data", "error": { "issues": [] } }]
        }"#;
        let response: IngestionResponse = serde_json::from_str(body).expect("decodes");

        assert_eq!(response.successes, vec![IngestionSuccess { id: "a".into(), status: 201 }]);
        assert_eq!(response.errors[0].message.as_deref(), Some("Invalid request data"));
        assert!(response.is_partial_failure());
    }

    #[test]
    fn test_response_defaults_missing_lists() {
        let response: IngestionResponse = serde_json::from_str(r#"{"ok":true}"#).expect("decodes");
        assert_eq!(response, IngestionResponse::default());
        assert!(!response.is_partial_failure());
    }
}
