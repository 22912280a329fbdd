//! Core types for agent runtime invocation.
//!
//! Wire shapes here are dictated by the external runtime service and must be
//! matched exactly: the event-stream framing (`data: ` prefix, JSON body, the
//! nested `event.contentBlockDelta.delta.text` path) and the
//! SCREAMING_SNAKE_CASE deployment status strings.

use std::fmt;

use bytes::Bytes;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

use crate::error::AgentCoreResult;

// ---------------------------------------------------------------------------
// Content type
// ---------------------------------------------------------------------------

/// Decoding strategy for an invocation response, resolved once from the
/// declared content-type header.
///
/// The set of content-types the service may declare is provider-defined and
/// may grow; anything unrecognized resolves to [`ContentType::Opaque`] so the
/// caller can handle it rather than the decoder guessing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    /// `text/event-stream` (possibly with parameters): a sequence of
    /// `data: <json>` framed lines, each one incremental event.
    EventStream,
    /// Exactly `application/json`: one JSON document, possibly split across
    /// many byte chunks.
    Json,
    /// Anything else: returned to the caller unmodified.
    Opaque,
}

impl ContentType {
    /// Resolve a declared content-type string into a decoding strategy.
    pub fn from_header(header: &str) -> Self {
        if header.contains("text/event-stream") {
            ContentType::EventStream
        } else if header == "application/json" {
            ContentType::Json
        } else {
            ContentType::Opaque
        }
    }
}

// ---------------------------------------------------------------------------
// Invocation request / response
// ---------------------------------------------------------------------------

/// One invocation of a remote agent runtime.
///
/// Immutable once constructed; created per invocation and discarded after the
/// call completes.
#[derive(Debug, Clone)]
pub struct InvocationRequest {
    /// Opaque identifier of the target runtime (an ARN in the hosted
    /// service).
    pub runtime_arn: String,
    /// Endpoint qualifier. The service requires `"DEFAULT"` semantics; the
    /// value is otherwise uninterpreted by this crate.
    pub qualifier: String,
    /// Serialized request payload, typically JSON-encoded.
    pub payload: Vec<u8>,
}

impl InvocationRequest {
    /// Create a request against the `DEFAULT` endpoint qualifier.
    pub fn new(runtime_arn: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            runtime_arn: runtime_arn.into(),
            qualifier: "DEFAULT".to_string(),
            payload: payload.into(),
        }
    }

    /// Create a request whose payload is `{"prompt": <prompt>}`.
    pub fn from_prompt(runtime_arn: impl Into<String>, prompt: &str) -> Self {
        // A one-key object of strings cannot fail to serialize.
        let payload = serde_json::to_vec(&serde_json::json!({ "prompt": prompt }))
            .expect("JSON object of strings always serializes");
        Self::new(runtime_arn, payload)
    }
}

/// The raw byte-chunk source of an invocation response body.
///
/// The underlying transport is not seekable or replayable; the stream is
/// consumed exactly once.
pub type BodyStream = BoxStream<'static, AgentCoreResult<Bytes>>;

/// A raw response from an invocation call: a declared content-type plus an
/// exclusively-owned, forward-only byte-chunk stream.
///
/// Consumed exactly once by [`crate::client::StreamingResponseDecoder`].
pub struct InvocationResponse {
    content_type: String,
    body: BodyStream,
}

impl InvocationResponse {
    /// Wrap a content-type and a chunk stream.
    pub fn new(content_type: impl Into<String>, body: BodyStream) -> Self {
        Self {
            content_type: content_type.into(),
            body,
        }
    }

    /// Build a response from in-memory chunks. Mostly useful in tests and for
    /// transports that buffer.
    pub fn from_chunks(
        content_type: impl Into<String>,
        chunks: Vec<Bytes>,
    ) -> Self {
        use futures::StreamExt;
        let stream = futures::stream::iter(chunks.into_iter().map(Ok)).boxed();
        Self::new(content_type, stream)
    }

    /// The content-type string as declared by the service.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// The decoding strategy for this response.
    pub fn resolved_content_type(&self) -> ContentType {
        ContentType::from_header(&self.content_type)
    }

    /// Consume the response, yielding its parts.
    pub fn into_parts(self) -> (String, BodyStream) {
        (self.content_type, self.body)
    }
}

impl fmt::Debug for InvocationResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvocationResponse")
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Stream events
// ---------------------------------------------------------------------------

/// One decoded unit from a `data: ` framed line of an event-stream response.
///
/// Mirrors the service's nested JSON shape. Every level of the
/// `event → contentBlockDelta → delta → text` path is optional: absence at
/// any level means "no displayable text this event", not an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StreamEvent {
    /// The event envelope, if present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<EventPayload>,
}

/// The inner envelope of a [`StreamEvent`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventPayload {
    /// Incremental content delta, if this event carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_block_delta: Option<ContentBlockDelta>,
}

/// A content-block delta within an event.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ContentBlockDelta {
    /// The delta itself, if present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<Delta>,
}

/// The innermost delta: the displayable text fragment.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Delta {
    /// Incremental display text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl StreamEvent {
    /// Walk the optional field path `event.contentBlockDelta.delta.text`.
    ///
    /// Returns the fragment if every level is present and the text is
    /// non-empty; stops at the first missing level otherwise.
    pub fn text_fragment(&self) -> Option<&str> {
        self.event
            .as_ref()?
            .content_block_delta
            .as_ref()?
            .delta
            .as_ref()?
            .text
            .as_deref()
            .filter(|t| !t.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Deployment status
// ---------------------------------------------------------------------------

/// Deployment status of an agent runtime or runtime endpoint.
///
/// Reported by the provisioning API as SCREAMING_SNAKE_CASE strings. The set
/// of non-terminal states is open (the provider may add more), so anything
/// unrecognized is carried through as [`DeploymentStatus::Other`] and treated
/// as non-terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeploymentStatus {
    /// Resource creation in progress.
    Creating,
    /// Resource update in progress.
    Updating,
    /// Resource deletion in progress.
    Deleting,
    /// Deployed and accepting invocations. Terminal.
    Ready,
    /// Creation failed. Terminal.
    CreateFailed,
    /// Update failed. Terminal.
    UpdateFailed,
    /// Deletion failed. Terminal.
    DeleteFailed,
    /// Any other status reported by the provisioning API. Non-terminal.
    Other(String),
}

impl DeploymentStatus {
    /// True if no further transition is expected without external
    /// intervention.
    ///
    /// The terminal set is exactly `{READY, CREATE_FAILED, DELETE_FAILED,
    /// UPDATE_FAILED}`.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DeploymentStatus::Ready
                | DeploymentStatus::CreateFailed
                | DeploymentStatus::UpdateFailed
                | DeploymentStatus::DeleteFailed
        )
    }

    /// True for the `*_FAILED` terminal states.
    pub fn is_failed(&self) -> bool {
        matches!(
            self,
            DeploymentStatus::CreateFailed
                | DeploymentStatus::UpdateFailed
                | DeploymentStatus::DeleteFailed
        )
    }

    /// The wire string for this status.
    pub fn as_str(&self) -> &str {
        match self {
            DeploymentStatus::Creating => "CREATING",
            DeploymentStatus::Updating => "UPDATING",
            DeploymentStatus::Deleting => "DELETING",
            DeploymentStatus::Ready => "READY",
            DeploymentStatus::CreateFailed => "CREATE_FAILED",
            DeploymentStatus::UpdateFailed => "UPDATE_FAILED",
            DeploymentStatus::DeleteFailed => "DELETE_FAILED",
            DeploymentStatus::Other(s) => s,
        }
    }
}

impl From<String> for DeploymentStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "CREATING" => DeploymentStatus::Creating,
            "UPDATING" => DeploymentStatus::Updating,
            "DELETING" => DeploymentStatus::Deleting,
            "READY" => DeploymentStatus::Ready,
            "CREATE_FAILED" => DeploymentStatus::CreateFailed,
            "UPDATE_FAILED" => DeploymentStatus::UpdateFailed,
            "DELETE_FAILED" => DeploymentStatus::DeleteFailed,
            _ => DeploymentStatus::Other(s),
        }
    }
}

impl From<DeploymentStatus> for String {
    fn from(status: DeploymentStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Runtime directory
// ---------------------------------------------------------------------------

/// One registered runtime identity from the directory listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuntimeSummary {
    /// Human-readable runtime name.
    #[serde(rename = "agentRuntimeName")]
    pub name: String,
    /// Opaque runtime identifier used for invocation.
    #[serde(rename = "agentRuntimeArn")]
    pub arn: String,
    /// Short runtime ID used by control-plane operations (status, delete).
    #[serde(rename = "agentRuntimeId", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Last reported deployment status, when the listing includes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<DeploymentStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_resolution() {
        assert_eq!(
            ContentType::from_header("text/event-stream; charset=utf-8"),
            ContentType::EventStream
        );
        assert_eq!(
            ContentType::from_header("application/json"),
            ContentType::Json
        );
        // Exact match only for JSON: parameters push it to the fallback.
        assert_eq!(
            ContentType::from_header("application/json; charset=utf-8"),
            ContentType::Opaque
        );
        assert_eq!(
            ContentType::from_header("application/octet-stream"),
            ContentType::Opaque
        );
    }

    #[test]
    fn text_fragment_full_path() {
        let event: StreamEvent = serde_json::from_str(
            r#"{"event":{"contentBlockDelta":{"delta":{"text":"Hello"}}}}"#,
        )
        .unwrap();
        assert_eq!(event.text_fragment(), Some("Hello"));
    }

    #[test]
    fn text_fragment_missing_levels() {
        for json in [
            r#"{}"#,
            r#"{"event":{}}"#,
            r#"{"event":{"contentBlockDelta":{}}}"#,
            r#"{"event":{"contentBlockDelta":{"delta":{}}}}"#,
            r#"{"event":{"contentBlockDelta":{"delta":{"text":""}}}}"#,
        ] {
            let event: StreamEvent = serde_json::from_str(json).unwrap();
            assert_eq!(event.text_fragment(), None, "input: {json}");
        }
    }

    #[test]
    fn unrelated_fields_are_tolerated() {
        let event: StreamEvent = serde_json::from_str(
            r#"{"event":{"messageStart":{"role":"assistant"}},"trace":null}"#,
        )
        .unwrap();
        assert_eq!(event.text_fragment(), None);
    }

    #[test]
    fn deployment_status_wire_roundtrip() {
        for (wire, status) in [
            ("CREATING", DeploymentStatus::Creating),
            ("READY", DeploymentStatus::Ready),
            ("CREATE_FAILED", DeploymentStatus::CreateFailed),
            ("UPDATE_FAILED", DeploymentStatus::UpdateFailed),
            ("DELETE_FAILED", DeploymentStatus::DeleteFailed),
        ] {
            assert_eq!(DeploymentStatus::from(wire.to_string()), status);
            assert_eq!(status.as_str(), wire);
        }
    }

    #[test]
    fn terminal_set_is_exact() {
        assert!(DeploymentStatus::Ready.is_terminal());
        assert!(DeploymentStatus::CreateFailed.is_terminal());
        assert!(DeploymentStatus::UpdateFailed.is_terminal());
        assert!(DeploymentStatus::DeleteFailed.is_terminal());
        assert!(!DeploymentStatus::Creating.is_terminal());
        assert!(!DeploymentStatus::Updating.is_terminal());
        assert!(!DeploymentStatus::Other("PENDING_NETWORK".to_string()).is_terminal());
    }

    #[test]
    fn failed_excludes_ready() {
        assert!(!DeploymentStatus::Ready.is_failed());
        assert!(DeploymentStatus::CreateFailed.is_failed());
    }

    #[test]
    fn runtime_summary_wire_names() {
        let summary: RuntimeSummary = serde_json::from_str(
            r#"{
                "agentRuntimeName": "support_agent",
                "agentRuntimeArn": "arn:aws:bedrock-agentcore:us-west-2:123:runtime/support_agent-x1",
                "agentRuntimeId": "support_agent-x1",
                "status": "READY"
            }"#,
        )
        .unwrap();
        assert_eq!(summary.name, "support_agent");
        assert_eq!(summary.id.as_deref(), Some("support_agent-x1"));
        assert_eq!(summary.status, Some(DeploymentStatus::Ready));
    }

    #[test]
    fn prompt_request_payload_shape() {
        let req = InvocationRequest::from_prompt("arn:example", "hi there");
        assert_eq!(req.qualifier, "DEFAULT");
        let value: serde_json::Value = serde_json::from_slice(&req.payload).unwrap();
        assert_eq!(value, serde_json::json!({"prompt": "hi there"}));
    }
}
