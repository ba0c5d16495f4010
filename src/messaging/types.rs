//! Wire types exchanged with the chat backend.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Request body for `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// A structured event produced by the backend for one round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    /// The reply shown to the user.
    FinalResponse {
        text: String,
        /// Kept only when the backend sends a string.
        #[serde(
            default,
            deserialize_with = "string_or_none",
            skip_serializing_if = "Option::is_none"
        )]
        agent_name: Option<String>,
    },
    /// Control moved from one sub-agent to another.
    AgentTransfer { from: String, to: String },
    /// Backend-side failure surfaced as an event. Only the message is read.
    Error { message: String },
    /// Diagnostic output from a sub-agent.
    IntermediateMessage { author: String, text: String },
    /// Anything the client does not understand, including events with
    /// missing or mistyped fields.
    #[serde(other)]
    Unknown,
}

impl ChatEvent {
    /// Decode a single raw event, falling back to [`ChatEvent::Unknown`].
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_else(|err| {
            tracing::debug!("Dropping undecodable chat event: {}", err);
            ChatEvent::Unknown
        })
    }

    /// Create a final response event.
    pub fn final_response(text: impl Into<String>, agent_name: Option<&str>) -> Self {
        Self::FinalResponse {
            text: text.into(),
            agent_name: agent_name.map(str::to_string),
        }
    }

    /// Create an agent transfer event.
    pub fn agent_transfer(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::AgentTransfer {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Create an error event.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Create an intermediate message event.
    pub fn intermediate(author: impl Into<String>, text: impl Into<String>) -> Self {
        Self::IntermediateMessage {
            author: author.into(),
            text: text.into(),
        }
    }
}

fn string_or_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(name) => Some(name),
        _ => None,
    })
}

/// Successful response body of `POST /chat`.
///
/// Events are kept raw so each one is decoded independently.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub events: Option<Vec<Value>>,
    /// Echo of the final reply; not rendered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_name: Option<Value>,
}

impl ChatResponse {
    /// Build a response from already-typed events.
    pub fn from_events(events: impl IntoIterator<Item = ChatEvent>) -> Self {
        let raw = events
            .into_iter()
            .filter_map(|event| serde_json::to_value(event).ok())
            .collect();
        Self {
            events: Some(raw),
            ..Default::default()
        }
    }

    /// Decoded events in arrival order.
    pub fn events(&self) -> Vec<ChatEvent> {
        self.events
            .iter()
            .flatten()
            .cloned()
            .map(ChatEvent::from_value)
            .collect()
    }
}

/// Body of a non-success response, read best-effort.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorBody {
    pub response: Option<Value>,
    pub detail: Option<Value>,
}

impl ErrorBody {
    /// Extract the known fields from any JSON value; non-objects yield an empty body.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(mut map) => Self {
                response: map.remove("response"),
                detail: map.remove("detail"),
            },
            _ => Self::default(),
        }
    }
}

/// Human-readable detail for a failed HTTP round-trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorDetail {
    /// The backend explained the failure in its `response` field.
    Server(String),
    /// Request validation failure reported through `detail`.
    Validation(String),
    /// No usable body; only the status line is known.
    Status { code: u16, reason: String },
}

impl ErrorDetail {
    /// Pick the most specific detail available: `response`, then `detail`,
    /// then the status line.
    pub fn from_failure(code: u16, reason: &str, body: Option<&ErrorBody>) -> Self {
        let body = body.cloned().unwrap_or_default();
        if let Some(text) = body.response.as_ref().and_then(truthy_text) {
            return Self::Server(text);
        }
        if let Some(text) = body.detail.as_ref().and_then(truthy_text) {
            return Self::Validation(text);
        }
        Self::Status {
            code,
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Server(text) => write!(f, "Error from server: {}", text),
            Self::Validation(text) => write!(f, "Server validation error: {}", text),
            Self::Status { code, reason } => write!(f, "HTTP error! status: {} - {}", code, reason),
        }
    }
}

/// Render a JSON value as text if it is truthy.
///
/// `null`, `false`, `0` and `""` are falsy. Strings are used verbatim,
/// anything else is rendered as compact JSON.
pub fn truthy_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::Bool(true) => Some("true".to_string()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
