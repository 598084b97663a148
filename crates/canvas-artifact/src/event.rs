//! Inbound stream events and terminal signals
//!
//! Wire shape: `{ "type": "data-<kind>Delta", "data": <payload> }`. A delta
//! carries a full point-in-time snapshot of the content, never a patch.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

use crate::kind::ArtifactKind;

const FINISH_TAG: &str = "data-finish";
const CLEAR_TAG: &str = "data-clear";
const TITLE_TAG: &str = "data-title";

/// Content-update event from the backend stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub data: JsonValue,
}

/// Classified event tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventTag {
    /// `data-<kind>Delta`
    Delta(ArtifactKind),
    /// `data-finish`
    Finish,
    /// `data-clear`
    Clear,
    /// `data-title`
    Title,
    /// Anything else; always ignored
    Unknown,
}

impl StreamEvent {
    #[must_use]
    pub fn new(event_type: impl Into<String>, data: JsonValue) -> Self {
        Self {
            event_type: event_type.into(),
            data,
        }
    }

    /// Content snapshot for `kind`
    #[must_use]
    pub fn delta(kind: &ArtifactKind, data: impl Into<JsonValue>) -> Self {
        Self::new(kind.delta_event_type(), data.into())
    }

    /// Terminal signal carried in-band
    #[must_use]
    pub fn finish(signal: &str) -> Self {
        Self::new(FINISH_TAG, JsonValue::String(signal.to_string()))
    }

    #[must_use]
    pub fn clear() -> Self {
        Self::new(CLEAR_TAG, JsonValue::Null)
    }

    #[must_use]
    pub fn title(title: &str) -> Self {
        Self::new(TITLE_TAG, JsonValue::String(title.to_string()))
    }

    #[must_use]
    pub fn tag(&self) -> EventTag {
        match self.event_type.as_str() {
            FINISH_TAG => EventTag::Finish,
            CLEAR_TAG => EventTag::Clear,
            TITLE_TAG => EventTag::Title,
            other => ArtifactKind::from_delta_event_type(other)
                .map_or(EventTag::Unknown, EventTag::Delta),
        }
    }

    /// Kind this event carries content for, if it is a delta
    #[must_use]
    pub fn delta_kind(&self) -> Option<ArtifactKind> {
        match self.tag() {
            EventTag::Delta(kind) => Some(kind),
            _ => None,
        }
    }

    /// Payload flattened to text
    ///
    /// Strings are returned as-is; structured payloads (sheet objects) are
    /// stored as their compact JSON text so content stays a string.
    #[must_use]
    pub fn payload_text(&self) -> String {
        match &self.data {
            JsonValue::String(text) => text.clone(),
            JsonValue::Null => String::new(),
            other => other.to_string(),
        }
    }
}

/// Externally supplied end-of-stream signal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalSignal {
    Complete,
    Error(Option<String>),
}

/// A terminal signal that could not be understood
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed terminal signal: {raw:?}")]
pub struct MalformedSignal {
    pub raw: String,
}

impl TerminalSignal {
    /// Parse a raw signal
    ///
    /// # Errors
    /// Returns [`MalformedSignal`] for anything that is neither a completion
    /// nor an error marker
    pub fn parse(raw: &str) -> Result<Self, MalformedSignal> {
        let trimmed = raw.trim();
        let lower = trimmed.to_ascii_lowercase();
        match lower.as_str() {
            "complete" | "completed" | "finish" | "finished" | "ready" | "done" => {
                Ok(Self::Complete)
            }
            "error" => Ok(Self::Error(None)),
            _ if lower.starts_with("error:") => {
                let message = trimmed["error:".len()..].trim();
                Ok(Self::Error((!message.is_empty()).then(|| message.to_string())))
            }
            _ => Err(MalformedSignal {
                raw: raw.to_string(),
            }),
        }
    }
}

impl fmt::Display for TerminalSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Complete => write!(f, "complete"),
            Self::Error(None) => write!(f, "error"),
            Self::Error(Some(message)) => write!(f, "error: {message}"),
        }
    }
}
