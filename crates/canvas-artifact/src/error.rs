//! Error types for the artifact model
//!
//! Registry misuse fails fast. Everything produced while streaming or
//! reacting to a click is recoverable and stays local to its document.

use crate::kind::ArtifactKind;
use crate::platform::Capability;
use crate::run::RunId;
use crate::state::DocumentId;

/// Registry misuse
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// A definition is already registered for this kind
    #[error("artifact kind already registered: {0}")]
    DuplicateKind(ArtifactKind),

    /// No definition is registered for this kind
    #[error("unknown artifact kind: {0}")]
    UnknownKind(ArtifactKind),

    /// Definition record declares a different kind than the registration key
    #[error("definition for {declared} registered under {registered}")]
    KindMismatch {
        registered: ArtifactKind,
        declared: ArtifactKind,
    },

    /// The process-wide registry has already been installed
    #[error("global artifact registry already installed")]
    AlreadyInstalled,
}

/// Definition record construction and lifecycle errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DefinitionError {
    /// Required handler missing from a definition record
    #[error("definition for {kind} is missing its {handler} handler")]
    MissingHandler {
        kind: ArtifactKind,
        handler: &'static str,
    },

    /// Initializer invoked a second time for the same activation
    #[error("document {0} is already initialized")]
    AlreadyInitialized(DocumentId),
}

/// Metadata did not match its definition's shape
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("metadata encode failed: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("metadata decode failed: {0}")]
    Decode(#[source] serde_json::Error),
}

/// A host capability (clipboard, file API) is missing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{capability} is not available on this platform")]
pub struct CapabilityUnavailable {
    pub capability: Capability,
}

impl CapabilityUnavailable {
    #[inline]
    #[must_use]
    pub fn new(capability: Capability) -> Self {
        Self { capability }
    }
}

/// An asynchronous result arrived after a newer run started
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{run} for {key} superseded by {latest:?}")]
pub struct RunSuperseded {
    pub key: String,
    pub run: RunId,
    pub latest: Option<RunId>,
}

/// Failure reported by an action's click handler
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    /// Host capability missing; retryable
    #[error(transparent)]
    Capability(#[from] CapabilityUnavailable),

    /// Content could not be interpreted for this action
    #[error("invalid content: {0}")]
    InvalidContent(String),

    /// Metadata did not match its definition
    #[error(transparent)]
    Metadata(#[from] MetadataError),
}

impl ActionError {
    /// Check if the user can meaningfully retry
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Capability(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_error_display() {
        let err = RegistryError::UnknownKind(ArtifactKind::new("video"));
        assert_eq!(err.to_string(), "unknown artifact kind: video");
    }

    #[test]
    fn missing_handler_display() {
        let err = DefinitionError::MissingHandler {
            kind: ArtifactKind::CODE,
            handler: "render",
        };
        assert!(err.to_string().contains("render"));
    }

    #[test]
    fn capability_is_retryable() {
        let err: ActionError = CapabilityUnavailable::new(Capability::Clipboard).into();
        assert!(err.is_retryable());
        assert!(!ActionError::InvalidContent("x".to_string()).is_retryable());
    }
}
