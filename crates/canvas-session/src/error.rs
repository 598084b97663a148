//! Error types for canvas sessions
//!
//! Classifies failures for the caller:
//! - retryable: a host capability was missing, the user may try again
//! - silent: a stale async result, dropped without any user-visible trace
//! - everything else is reported once and never crosses into another document

use canvas_artifact::{
    ActionError, ArtifactKind, CapabilityUnavailable, DocumentId, RegistryError, RunSuperseded,
};
use canvas_kinds::BuiltinError;
use canvas_stream::StreamError;
use std::path::PathBuf;

/// Main session error type
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("stream error: {0}")]
    Stream(#[from] StreamError),

    #[error("action failed: {0}")]
    Action(#[from] ActionError),

    #[error(transparent)]
    Capability(#[from] CapabilityUnavailable),

    #[error(transparent)]
    Superseded(#[from] RunSuperseded),

    #[error("built-in kinds unavailable: {0}")]
    Builtin(#[from] BuiltinError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// No action at this position for the kind
    #[error("{kind} has no action at index {index}")]
    UnknownAction { kind: ArtifactKind, index: usize },

    /// No toolbar entry at this position for the kind
    #[error("{kind} has no toolbar entry at index {index}")]
    UnknownToolbarEntry { kind: ArtifactKind, index: usize },

    /// The document's session has shut down
    #[error("session for {0} is closed")]
    Closed(DocumentId),

    #[error("global artifact registry has not been installed")]
    RegistryNotInstalled,
}

impl SessionError {
    /// Check if the user can meaningfully retry
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Capability(_) => true,
            Self::Action(err) => err.is_retryable(),
            _ => false,
        }
    }

    /// Check if the error should be dropped without reporting
    #[inline]
    #[must_use]
    pub fn is_silent(&self) -> bool {
        matches!(self, Self::Superseded(_))
    }
}

/// Configuration loading failure
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}
