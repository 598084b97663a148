//! Per-document artifact state
//!
//! [`ArtifactState`] is the value the reconciler folds stream events into and
//! the renderers read from. Content is always a string; metadata is opaque.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::kind::ArtifactKind;
use crate::metadata::Metadata;

/// Backend-assigned document identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Generate a fresh random identifier
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Externally visible artifact status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactStatus {
    #[default]
    Idle,
    Streaming,
    Complete,
    Error,
}

impl fmt::Display for ArtifactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Streaming => write!(f, "streaming"),
            Self::Complete => write!(f, "complete"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Artifact state for one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactState {
    pub kind: ArtifactKind,
    pub document_id: DocumentId,
    pub title: String,
    pub content: String,
    pub status: ArtifactStatus,
    pub is_visible: bool,
    pub current_version_index: usize,
    pub metadata: Metadata,
    initialized: bool,
}

impl ArtifactState {
    /// Fresh, uninitialized state for a document of `kind`
    #[must_use]
    pub fn new(kind: ArtifactKind, document_id: DocumentId) -> Self {
        Self {
            kind,
            document_id,
            title: String::new(),
            content: String::new(),
            status: ArtifactStatus::Idle,
            is_visible: false,
            current_version_index: 0,
            metadata: Metadata::empty(),
            initialized: false,
        }
    }

    /// Whether the definition's initializer has already run
    #[inline]
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub(crate) fn mark_initialized(&mut self) {
        self.initialized = true;
    }

    #[inline]
    #[must_use]
    pub fn is_streaming(&self) -> bool {
        self.status == ArtifactStatus::Streaming
    }
}
