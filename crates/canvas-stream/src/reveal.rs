//! Reveal policy resolution
//!
//! Each definition ships a default [`RevealPolicy`]; configuration may
//! override it per kind.

use canvas_artifact::{ArtifactDefinition, ArtifactKind, RevealPolicy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-kind reveal overrides
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RevealConfig {
    overrides: BTreeMap<ArtifactKind, RevealPolicy>,
}

impl RevealConfig {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_override(mut self, kind: ArtifactKind, policy: RevealPolicy) -> Self {
        self.overrides.insert(kind, policy);
        self
    }

    /// Effective policy for `definition`
    #[must_use]
    pub fn policy_for(&self, definition: &ArtifactDefinition) -> RevealPolicy {
        self.overrides
            .get(definition.kind())
            .copied()
            .unwrap_or_else(|| definition.reveal_policy())
    }
}
