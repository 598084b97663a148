//! Per-document stream phase machine
//!
//! ```text
//! Uninitialized ──delta──▶ Streaming ──complete──▶ Complete
//!       │                   │  ▲                      │
//!       │                   │  └──────delta───────────┤
//!       └────malformed──────┴──────▶ Error ◀──────────┘
//! ```
//!
//! A finished document (complete or error) re-enters `Streaming` when a new
//! delta arrives, which is how regeneration appends a later version.

use canvas_artifact::ArtifactStatus;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TransitionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StreamPhase {
    #[default]
    Uninitialized,
    Streaming,
    Complete,
    Error,
}

impl StreamPhase {
    /// Externally visible status for this phase
    #[inline]
    #[must_use]
    pub fn status(self) -> ArtifactStatus {
        match self {
            Self::Uninitialized => ArtifactStatus::Idle,
            Self::Streaming => ArtifactStatus::Streaming,
            Self::Complete => ArtifactStatus::Complete,
            Self::Error => ArtifactStatus::Error,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Complete | Self::Error)
    }
}

impl fmt::Display for StreamPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uninitialized => "uninitialized",
            Self::Streaming => "streaming",
            Self::Complete => "complete",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}

/// Phases reachable from `from` in one step
#[must_use]
pub fn allowed_transitions(from: StreamPhase) -> Vec<StreamPhase> {
    use StreamPhase::{Complete, Error, Streaming, Uninitialized};
    match from {
        Uninitialized => vec![Streaming, Error],
        Streaming => vec![Streaming, Complete, Error],
        Complete => vec![Streaming, Error],
        Error => vec![Streaming, Error],
    }
}

/// Validate a phase transition
///
/// # Errors
/// Returns [`TransitionError::Illegal`] if `to` is not reachable from `from`
pub fn validate_transition(from: StreamPhase, to: StreamPhase) -> Result<(), TransitionError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(TransitionError::Illegal { from, to })
    }
}
