//! Reconciliation errors

use canvas_artifact::{DefinitionError, RegistryError};

use crate::state_machine::StreamPhase;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("illegal stream transition: {from} -> {to}")]
    Illegal { from: StreamPhase, to: StreamPhase },
}

/// Failure routing an event to a document
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StreamError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Definition(#[from] DefinitionError),
}
