//! Canvas Built-in Kinds
//!
//! The canonical `text`, `sheet` and `code` artifact definitions, together
//! with the adapters that turn their content into widget input.
//!
//! # Example
//!
//! ```rust,ignore
//! use canvas_kinds::{builtin_registry, UnavailableRunner};
//! use std::sync::Arc;
//!
//! let registry = builtin_registry(Arc::new(UnavailableRunner))?;
//! assert_eq!(registry.len(), 3);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod adapter;
pub mod code;
mod common;
pub mod sheet;
pub mod text;

pub use code::{CodeMetadata, CodeRunner, ConsoleOutput, ConsoleStatus, RunnerError, UnavailableRunner};
pub use sheet::{SheetColumn, SheetData, SheetParseError, SheetRow};

use canvas_artifact::{ArtifactRegistry, DefinitionError, RegistryError};
use std::sync::Arc;

/// Failure assembling the built-in registry
#[derive(Debug, thiserror::Error)]
pub enum BuiltinError {
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Register the built-in kinds into `registry`
///
/// # Errors
/// Returns [`BuiltinError::Registry`] if any built-in kind is already present
pub fn register_builtins(
    registry: &mut ArtifactRegistry,
    runner: Arc<dyn CodeRunner>,
) -> Result<(), BuiltinError> {
    registry.register_definition(text::definition()?)?;
    registry.register_definition(code::definition(runner)?)?;
    registry.register_definition(sheet::definition()?)?;
    Ok(())
}

/// Fresh registry holding exactly the built-in kinds
///
/// # Errors
/// Returns error if a built-in definition fails validation
pub fn builtin_registry(runner: Arc<dyn CodeRunner>) -> Result<ArtifactRegistry, BuiltinError> {
    let mut registry = ArtifactRegistry::new();
    register_builtins(&mut registry, runner)?;
    Ok(registry)
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
