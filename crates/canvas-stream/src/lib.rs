//! Canvas Stream Reconciliation
//!
//! Folds ordered content snapshots into versioned per-document artifact
//! state.
//!
//! # Core Concepts
//!
//! - [`StreamPhase`]: `uninitialized → streaming → complete | error`
//! - [`DocumentStream`]: one document's state, phase, history and run ledger
//! - [`VersionStore`]: linear history with clamped prev/next navigation
//! - [`StreamReconciler`]: routes events across documents by id
//! - [`RevealConfig`]: per-kind visibility policy overrides

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod document;
pub mod error;
pub mod reconciler;
pub mod reveal;
pub mod state_machine;
pub mod version;

pub use document::{DocumentStream, Outcome};
pub use error::{StreamError, TransitionError};
pub use reconciler::StreamReconciler;
pub use reveal::RevealConfig;
pub use state_machine::{allowed_transitions, validate_transition, StreamPhase};
pub use version::{Version, VersionStore};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
