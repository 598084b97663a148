//! Canvas Sessions
//!
//! Hosts artifact documents for a chat client.
//!
//! # Core Concepts
//!
//! - [`Workspace`]: routes inbound events to per-document sessions
//! - [`ArtifactSession`]: one tokio task per document, owning its state
//! - [`dispatch_action`]: runs action clicks and applies their commands in order
//! - [`MessageListBinder`]: memoized message list view model
//! - [`CanvasConfig`]: TOML configuration for queues, reveal policies, titles and logging
//!
//! # Example
//!
//! ```rust,ignore
//! use canvas_session::prelude::*;
//!
//! let registry = Arc::new(builtin_registry(Arc::new(UnavailableRunner))?);
//! let (workspace, mut outputs) =
//!     Workspace::new(registry, &CanvasConfig::default(), Arc::new(HeadlessPlatform::new()));
//!
//! workspace.route(&DocumentId::from("doc"), StreamEvent::delta(&ArtifactKind::TEXT, "Hello")).await?;
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod binder;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod models;
pub mod platform;
pub mod session;
pub mod telemetry;
pub mod title;
pub mod workspace;

pub use binder::{MessageListBinder, MessageListView, MessageRow};
pub use config::{CanvasConfig, LogConfig, TitleConfig};
pub use dispatcher::{action_states, apply_commands, dispatch_action, dispatch_toolbar, ActionState, DispatchReport};
pub use error::{ConfigError, SessionError};
pub use models::{chat_models, find_model, models_by_provider, resolve_model, ChatModel, DEFAULT_CHAT_MODEL};
pub use platform::HeadlessPlatform;
pub use session::{ArtifactSession, SessionHandle, SessionInput, SessionOutput, Snapshot};
pub use telemetry::init_tracing;
pub use title::{sanitize_title, title_or_fallback, TitleError, TitleGenerator};
pub use workspace::Workspace;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for hosting a canvas workspace
    pub use crate::{
        CanvasConfig, HeadlessPlatform, SessionError, SessionHandle, SessionOutput, Snapshot, Workspace,
    };
    pub use canvas_artifact::{ArtifactKind, ChatStatus, DocumentId, StreamEvent};
    pub use canvas_kinds::{builtin_registry, UnavailableRunner};
    pub use std::sync::Arc;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
