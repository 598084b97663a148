//! Canvas Artifact Model
//!
//! Kind-polymorphic artifacts for a chat client's side canvas.
//!
//! # Core Concepts
//!
//! - [`ArtifactKind`]: Open string tag naming a family of artifacts
//! - [`ArtifactDefinition`]: Per-kind record of initializer, reducer, renderer,
//!   actions and toolbar entries
//! - [`ArtifactRegistry`]: Single lookup point from kind to definition
//! - [`StreamEvent`]: `{type, data}` content snapshot from the backend
//! - [`ArtifactState`]: Per-document state the reducers fold into
//! - [`Command`]: Deferred output of an action click
//!
//! # Example
//!
//! ```rust,ignore
//! use canvas_artifact::prelude::*;
//!
//! let definition = ArtifactDefinition::builder(ArtifactKind::TEXT)
//!     .without_metadata()
//!     .on_stream_part(replace_content)
//!     .content(|state| View::placeholder(state.content.clone()))
//!     .build()?;
//!
//! let mut registry = ArtifactRegistry::new();
//! registry.register(ArtifactKind::TEXT, definition)?;
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod action;
mod definition;
mod error;
mod event;
mod hash;
mod kind;
mod message;
mod metadata;
mod platform;
mod registry;
mod run;
mod state;
mod view;

pub use action::{
    ActionContext, ActionDescriptor, ClickFn, Command, DisabledFn, Effect, ToolbarContext,
    ToolbarEntry, ToolbarFn, VersionChange, VersionCursor,
};
pub use definition::{
    replace_content, ArtifactDefinition, DefinitionBuilder, InitContext, InitializeFn, ReduceFn,
    RenderFn, RevealPolicy,
};
pub use error::{
    ActionError, CapabilityUnavailable, DefinitionError, MetadataError, RegistryError,
    RunSuperseded,
};
pub use event::{EventTag, MalformedSignal, StreamEvent, TerminalSignal};
pub use hash::{ContentHash, HashError};
pub use kind::ArtifactKind;
pub use message::{ChatMessage, ChatStatus, MessagePart, Role, ToolState, Vote};
pub use metadata::{typed_update, Metadata, MetadataUpdate};
pub use platform::{Capability, FileExport, NoPlatform, Notification, NotificationLevel, Platform};
pub use registry::{global_registry, install_global, ArtifactRegistry};
pub use run::{RunId, RunLedger};
pub use state::{ArtifactState, ArtifactStatus, DocumentId};
pub use view::{CodeView, DocumentView, GridView, Icon, Placeholder, View};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for defining and hosting artifact kinds
    pub use crate::{
        replace_content, ActionContext, ActionDescriptor, ActionError, ArtifactDefinition,
        ArtifactKind, ArtifactRegistry, ArtifactState, ArtifactStatus, ChatMessage, Command,
        DocumentId, Icon, Metadata, Notification, Platform, RevealPolicy, StreamEvent,
        ToolbarContext, ToolbarEntry, VersionChange, View,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn upper_definition() -> ArtifactDefinition {
        ArtifactDefinition::builder(ArtifactKind::new("shout"))
            .without_metadata()
            .on_stream_part(|event, mut state| {
                state.content = event.payload_text().to_uppercase();
                state.status = ArtifactStatus::Streaming;
                state
            })
            .content(|state| {
                View::Document(DocumentView {
                    body: state.content.clone(),
                    is_streaming: state.is_streaming(),
                })
            })
            .build()
            .unwrap()
    }

    #[test]
    fn custom_kind_end_to_end() {
        let mut registry = ArtifactRegistry::new();
        registry.register_definition(upper_definition()).unwrap();

        let kind = ArtifactKind::new("shout");
        let def = registry.resolve(&kind).unwrap();
        let mut state = ArtifactState::new(kind.clone(), DocumentId::from("d"));
        def.initialize(&mut state).unwrap();

        let event: StreamEvent =
            serde_json::from_value(json!({"type": "data-shoutDelta", "data": "hi"})).unwrap();
        let state = def.reduce_delta(&event, state);

        assert_eq!(
            def.render(&state),
            View::Document(DocumentView {
                body: "HI".to_string(),
                is_streaming: true,
            })
        );
    }

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
