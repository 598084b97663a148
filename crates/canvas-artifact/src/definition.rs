//! Per-kind definition records
//!
//! An [`ArtifactDefinition`] bundles everything the workspace needs to host a
//! kind: initializer, stream reducer, renderer, actions and toolbar entries.
//! Records are immutable once built. [`DefinitionBuilder::build`] rejects a
//! record that omits a required handler, so a new kind cannot be registered
//! half-finished.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::action::{ActionDescriptor, ToolbarEntry};
use crate::error::DefinitionError;
use crate::event::StreamEvent;
use crate::kind::ArtifactKind;
use crate::metadata::Metadata;
use crate::state::{ArtifactState, ArtifactStatus, DocumentId};
use crate::view::View;

/// When a streaming artifact becomes visible
///
/// Visibility only ever moves from hidden to shown. The threshold form is a
/// product policy and can be overridden per kind through configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RevealPolicy {
    /// Show on the first delta
    #[default]
    Immediate,
    /// Show once the content reaches this many characters
    AfterChars(usize),
}

impl RevealPolicy {
    /// Visibility after applying `new_content` to a state that was `prior_visible`
    ///
    /// Pure and idempotent: re-applying the same content never hides anything.
    #[must_use]
    pub fn reveals(&self, prior_visible: bool, new_content: &str) -> bool {
        prior_visible
            || match self {
                Self::Immediate => true,
                Self::AfterChars(threshold) => new_content.chars().count() >= *threshold,
            }
    }
}

/// Context handed to a definition's initializer
#[derive(Debug, Clone, Copy)]
pub struct InitContext<'a> {
    pub kind: &'a ArtifactKind,
    pub document_id: &'a DocumentId,
}

pub type InitializeFn = Arc<dyn Fn(&InitContext<'_>) -> Metadata + Send + Sync>;
pub type ReduceFn = Arc<dyn Fn(&StreamEvent, ArtifactState) -> ArtifactState + Send + Sync>;
pub type RenderFn = Arc<dyn Fn(&ArtifactState) -> View + Send + Sync>;

/// Immutable registration record for one kind
#[derive(Clone)]
pub struct ArtifactDefinition {
    kind: ArtifactKind,
    description: String,
    reveal: RevealPolicy,
    initialize: InitializeFn,
    reduce: ReduceFn,
    render: RenderFn,
    actions: Vec<ActionDescriptor>,
    toolbar: Vec<ToolbarEntry>,
}

impl ArtifactDefinition {
    /// Start building a definition for `kind`
    #[must_use]
    pub fn builder(kind: ArtifactKind) -> DefinitionBuilder {
        DefinitionBuilder::new(kind)
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> &ArtifactKind {
        &self.kind
    }

    #[inline]
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[inline]
    #[must_use]
    pub fn reveal_policy(&self) -> RevealPolicy {
        self.reveal
    }

    #[inline]
    #[must_use]
    pub fn actions(&self) -> &[ActionDescriptor] {
        &self.actions
    }

    #[inline]
    #[must_use]
    pub fn toolbar(&self) -> &[ToolbarEntry] {
        &self.toolbar
    }

    /// Set the initial metadata for an activation
    ///
    /// # Errors
    /// Returns [`DefinitionError::AlreadyInitialized`] if `state` has already
    /// been through its initializer
    pub fn initialize(&self, state: &mut ArtifactState) -> Result<(), DefinitionError> {
        if state.is_initialized() {
            return Err(DefinitionError::AlreadyInitialized(state.document_id.clone()));
        }
        let ctx = InitContext {
            kind: &self.kind,
            document_id: &state.document_id,
        };
        state.metadata = (self.initialize)(&ctx);
        state.mark_initialized();
        Ok(())
    }

    /// Fold one event into `state`
    ///
    /// Events that are not this kind's delta come back unchanged; the reducer
    /// only ever sees its own payloads.
    #[must_use]
    pub fn reduce_delta(&self, event: &StreamEvent, state: ArtifactState) -> ArtifactState {
        match event.delta_kind() {
            Some(kind) if kind == self.kind => (self.reduce)(event, state),
            _ => state,
        }
    }

    /// Render the current state; never fails
    #[must_use]
    pub fn render(&self, state: &ArtifactState) -> View {
        (self.render)(state)
    }
}

impl fmt::Debug for ArtifactDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArtifactDefinition")
            .field("kind", &self.kind)
            .field("description", &self.description)
            .field("reveal", &self.reveal)
            .field("actions", &self.actions)
            .field("toolbar", &self.toolbar)
            .finish_non_exhaustive()
    }
}

/// Reducer that replaces content with the event's snapshot
///
/// Deltas carry the full current content, so this is the right reducer for
/// every kind whose content is the raw payload text.
#[must_use]
pub fn replace_content(event: &StreamEvent, mut state: ArtifactState) -> ArtifactState {
    state.content = event.payload_text();
    state.status = ArtifactStatus::Streaming;
    state
}

/// Builder for [`ArtifactDefinition`]
pub struct DefinitionBuilder {
    kind: ArtifactKind,
    description: String,
    reveal: RevealPolicy,
    initialize: Option<InitializeFn>,
    reduce: Option<ReduceFn>,
    render: Option<RenderFn>,
    actions: Vec<ActionDescriptor>,
    toolbar: Vec<ToolbarEntry>,
}

impl DefinitionBuilder {
    #[must_use]
    pub fn new(kind: ArtifactKind) -> Self {
        Self {
            kind,
            description: String::new(),
            reveal: RevealPolicy::default(),
            initialize: None,
            reduce: None,
            render: None,
            actions: Vec::new(),
            toolbar: Vec::new(),
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn reveal(mut self, policy: RevealPolicy) -> Self {
        self.reveal = policy;
        self
    }

    #[must_use]
    pub fn initialize<F>(mut self, f: F) -> Self
    where
        F: Fn(&InitContext<'_>) -> Metadata + Send + Sync + 'static,
    {
        self.initialize = Some(Arc::new(f));
        self
    }

    /// Initializer for kinds that keep no metadata
    #[must_use]
    pub fn without_metadata(self) -> Self {
        self.initialize(|_| Metadata::empty())
    }

    #[must_use]
    pub fn on_stream_part<F>(mut self, f: F) -> Self
    where
        F: Fn(&StreamEvent, ArtifactState) -> ArtifactState + Send + Sync + 'static,
    {
        self.reduce = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn content<F>(mut self, f: F) -> Self
    where
        F: Fn(&ArtifactState) -> View + Send + Sync + 'static,
    {
        self.render = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn action(mut self, action: ActionDescriptor) -> Self {
        self.actions.push(action);
        self
    }

    #[must_use]
    pub fn toolbar_entry(mut self, entry: ToolbarEntry) -> Self {
        self.toolbar.push(entry);
        self
    }

    /// Validate and freeze the record
    ///
    /// # Errors
    /// Returns [`DefinitionError::MissingHandler`] naming the first absent
    /// handler
    pub fn build(self) -> Result<ArtifactDefinition, DefinitionError> {
        let missing = |handler| DefinitionError::MissingHandler {
            kind: self.kind.clone(),
            handler,
        };
        let initialize = self.initialize.clone().ok_or_else(|| missing("initialize"))?;
        let reduce = self.reduce.clone().ok_or_else(|| missing("stream"))?;
        let render = self.render.clone().ok_or_else(|| missing("content"))?;

        Ok(ArtifactDefinition {
            kind: self.kind,
            description: self.description,
            reveal: self.reveal,
            initialize,
            reduce,
            render,
            actions: self.actions,
            toolbar: self.toolbar,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::Icon;
    use serde_json::json;

    fn echo_definition() -> ArtifactDefinition {
        ArtifactDefinition::builder(ArtifactKind::TEXT)
            .description("echo")
            .initialize(|ctx| Metadata::from_typed(&json!({"doc": ctx.document_id.as_str()})).unwrap())
            .on_stream_part(replace_content)
            .content(|state| View::placeholder(state.content.clone()))
            .toolbar_entry(ToolbarEntry::prompt(Icon::Pen, "Fix", "Fix it."))
            .build()
            .unwrap()
    }

    #[test]
    fn build_rejects_missing_renderer() {
        let result = ArtifactDefinition::builder(ArtifactKind::CODE)
            .without_metadata()
            .on_stream_part(replace_content)
            .build();
        assert!(matches!(
            result,
            Err(DefinitionError::MissingHandler { handler: "content", .. })
        ));
    }

    #[test]
    fn build_rejects_missing_initializer() {
        let result = ArtifactDefinition::builder(ArtifactKind::CODE)
            .on_stream_part(replace_content)
            .content(|_| View::placeholder(""))
            .build();
        assert!(matches!(
            result,
            Err(DefinitionError::MissingHandler { handler: "initialize", .. })
        ));
    }

    #[test]
    fn initialize_runs_once() {
        let def = echo_definition();
        let mut state = ArtifactState::new(ArtifactKind::TEXT, DocumentId::from("d1"));
        def.initialize(&mut state).unwrap();
        assert_eq!(state.metadata.as_json()["doc"], "d1");
        assert!(matches!(
            def.initialize(&mut state),
            Err(DefinitionError::AlreadyInitialized(_))
        ));
    }

    #[test]
    fn reduce_ignores_foreign_and_unknown_events() {
        let def = echo_definition();
        let state = ArtifactState::new(ArtifactKind::TEXT, DocumentId::from("d1"));
        let sheet = StreamEvent::delta(&ArtifactKind::SHEET, "a,b");
        let unknown = StreamEvent::new("data-telemetry", json!({"x": 1}));
        assert_eq!(def.reduce_delta(&sheet, state.clone()), state);
        assert_eq!(def.reduce_delta(&unknown, state.clone()), state);
    }

    #[test]
    fn reduce_replaces_rather_than_appends() {
        let def = echo_definition();
        let state = ArtifactState::new(ArtifactKind::TEXT, DocumentId::from("d1"));
        let state = def.reduce_delta(&StreamEvent::delta(&ArtifactKind::TEXT, "Hello"), state);
        let state = def.reduce_delta(&StreamEvent::delta(&ArtifactKind::TEXT, "Hello world"), state);
        assert_eq!(state.content, "Hello world");
        assert_eq!(state.status, ArtifactStatus::Streaming);
    }

    #[test]
    fn reveal_policy_thresholds() {
        assert!(RevealPolicy::Immediate.reveals(false, ""));
        assert!(!RevealPolicy::AfterChars(5).reveals(false, "abcd"));
        assert!(RevealPolicy::AfterChars(5).reveals(false, "abcde"));
        assert!(RevealPolicy::AfterChars(5).reveals(true, ""));
    }

    #[test]
    fn reveal_policy_serde() {
        let policy: RevealPolicy = serde_json::from_value(json!({"after_chars": 300})).unwrap();
        assert_eq!(policy, RevealPolicy::AfterChars(300));
        let policy: RevealPolicy = serde_json::from_value(json!("immediate")).unwrap();
        assert_eq!(policy, RevealPolicy::Immediate);
    }
}
