//! Single-document stream reconciliation
//!
//! [`DocumentStream`] owns one document's [`ArtifactState`], phase, version
//! history and run ledger. Events are applied strictly in arrival order; no
//! buffering or reordering happens here.
//!
//! Definition code (reducers, renderers, metadata updates) runs under
//! `catch_unwind`. A panic moves only this document to the error phase and
//! leaves its last good state in place.

use canvas_artifact::{
    ActionContext, ArtifactDefinition, ArtifactKind, ArtifactState, ChatStatus, DefinitionError,
    DocumentId, EventTag, Metadata, MetadataUpdate, Platform, RevealPolicy, RunId, RunLedger,
    RunSuperseded, StreamEvent, TerminalSignal, ToolbarContext, VersionChange, VersionCursor, View,
};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use crate::state_machine::{validate_transition, StreamPhase};
use crate::version::VersionStore;

/// What applying an input did to the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing changed
    Ignored,
    /// State changed without a new version
    Updated,
    /// A version was recorded at this index
    Committed(usize),
    /// The document moved to the error phase
    Failed,
}

impl Outcome {
    #[inline]
    #[must_use]
    pub fn is_change(self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

#[derive(Debug, Clone)]
pub struct DocumentStream {
    definition: Arc<ArtifactDefinition>,
    reveal: RevealPolicy,
    phase: StreamPhase,
    state: ArtifactState,
    versions: VersionStore,
    runs: RunLedger,
}

impl DocumentStream {
    #[must_use]
    pub fn new(definition: Arc<ArtifactDefinition>, document_id: DocumentId, reveal: RevealPolicy) -> Self {
        let state = ArtifactState::new(definition.kind().clone(), document_id);
        Self {
            definition,
            reveal,
            phase: StreamPhase::Uninitialized,
            state,
            versions: VersionStore::new(),
            runs: RunLedger::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> &ArtifactState {
        &self.state
    }

    #[inline]
    #[must_use]
    pub fn phase(&self) -> StreamPhase {
        self.phase
    }

    #[inline]
    #[must_use]
    pub fn versions(&self) -> &VersionStore {
        &self.versions
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> &ArtifactKind {
        self.definition.kind()
    }

    #[inline]
    #[must_use]
    pub fn document_id(&self) -> &DocumentId {
        &self.state.document_id
    }

    #[inline]
    #[must_use]
    pub fn definition(&self) -> &Arc<ArtifactDefinition> {
        &self.definition
    }

    #[inline]
    #[must_use]
    pub fn cursor(&self) -> VersionCursor {
        self.versions.cursor()
    }

    /// Explicit activation: run the definition's initializer
    ///
    /// # Errors
    /// Returns [`DefinitionError::AlreadyInitialized`] on a second activation
    pub fn activate(&mut self) -> Result<(), DefinitionError> {
        self.definition.initialize(&mut self.state)?;
        tracing::info!(document = %self.state.document_id, kind = %self.kind(), "artifact activated");
        Ok(())
    }

    fn ensure_initialized(&mut self) {
        if !self.state.is_initialized() {
            if let Err(err) = self.activate() {
                tracing::debug!(error = %err, "implicit activation skipped");
            }
        }
    }

    fn transition(&mut self, to: StreamPhase) -> bool {
        if let Err(err) = validate_transition(self.phase, to) {
            tracing::debug!(document = %self.state.document_id, error = %err, "transition rejected");
            return false;
        }
        self.phase = to;
        self.state.status = to.status();
        true
    }

    /// Apply one inbound stream event
    pub fn apply(&mut self, event: &StreamEvent) -> Outcome {
        match event.tag() {
            EventTag::Delta(kind) if &kind == self.kind() => self.apply_delta(event),
            EventTag::Delta(kind) => {
                tracing::debug!(
                    document = %self.state.document_id,
                    active = %self.kind(),
                    event_kind = %kind,
                    "delta for another kind ignored"
                );
                Outcome::Ignored
            }
            EventTag::Finish => {
                let raw = event.payload_text();
                if raw.is_empty() {
                    self.finish(TerminalSignal::Complete)
                } else {
                    self.terminate(&raw)
                }
            }
            EventTag::Clear => self.clear(),
            EventTag::Title => {
                self.state.title = event.payload_text();
                Outcome::Updated
            }
            EventTag::Unknown => Outcome::Ignored,
        }
    }

    /// Apply events in order; identical to applying them one at a time
    pub fn apply_batch<'e, I>(&mut self, events: I) -> Outcome
    where
        I: IntoIterator<Item = &'e StreamEvent>,
    {
        events
            .into_iter()
            .map(|event| self.apply(event))
            .fold(Outcome::Ignored, |acc, next| match next {
                Outcome::Ignored => acc,
                other => other,
            })
    }

    fn apply_delta(&mut self, event: &StreamEvent) -> Outcome {
        self.ensure_initialized();
        if !self.transition(StreamPhase::Streaming) {
            return Outcome::Ignored;
        }

        let definition = Arc::clone(&self.definition);
        let previous = self.state.clone();
        match catch_unwind(AssertUnwindSafe(|| definition.reduce_delta(event, previous))) {
            Ok(mut next) => {
                next.is_visible = self.reveal.reveals(self.state.is_visible, &next.content);
                next.status = self.phase.status();
                next.current_version_index = self.versions.current_index();
                self.state = next;
                Outcome::Updated
            }
            Err(_) => self.fail("reducer panicked"),
        }
    }

    fn clear(&mut self) -> Outcome {
        self.ensure_initialized();
        if !self.transition(StreamPhase::Streaming) {
            return Outcome::Ignored;
        }
        self.state.content.clear();
        Outcome::Updated
    }

    /// Parse and apply a raw terminal signal; malformed input is an error
    pub fn terminate(&mut self, raw: &str) -> Outcome {
        match TerminalSignal::parse(raw) {
            Ok(signal) => self.finish(signal),
            Err(err) => {
                tracing::warn!(document = %self.state.document_id, error = %err, "malformed terminal signal");
                self.fail(&err.to_string())
            }
        }
    }

    /// Apply a parsed terminal signal
    pub fn finish(&mut self, signal: TerminalSignal) -> Outcome {
        match signal {
            TerminalSignal::Complete => self.complete(),
            TerminalSignal::Error(message) => {
                self.fail(message.as_deref().unwrap_or("stream reported an error"))
            }
        }
    }

    fn complete(&mut self) -> Outcome {
        if self.phase != StreamPhase::Streaming {
            tracing::debug!(document = %self.state.document_id, phase = %self.phase, "complete ignored");
            return Outcome::Ignored;
        }
        self.transition(StreamPhase::Complete);
        let index = self.versions.commit(self.state.content.clone());
        self.state.current_version_index = index;
        tracing::info!(
            document = %self.state.document_id,
            version = index,
            "artifact completed"
        );
        Outcome::Committed(index)
    }

    /// Move to the error phase, keeping the last good content
    pub fn fail(&mut self, reason: &str) -> Outcome {
        if !self.transition(StreamPhase::Error) {
            return Outcome::Ignored;
        }
        tracing::warn!(document = %self.state.document_id, reason, "artifact failed");
        Outcome::Failed
    }

    /// React to the overall chat status
    ///
    /// `Ready` completes a streaming document; `Error` fails it.
    pub fn observe_status(&mut self, status: ChatStatus) -> Outcome {
        if self.phase != StreamPhase::Streaming {
            return Outcome::Ignored;
        }
        match status {
            ChatStatus::Ready => self.complete(),
            ChatStatus::Error => self.fail("chat session reported an error"),
            ChatStatus::Idle | ChatStatus::Submitted | ChatStatus::Streaming => Outcome::Ignored,
        }
    }

    /// Navigate version history; ignored while streaming
    pub fn navigate(&mut self, change: VersionChange) -> Outcome {
        if self.phase == StreamPhase::Streaming {
            tracing::debug!(document = %self.state.document_id, ?change, "navigation ignored while streaming");
            return Outcome::Ignored;
        }
        if !self.versions.navigate(change) {
            return Outcome::Ignored;
        }
        if let Some(version) = self.versions.current() {
            self.state.content = version.content().to_string();
        }
        self.state.current_version_index = self.versions.current_index();
        Outcome::Updated
    }

    /// Record a user edit as the new latest version
    pub fn edit(&mut self, content: String) -> Outcome {
        if self.phase == StreamPhase::Streaming {
            tracing::debug!(document = %self.state.document_id, "edit ignored while streaming");
            return Outcome::Ignored;
        }
        self.ensure_initialized();
        let index = self.versions.commit(content.clone());
        self.state.content = content;
        self.state.current_version_index = index;
        tracing::info!(document = %self.state.document_id, version = index, "edit recorded");
        Outcome::Committed(index)
    }

    /// Apply a functional metadata update as one read-modify-write
    pub fn update_metadata(&mut self, update: MetadataUpdate) -> Outcome {
        let previous = self.state.metadata.clone();
        match catch_unwind(AssertUnwindSafe(move || update(previous))) {
            Ok(next) => {
                self.state.metadata = next;
                Outcome::Updated
            }
            Err(_) => {
                tracing::warn!(document = %self.state.document_id, "metadata update panicked, dropped");
                Outcome::Ignored
            }
        }
    }

    /// Merge an effect result if `run` is still the latest for `key`
    ///
    /// # Errors
    /// Returns [`RunSuperseded`] for a stale result, which the caller drops
    pub fn complete_run(&mut self, key: &str, run: RunId, update: MetadataUpdate) -> Result<Outcome, RunSuperseded> {
        self.runs.accept(key, run)?;
        Ok(self.update_metadata(update))
    }

    /// Render the current state; a panicking renderer yields a placeholder
    #[must_use]
    pub fn render(&self) -> View {
        catch_unwind(AssertUnwindSafe(|| self.definition.render(&self.state))).unwrap_or_else(|_| {
            tracing::warn!(document = %self.state.document_id, "renderer panicked");
            View::placeholder("This artifact could not be displayed.")
        })
    }

    /// Context for evaluating and clicking actions
    pub fn action_context<'a>(&'a mut self, platform: &'a dyn Platform) -> ActionContext<'a> {
        let cursor = self.versions.cursor();
        ActionContext::new(&self.state.content, &self.state.metadata, cursor, platform, &mut self.runs)
    }

    #[must_use]
    pub fn toolbar_context(&self) -> ToolbarContext<'_> {
        ToolbarContext {
            content: &self.state.content,
            metadata: &self.state.metadata,
            cursor: self.versions.cursor(),
        }
    }

    /// Current metadata
    #[inline]
    #[must_use]
    pub fn metadata(&self) -> &Metadata {
        &self.state.metadata
    }

    /// Latest run started for `key`
    #[must_use]
    pub fn latest_run(&self, key: &str) -> Option<RunId> {
        self.runs.latest(key)
    }
}
