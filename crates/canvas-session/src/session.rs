//! Per-document artifact session
//!
//! Each open document is owned by one tokio task. Every input, whether a
//! stream event, a user click or a finished effect, goes through that task's
//! bounded queue, so all state mutations for a document are serialized.
//! Readers observe the latest [`Snapshot`] through a watch channel; messages
//! and notifications flow out on a shared output channel.

use canvas_artifact::{
    ArtifactKind, ArtifactState, ChatMessage, ChatStatus, DocumentId, Effect, MetadataUpdate,
    Notification, Platform, RunId, StreamEvent, VersionChange, View,
};
use canvas_stream::{DocumentStream, StreamPhase};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::Instrument;

use crate::dispatcher::{action_states, dispatch_action, dispatch_toolbar, ActionState, DispatchReport};
use crate::error::SessionError;

/// Input to a document's session task
pub enum SessionInput {
    Event(StreamEvent),
    /// Raw terminal signal from the transport
    Terminal(String),
    Status(ChatStatus),
    Action(usize),
    Toolbar(usize),
    Navigate(VersionChange),
    Edit(String),
    /// An effect finished; merged only if `run` is still the latest for `key`
    EffectDone {
        key: String,
        run: RunId,
        update: MetadataUpdate,
    },
    Close,
}

impl fmt::Debug for SessionInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Event(event) => f.debug_tuple("Event").field(&event.event_type).finish(),
            Self::Terminal(raw) => f.debug_tuple("Terminal").field(raw).finish(),
            Self::Status(status) => f.debug_tuple("Status").field(status).finish(),
            Self::Action(index) => f.debug_tuple("Action").field(index).finish(),
            Self::Toolbar(index) => f.debug_tuple("Toolbar").field(index).finish(),
            Self::Navigate(change) => f.debug_tuple("Navigate").field(change).finish(),
            Self::Edit(_) => f.write_str("Edit(..)"),
            Self::EffectDone { key, run, .. } => f
                .debug_struct("EffectDone")
                .field("key", key)
                .field("run", run)
                .finish_non_exhaustive(),
            Self::Close => f.write_str("Close"),
        }
    }
}

/// Output from a session to the chat host
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutput {
    /// Toolbar or action produced a message to send
    Message {
        document_id: DocumentId,
        message: ChatMessage,
    },
    Notification {
        document_id: DocumentId,
        notification: Notification,
    },
    Closed {
        document_id: DocumentId,
    },
}

impl SessionOutput {
    #[must_use]
    pub fn document_id(&self) -> &DocumentId {
        match self {
            Self::Message { document_id, .. }
            | Self::Notification { document_id, .. }
            | Self::Closed { document_id } => document_id,
        }
    }
}

/// Published view of one document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub state: ArtifactState,
    pub phase: StreamPhase,
    pub version_count: usize,
    pub view: View,
    pub actions: Vec<ActionState>,
}

impl Snapshot {
    fn capture(stream: &mut DocumentStream, platform: &dyn Platform) -> Self {
        Self {
            state: stream.state().clone(),
            phase: stream.phase(),
            version_count: stream.versions().len(),
            view: stream.render(),
            actions: action_states(stream, platform),
        }
    }
}

/// Cloneable handle to a running session
#[derive(Debug, Clone)]
pub struct SessionHandle {
    document_id: DocumentId,
    kind: ArtifactKind,
    inputs: mpsc::Sender<SessionInput>,
    snapshots: watch::Receiver<Snapshot>,
}

impl SessionHandle {
    #[inline]
    #[must_use]
    pub fn document_id(&self) -> &DocumentId {
        &self.document_id
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> &ArtifactKind {
        &self.kind
    }

    /// Queue an input, waiting for capacity
    ///
    /// # Errors
    /// Returns [`SessionError::Closed`] once the session has shut down
    pub async fn send(&self, input: SessionInput) -> Result<(), SessionError> {
        self.inputs
            .send(input)
            .await
            .map_err(|_| SessionError::Closed(self.document_id.clone()))
    }

    /// # Errors
    /// Returns [`SessionError::Closed`] once the session has shut down
    pub async fn apply(&self, event: StreamEvent) -> Result<(), SessionError> {
        self.send(SessionInput::Event(event)).await
    }

    /// # Errors
    /// Returns [`SessionError::Closed`] once the session has shut down
    pub async fn terminate(&self, raw: impl Into<String>) -> Result<(), SessionError> {
        self.send(SessionInput::Terminal(raw.into())).await
    }

    /// # Errors
    /// Returns [`SessionError::Closed`] once the session has shut down
    pub async fn observe_status(&self, status: ChatStatus) -> Result<(), SessionError> {
        self.send(SessionInput::Status(status)).await
    }

    /// # Errors
    /// Returns [`SessionError::Closed`] once the session has shut down
    pub async fn click_action(&self, index: usize) -> Result<(), SessionError> {
        self.send(SessionInput::Action(index)).await
    }

    /// # Errors
    /// Returns [`SessionError::Closed`] once the session has shut down
    pub async fn click_toolbar(&self, index: usize) -> Result<(), SessionError> {
        self.send(SessionInput::Toolbar(index)).await
    }

    /// # Errors
    /// Returns [`SessionError::Closed`] once the session has shut down
    pub async fn navigate(&self, change: VersionChange) -> Result<(), SessionError> {
        self.send(SessionInput::Navigate(change)).await
    }

    /// # Errors
    /// Returns [`SessionError::Closed`] once the session has shut down
    pub async fn edit(&self, content: impl Into<String>) -> Result<(), SessionError> {
        self.send(SessionInput::Edit(content.into())).await
    }

    /// Ask the session to shut down; closing twice is a no-op
    pub async fn close(&self) {
        if self.inputs.send(SessionInput::Close).await.is_err() {
            tracing::debug!(document = %self.document_id, "session already closed");
        }
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inputs.is_closed()
    }

    /// Latest published snapshot
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.clone()
    }

    /// Wait until a published snapshot satisfies `predicate`
    ///
    /// # Errors
    /// Returns [`SessionError::Closed`] if the session ends first
    pub async fn wait_until<F>(&self, predicate: F) -> Result<Snapshot, SessionError>
    where
        F: FnMut(&Snapshot) -> bool,
    {
        let mut snapshots = self.snapshots.clone();
        let snapshot = snapshots
            .wait_for(predicate)
            .await
            .map_err(|_| SessionError::Closed(self.document_id.clone()))?;
        Ok(snapshot.clone())
    }
}

pub struct ArtifactSession {
    stream: DocumentStream,
    platform: Arc<dyn Platform>,
    inputs: mpsc::Receiver<SessionInput>,
    loopback: mpsc::WeakSender<SessionInput>,
    snapshots: watch::Sender<Snapshot>,
    outputs: mpsc::UnboundedSender<SessionOutput>,
}

impl ArtifactSession {
    /// Spawn the session task for `stream`
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(
        mut stream: DocumentStream,
        platform: Arc<dyn Platform>,
        outputs: mpsc::UnboundedSender<SessionOutput>,
        capacity: usize,
    ) -> SessionHandle {
        let (sender, inputs) = mpsc::channel(capacity.max(1));
        let (snapshots, snapshot_rx) = watch::channel(Snapshot::capture(&mut stream, &*platform));

        let handle = SessionHandle {
            document_id: stream.document_id().clone(),
            kind: stream.kind().clone(),
            inputs: sender.clone(),
            snapshots: snapshot_rx,
        };

        let span = tracing::info_span!(
            "artifact_session",
            document = %handle.document_id,
            kind = %handle.kind
        );
        let session = Self {
            stream,
            platform,
            inputs,
            loopback: sender.downgrade(),
            snapshots,
            outputs,
        };
        tokio::spawn(session.run().instrument(span));
        handle
    }

    async fn run(mut self) {
        tracing::debug!("session started");
        while let Some(input) = self.inputs.recv().await {
            if matches!(input, SessionInput::Close) {
                break;
            }
            if self.handle(input) {
                self.publish();
            }
        }
        self.inputs.close();
        let document_id = self.stream.document_id().clone();
        if self.outputs.send(SessionOutput::Closed { document_id }).is_err() {
            tracing::debug!("output channel gone");
        }
        tracing::debug!("session closed");
    }

    /// Apply one input; returns whether a new snapshot should be published
    fn handle(&mut self, input: SessionInput) -> bool {
        match input {
            SessionInput::Event(event) => self.stream.apply(&event).is_change(),
            SessionInput::Terminal(raw) => self.stream.terminate(&raw).is_change(),
            SessionInput::Status(status) => self.stream.observe_status(status).is_change(),
            SessionInput::Navigate(change) => self.stream.navigate(change).is_change(),
            SessionInput::Edit(content) => self.stream.edit(content).is_change(),
            SessionInput::Action(index) => {
                match dispatch_action(&mut self.stream, index, &*self.platform) {
                    Ok(report) => self.forward(report),
                    Err(err) => {
                        tracing::warn!(error = %err, "action dispatch failed");
                        false
                    }
                }
            }
            SessionInput::Toolbar(index) => {
                match dispatch_toolbar(&self.stream, index) {
                    Ok(message) => self.emit(SessionOutput::Message {
                        document_id: self.stream.document_id().clone(),
                        message,
                    }),
                    Err(err) => tracing::warn!(error = %err, "toolbar dispatch failed"),
                }
                false
            }
            SessionInput::EffectDone { key, run, update } => match self.stream.complete_run(&key, run, update) {
                Ok(outcome) => outcome.is_change(),
                Err(superseded) => {
                    let err = SessionError::from(superseded);
                    debug_assert!(err.is_silent());
                    tracing::debug!(error = %err, "stale effect result dropped");
                    false
                }
            },
            SessionInput::Close => false,
        }
    }

    fn forward(&mut self, report: DispatchReport) -> bool {
        let document_id = self.stream.document_id().clone();
        for message in report.messages {
            self.emit(SessionOutput::Message {
                document_id: document_id.clone(),
                message,
            });
        }
        for notification in report.notifications {
            self.emit(SessionOutput::Notification {
                document_id: document_id.clone(),
                notification,
            });
        }
        for effect in report.effects {
            self.drive(effect);
        }
        report.changed
    }

    /// Run an effect off the session task and post its result back
    fn drive(&self, effect: Effect) {
        let Effect { key, run, task } = effect;
        let loopback = self.loopback.clone();
        let span = tracing::debug_span!("effect", key = %key, run = %run);
        tokio::spawn(
            async move {
                let update = task.await;
                let Some(inputs) = loopback.upgrade() else {
                    tracing::debug!("session gone, effect result dropped");
                    return;
                };
                if inputs.send(SessionInput::EffectDone { key, run, update }).await.is_err() {
                    tracing::debug!("session closed, effect result dropped");
                }
            }
            .instrument(span),
        );
    }

    fn emit(&self, output: SessionOutput) {
        if self.outputs.send(output).is_err() {
            tracing::debug!("output channel gone, dropping session output");
        }
    }

    fn publish(&mut self) {
        let snapshot = Snapshot::capture(&mut self.stream, &*self.platform);
        self.snapshots.send_replace(snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::HeadlessPlatform;
    use canvas_artifact::{ArtifactStatus, RevealPolicy};
    use canvas_test_utils::text_delta;

    fn spawn_text() -> (SessionHandle, mpsc::UnboundedReceiver<SessionOutput>) {
        let definition = Arc::new(canvas_kinds::text::definition().unwrap());
        let stream = DocumentStream::new(definition, DocumentId::from("doc"), RevealPolicy::Immediate);
        let (outputs, rx) = mpsc::unbounded_channel();
        let handle = ArtifactSession::spawn(stream, Arc::new(HeadlessPlatform::new()), outputs, 8);
        (handle, rx)
    }

    #[tokio::test]
    async fn stream_then_complete() {
        let (handle, _outputs) = spawn_text();
        handle.apply(text_delta("Hello")).await.unwrap();
        handle.apply(text_delta("Hello world")).await.unwrap();
        handle.terminate("complete").await.unwrap();

        let snapshot = handle
            .wait_until(|s| s.state.status == ArtifactStatus::Complete)
            .await
            .unwrap();
        assert_eq!(snapshot.state.content, "Hello world");
        assert_eq!(snapshot.version_count, 1);
        assert_eq!(snapshot.phase, StreamPhase::Complete);
    }

    #[tokio::test]
    async fn close_emits_closed_and_rejects_inputs() {
        let (handle, mut outputs) = spawn_text();
        handle.close().await;

        let output = outputs.recv().await.unwrap();
        assert_eq!(
            output,
            SessionOutput::Closed {
                document_id: DocumentId::from("doc")
            }
        );
        assert!(handle.is_closed());
        assert!(matches!(
            handle.apply(text_delta("late")).await,
            Err(SessionError::Closed(_))
        ));
        handle.close().await;
    }

    #[tokio::test]
    async fn toolbar_click_emits_message() {
        let (handle, mut outputs) = spawn_text();
        handle.apply(text_delta("draft")).await.unwrap();
        handle.click_toolbar(0).await.unwrap();

        match outputs.recv().await.unwrap() {
            SessionOutput::Message { document_id, message } => {
                assert_eq!(document_id, DocumentId::from("doc"));
                assert!(!message.text().is_empty());
            }
            other => panic!("expected message, got {other:?}"),
        }
    }

    #[test]
    fn input_debug_hides_payloads() {
        let input = SessionInput::Edit("secret".to_string());
        assert_eq!(format!("{input:?}"), "Edit(..)");
    }
}
