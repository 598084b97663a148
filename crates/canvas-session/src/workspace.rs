//! Multi-document routing
//!
//! Routes inbound events to per-document sessions, opening a session on the
//! first delta for a registered kind. Documents never share state; a failure
//! in one leaves the others untouched.

use canvas_artifact::{
    global_registry, ArtifactKind, ArtifactRegistry, ChatStatus, DocumentId, Platform, StreamEvent,
};
use canvas_stream::{DocumentStream, RevealConfig};
use dashmap::DashMap;
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::config::CanvasConfig;
use crate::error::SessionError;
use crate::session::{ArtifactSession, SessionHandle, SessionOutput};

pub struct Workspace {
    registry: Arc<ArtifactRegistry>,
    reveal: RevealConfig,
    queue_capacity: usize,
    platform: Arc<dyn Platform>,
    sessions: DashMap<DocumentId, SessionHandle>,
    outputs: mpsc::UnboundedSender<SessionOutput>,
}

impl Workspace {
    /// Create a workspace and the receiver for every session's output
    #[must_use]
    pub fn new(
        registry: Arc<ArtifactRegistry>,
        config: &CanvasConfig,
        platform: Arc<dyn Platform>,
    ) -> (Self, mpsc::UnboundedReceiver<SessionOutput>) {
        let (outputs, rx) = mpsc::unbounded_channel();
        let workspace = Self {
            registry,
            reveal: config.reveal.clone(),
            queue_capacity: config.queue_capacity,
            platform,
            sessions: DashMap::new(),
            outputs,
        };
        (workspace, rx)
    }

    /// Create a workspace over the process-wide registry
    ///
    /// # Errors
    /// Returns [`SessionError::RegistryNotInstalled`] if no global registry exists
    pub fn from_global(
        config: &CanvasConfig,
        platform: Arc<dyn Platform>,
    ) -> Result<(Self, mpsc::UnboundedReceiver<SessionOutput>), SessionError> {
        let registry = global_registry().ok_or(SessionError::RegistryNotInstalled)?;
        Ok(Self::new(registry, config, platform))
    }

    #[inline]
    #[must_use]
    pub fn registry(&self) -> &Arc<ArtifactRegistry> {
        &self.registry
    }

    fn start(&self, document_id: DocumentId, kind: &ArtifactKind, activate: bool) -> Result<SessionHandle, SessionError> {
        let definition = self.registry.resolve(kind)?;
        let reveal = self.reveal.policy_for(&definition);
        let mut stream = DocumentStream::new(definition, document_id, reveal);
        if activate {
            stream.activate().map_err(canvas_stream::StreamError::from)?;
        }
        Ok(ArtifactSession::spawn(
            stream,
            Arc::clone(&self.platform),
            self.outputs.clone(),
            self.queue_capacity,
        ))
    }

    /// Explicitly open and activate a document
    ///
    /// Returns the existing session if the document is already open.
    ///
    /// # Errors
    /// Returns [`SessionError::Registry`] for an unregistered kind
    pub fn open(&self, document_id: DocumentId, kind: &ArtifactKind) -> Result<SessionHandle, SessionError> {
        let entry = self
            .sessions
            .entry(document_id.clone())
            .or_try_insert_with(|| self.start(document_id, kind, true))?;
        Ok(entry.value().clone())
    }

    /// Route one event to its document
    ///
    /// The first delta for an unknown document opens a session for the
    /// delta's kind. Other events for unknown documents are dropped.
    ///
    /// # Errors
    /// - [`SessionError::Registry`] when the first delta names an unregistered
    ///   kind; no session is created
    /// - [`SessionError::Closed`] if the session shut down concurrently
    pub async fn route(&self, document_id: &DocumentId, event: StreamEvent) -> Result<(), SessionError> {
        let handle = match self.session(document_id) {
            Some(handle) => handle,
            None => {
                let Some(kind) = event.delta_kind() else {
                    tracing::debug!(document = %document_id, event = %event.event_type, "event for unopened document ignored");
                    return Ok(());
                };
                let entry = self
                    .sessions
                    .entry(document_id.clone())
                    .or_try_insert_with(|| self.start(document_id.clone(), &kind, false))
                    .map_err(|err| {
                        tracing::warn!(document = %document_id, error = %err, "cannot open document");
                        err
                    })?;
                entry.value().clone()
            }
        };
        handle.apply(event).await
    }

    /// Forward a terminal signal to one document
    ///
    /// # Errors
    /// Returns [`SessionError::Closed`] if the session shut down concurrently
    pub async fn terminate(&self, document_id: &DocumentId, raw: &str) -> Result<(), SessionError> {
        match self.session(document_id) {
            Some(handle) => handle.terminate(raw).await,
            None => Ok(()),
        }
    }

    /// Broadcast the chat status to every open document
    pub async fn observe_status(&self, status: ChatStatus) {
        let handles = self.handles();
        let deliveries = handles.iter().map(|handle| handle.observe_status(status));
        for result in join_all(deliveries).await {
            if let Err(err) = result {
                tracing::debug!(error = %err, "status not delivered");
            }
        }
    }

    #[must_use]
    pub fn session(&self, document_id: &DocumentId) -> Option<SessionHandle> {
        self.sessions.get(document_id).map(|entry| entry.value().clone())
    }

    fn handles(&self) -> Vec<SessionHandle> {
        self.sessions.iter().map(|entry| entry.value().clone()).collect()
    }

    /// Close one document; in-flight effect results for it are dropped
    pub async fn close_document(&self, document_id: &DocumentId) -> bool {
        match self.sessions.remove(document_id) {
            Some((_, handle)) => {
                handle.close().await;
                true
            }
            None => false,
        }
    }

    /// Close every document
    pub async fn close_all(&self) {
        let ids: Vec<DocumentId> = self.sessions.iter().map(|entry| entry.key().clone()).collect();
        for id in ids {
            self.close_document(&id).await;
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::HeadlessPlatform;
    use canvas_artifact::RegistryError;
    use canvas_kinds::UnavailableRunner;
    use canvas_test_utils::{test_registry, text_delta};

    fn workspace() -> (Workspace, mpsc::UnboundedReceiver<SessionOutput>) {
        Workspace::new(
            test_registry(Arc::new(UnavailableRunner)),
            &CanvasConfig::default(),
            Arc::new(HeadlessPlatform::new()),
        )
    }

    #[tokio::test]
    async fn first_delta_opens_session() {
        let (workspace, _outputs) = workspace();
        let id = DocumentId::from("a");
        workspace.route(&id, text_delta("hi")).await.unwrap();
        assert_eq!(workspace.len(), 1);
        let snapshot = workspace
            .session(&id)
            .unwrap()
            .wait_until(|s| s.state.content == "hi")
            .await
            .unwrap();
        assert!(snapshot.state.is_visible);
    }

    #[tokio::test]
    async fn unknown_kind_creates_nothing() {
        let (workspace, _outputs) = workspace();
        let id = DocumentId::from("v");
        let err = workspace
            .route(&id, StreamEvent::delta(&ArtifactKind::new("video"), "x"))
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Registry(RegistryError::UnknownKind(_))));
        assert!(workspace.is_empty());
    }

    #[tokio::test]
    async fn non_delta_for_unknown_document_is_ignored() {
        let (workspace, _outputs) = workspace();
        workspace
            .route(&DocumentId::from("nobody"), StreamEvent::title("t"))
            .await
            .unwrap();
        assert!(workspace.is_empty());
    }

    #[tokio::test]
    async fn explicit_open_twice_reuses_session() {
        let (workspace, _outputs) = workspace();
        let id = DocumentId::from("a");
        let first = workspace.open(id.clone(), &ArtifactKind::TEXT).unwrap();
        let second = workspace.open(id, &ArtifactKind::TEXT).unwrap();
        assert_eq!(first.document_id(), second.document_id());
        assert_eq!(workspace.len(), 1);
    }

    #[tokio::test]
    async fn close_all_empties_workspace() {
        let (workspace, mut outputs) = workspace();
        workspace.route(&DocumentId::from("a"), text_delta("a")).await.unwrap();
        workspace.route(&DocumentId::from("b"), text_delta("b")).await.unwrap();
        workspace.close_all().await;
        assert!(workspace.is_empty());

        let mut closed = 0;
        while closed < 2 {
            if let Some(SessionOutput::Closed { .. }) = outputs.recv().await {
                closed += 1;
            }
        }
        assert!(!workspace.close_document(&DocumentId::from("a")).await);
    }
}
