//! Multi-document reconciler
//!
//! Routes events to per-document [`DocumentStream`]s, creating a document on
//! the first delta of a registered kind. Documents are independent: a failure
//! in one never touches another.

use canvas_artifact::{
    ArtifactKind, ArtifactRegistry, ChatStatus, DocumentId, EventTag, RegistryError, StreamEvent,
    TerminalSignal, VersionChange,
};
use indexmap::IndexMap;
use std::sync::Arc;

use crate::document::{DocumentStream, Outcome};
use crate::error::StreamError;
use crate::reveal::RevealConfig;

#[derive(Debug, Clone)]
pub struct StreamReconciler {
    registry: Arc<ArtifactRegistry>,
    reveal: RevealConfig,
    documents: IndexMap<DocumentId, DocumentStream>,
}

impl StreamReconciler {
    #[must_use]
    pub fn new(registry: Arc<ArtifactRegistry>, reveal: RevealConfig) -> Self {
        Self {
            registry,
            reveal,
            documents: IndexMap::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn registry(&self) -> &Arc<ArtifactRegistry> {
        &self.registry
    }

    /// Build an unregistered document stream for `kind`
    ///
    /// # Errors
    /// Returns [`RegistryError::UnknownKind`] if `kind` is not registered
    pub fn open(&self, document_id: DocumentId, kind: &ArtifactKind) -> Result<DocumentStream, RegistryError> {
        let definition = self.registry.resolve(kind)?;
        let reveal = self.reveal.policy_for(&definition);
        Ok(DocumentStream::new(definition, document_id, reveal))
    }

    /// Explicitly activate a document
    ///
    /// # Errors
    /// - [`StreamError::Registry`] for an unregistered kind
    /// - [`StreamError::Definition`] if the document is already initialized
    pub fn activate(&mut self, document_id: DocumentId, kind: &ArtifactKind) -> Result<&mut DocumentStream, StreamError> {
        if !self.documents.contains_key(&document_id) {
            let stream = self.open(document_id.clone(), kind)?;
            self.documents.insert(document_id.clone(), stream);
        }
        let stream = self
            .documents
            .get_mut(&document_id)
            .ok_or_else(|| RegistryError::UnknownKind(kind.clone()))?;
        stream.activate()?;
        Ok(stream)
    }

    /// Route one event to its document
    ///
    /// # Errors
    /// Returns [`StreamError::Registry`] when the first delta for a document
    /// names an unregistered kind; no state is created in that case
    pub fn apply(&mut self, document_id: &DocumentId, event: &StreamEvent) -> Result<Outcome, StreamError> {
        if let Some(stream) = self.documents.get_mut(document_id) {
            return Ok(stream.apply(event));
        }
        let EventTag::Delta(kind) = event.tag() else {
            tracing::debug!(document = %document_id, event = %event.event_type, "event for inactive document ignored");
            return Ok(Outcome::Ignored);
        };
        let stream = match self.open(document_id.clone(), &kind) {
            Ok(stream) => stream,
            Err(err) => {
                tracing::warn!(document = %document_id, error = %err, "stream for unregistered kind");
                return Err(err.into());
            }
        };
        let stream = self.documents.entry(document_id.clone()).or_insert(stream);
        Ok(stream.apply(event))
    }

    /// Apply a batch of events in order
    ///
    /// # Errors
    /// Stops at the first routing error
    pub fn apply_all<'e, I>(&mut self, events: I) -> Result<(), StreamError>
    where
        I: IntoIterator<Item = (&'e DocumentId, &'e StreamEvent)>,
    {
        for (document_id, event) in events {
            self.apply(document_id, event)?;
        }
        Ok(())
    }

    pub fn finish(&mut self, document_id: &DocumentId, signal: TerminalSignal) -> Outcome {
        self.documents
            .get_mut(document_id)
            .map_or(Outcome::Ignored, |stream| stream.finish(signal))
    }

    /// Apply a raw terminal signal; malformed input fails the document
    pub fn terminate(&mut self, document_id: &DocumentId, raw: &str) -> Outcome {
        self.documents
            .get_mut(document_id)
            .map_or(Outcome::Ignored, |stream| stream.terminate(raw))
    }

    /// Fan the chat status out to every open document
    pub fn observe_status(&mut self, status: ChatStatus) -> usize {
        self.documents
            .values_mut()
            .map(|stream| stream.observe_status(status))
            .filter(|outcome| outcome.is_change())
            .count()
    }

    pub fn navigate(&mut self, document_id: &DocumentId, change: VersionChange) -> Outcome {
        self.documents
            .get_mut(document_id)
            .map_or(Outcome::Ignored, |stream| stream.navigate(change))
    }

    pub fn edit(&mut self, document_id: &DocumentId, content: String) -> Outcome {
        self.documents
            .get_mut(document_id)
            .map_or(Outcome::Ignored, |stream| stream.edit(content))
    }

    /// Stop routing to `document_id` and drop its state
    pub fn close(&mut self, document_id: &DocumentId) -> Option<DocumentStream> {
        let closed = self.documents.shift_remove(document_id);
        if closed.is_some() {
            tracing::info!(document = %document_id, "document closed");
        }
        closed
    }

    pub fn close_all(&mut self) {
        tracing::info!(documents = self.documents.len(), "closing all documents");
        self.documents.clear();
    }

    #[must_use]
    pub fn get(&self, document_id: &DocumentId) -> Option<&DocumentStream> {
        self.documents.get(document_id)
    }

    #[must_use]
    pub fn get_mut(&mut self, document_id: &DocumentId) -> Option<&mut DocumentStream> {
        self.documents.get_mut(document_id)
    }

    pub fn documents(&self) -> impl Iterator<Item = &DocumentStream> {
        self.documents.values()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
