//! Action and toolbar contracts
//!
//! Actions run against the current artifact state through an
//! [`ActionContext`]. A click handler never mutates the document itself: it
//! records [`Command`]s (metadata updates, version changes, outbound messages,
//! notifications, spawned effects) that the owning consumer applies in order
//! once the handler returns.
//!
//! Toolbar entries are narrower still: their only output is a new chat
//! message, which is the sole path from the artifact view back into the
//! conversation.

use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::error::ActionError;
use crate::message::ChatMessage;
use crate::metadata::{typed_update, Metadata, MetadataUpdate};
use crate::platform::{Notification, Platform};
use crate::run::{RunId, RunLedger};
use crate::view::Icon;

/// Version navigation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionChange {
    Prev,
    Next,
    Latest,
}

/// Position within a document's version history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VersionCursor {
    pub index: usize,
    pub len: usize,
}

impl VersionCursor {
    /// Whether the cursor sits on the newest version (or there is none)
    #[inline]
    #[must_use]
    pub fn is_latest(&self) -> bool {
        self.index + 1 >= self.len
    }

    #[inline]
    #[must_use]
    pub fn is_first(&self) -> bool {
        self.index == 0
    }
}

/// Asynchronous effect spawned by an action
///
/// The task resolves to a functional metadata update. The consumer merges it
/// only if `run` is still the latest run for `key`.
pub struct Effect {
    pub key: String,
    pub run: RunId,
    pub task: BoxFuture<'static, MetadataUpdate>,
}

impl fmt::Debug for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Effect")
            .field("key", &self.key)
            .field("run", &self.run)
            .finish_non_exhaustive()
    }
}

/// Deferred effect of an action click
pub enum Command {
    UpdateMetadata(MetadataUpdate),
    ChangeVersion(VersionChange),
    SendMessage(ChatMessage),
    Notify(Notification),
    Spawn(Effect),
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UpdateMetadata(_) => f.write_str("UpdateMetadata(..)"),
            Self::ChangeVersion(change) => f.debug_tuple("ChangeVersion").field(change).finish(),
            Self::SendMessage(message) => f.debug_tuple("SendMessage").field(&message.id).finish(),
            Self::Notify(note) => f.debug_tuple("Notify").field(note).finish(),
            Self::Spawn(effect) => f.debug_tuple("Spawn").field(effect).finish(),
        }
    }
}

/// Context handed to action handlers
pub struct ActionContext<'a> {
    content: &'a str,
    metadata: &'a Metadata,
    cursor: VersionCursor,
    platform: &'a dyn Platform,
    runs: &'a mut RunLedger,
    commands: Vec<Command>,
}

impl<'a> ActionContext<'a> {
    #[must_use]
    pub fn new(
        content: &'a str,
        metadata: &'a Metadata,
        cursor: VersionCursor,
        platform: &'a dyn Platform,
        runs: &'a mut RunLedger,
    ) -> Self {
        Self {
            content,
            metadata,
            cursor,
            platform,
            runs,
            commands: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn content(&self) -> &str {
        self.content
    }

    #[inline]
    #[must_use]
    pub fn metadata(&self) -> &Metadata {
        self.metadata
    }

    #[inline]
    #[must_use]
    pub fn current_version_index(&self) -> usize {
        self.cursor.index
    }

    #[inline]
    #[must_use]
    pub fn is_current_version(&self) -> bool {
        self.cursor.is_latest()
    }

    #[inline]
    #[must_use]
    pub fn cursor(&self) -> VersionCursor {
        self.cursor
    }

    #[inline]
    #[must_use]
    pub fn platform(&self) -> &dyn Platform {
        self.platform
    }

    /// Queue a functional metadata update
    pub fn set_metadata(&mut self, update: MetadataUpdate) {
        self.commands.push(Command::UpdateMetadata(update));
    }

    /// Queue a typed metadata update
    pub fn update_metadata<T, F>(&mut self, f: F)
    where
        T: Serialize + DeserializeOwned + 'static,
        F: FnOnce(T) -> T + Send + 'static,
    {
        self.set_metadata(typed_update(f));
    }

    pub fn send_message(&mut self, message: ChatMessage) {
        self.commands.push(Command::SendMessage(message));
    }

    pub fn handle_version_change(&mut self, change: VersionChange) {
        self.commands.push(Command::ChangeVersion(change));
    }

    pub fn notify(&mut self, notification: Notification) {
        self.commands.push(Command::Notify(notification));
    }

    /// Start an asynchronous effect under a fresh run id
    ///
    /// `make_task` receives the run id so it can tag its own output.
    pub fn spawn<F, Fut>(&mut self, key: &str, make_task: F) -> RunId
    where
        F: FnOnce(RunId) -> Fut,
        Fut: Future<Output = MetadataUpdate> + Send + 'static,
    {
        let run = self.runs.begin(key);
        let task: BoxFuture<'static, MetadataUpdate> = Box::pin(make_task(run));
        self.commands.push(Command::Spawn(Effect {
            key: key.to_string(),
            run,
            task,
        }));
        run
    }

    /// Commands recorded so far, in click order
    #[must_use]
    pub fn into_commands(self) -> Vec<Command> {
        self.commands
    }
}

/// Read-only context handed to toolbar entries
#[derive(Debug, Clone, Copy)]
pub struct ToolbarContext<'a> {
    pub content: &'a str,
    pub metadata: &'a Metadata,
    pub cursor: VersionCursor,
}

pub type ClickFn = Arc<dyn Fn(&mut ActionContext<'_>) -> Result<(), ActionError> + Send + Sync>;
pub type DisabledFn = Arc<dyn Fn(&ActionContext<'_>) -> bool + Send + Sync>;
pub type ToolbarFn = Arc<dyn Fn(&ToolbarContext<'_>) -> ChatMessage + Send + Sync>;

/// Kind-specific command shown in the artifact header
#[derive(Clone)]
pub struct ActionDescriptor {
    pub icon: Icon,
    pub label: Option<String>,
    pub description: String,
    on_click: ClickFn,
    is_disabled: Option<DisabledFn>,
}

impl ActionDescriptor {
    pub fn new<F>(icon: Icon, description: impl Into<String>, on_click: F) -> Self
    where
        F: Fn(&mut ActionContext<'_>) -> Result<(), ActionError> + Send + Sync + 'static,
    {
        Self {
            icon,
            label: None,
            description: description.into(),
            on_click: Arc::new(on_click),
            is_disabled: None,
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn disabled_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&ActionContext<'_>) -> bool + Send + Sync + 'static,
    {
        self.is_disabled = Some(Arc::new(predicate));
        self
    }

    /// Evaluate the disabled predicate; actions without one are always enabled
    #[must_use]
    pub fn is_disabled(&self, ctx: &ActionContext<'_>) -> bool {
        self.is_disabled.as_ref().is_some_and(|predicate| predicate(ctx))
    }

    /// Run the click handler
    ///
    /// # Errors
    /// Propagates the handler's [`ActionError`]
    pub fn click(&self, ctx: &mut ActionContext<'_>) -> Result<(), ActionError> {
        (self.on_click)(ctx)
    }
}

impl fmt::Debug for ActionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionDescriptor")
            .field("icon", &self.icon)
            .field("label", &self.label)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Toolbar command that feeds a new message back into the conversation
#[derive(Clone)]
pub struct ToolbarEntry {
    pub icon: Icon,
    pub description: String,
    on_click: ToolbarFn,
}

impl ToolbarEntry {
    pub fn new<F>(icon: Icon, description: impl Into<String>, on_click: F) -> Self
    where
        F: Fn(&ToolbarContext<'_>) -> ChatMessage + Send + Sync + 'static,
    {
        Self {
            icon,
            description: description.into(),
            on_click: Arc::new(on_click),
        }
    }

    /// Entry that always sends the same user prompt
    pub fn prompt(icon: Icon, description: impl Into<String>, prompt: &'static str) -> Self {
        Self::new(icon, description, move |_| ChatMessage::user_text(prompt))
    }

    /// Synthesize the outbound message
    #[must_use]
    pub fn click(&self, ctx: &ToolbarContext<'_>) -> ChatMessage {
        (self.on_click)(ctx)
    }
}

impl fmt::Debug for ToolbarEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolbarEntry")
            .field("icon", &self.icon)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}
