//! Action and toolbar dispatch
//!
//! An action click runs synchronously against an [`ActionContext`] and yields
//! a list of [`Command`]s. The dispatcher applies them in the order they were
//! recorded: metadata updates and version changes land on the document,
//! messages and notifications are collected for the caller, and spawned
//! effects are handed back so the session can drive them.

use canvas_artifact::{
    ActionError, ChatMessage, Command, Effect, Icon, Notification, Platform,
};
use canvas_stream::{DocumentStream, Outcome};
use serde::Serialize;
use std::sync::Arc;

use crate::error::SessionError;

/// Everything an action click produced for the outside world
#[derive(Debug, Default)]
pub struct DispatchReport {
    pub messages: Vec<ChatMessage>,
    pub notifications: Vec<Notification>,
    pub effects: Vec<Effect>,
    /// Whether document state changed
    pub changed: bool,
    /// The action was disabled and did not run
    pub skipped: bool,
}

impl DispatchReport {
    fn record(&mut self, outcome: Outcome) {
        self.changed |= outcome.is_change();
    }
}

/// Rendered state of one action button
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionState {
    pub icon: Icon,
    pub label: Option<String>,
    pub description: String,
    pub disabled: bool,
}

/// Evaluate every action's disabled predicate against the current state
pub fn action_states(stream: &mut DocumentStream, platform: &dyn Platform) -> Vec<ActionState> {
    let definition = Arc::clone(stream.definition());
    let ctx = stream.action_context(platform);
    definition
        .actions()
        .iter()
        .map(|action| ActionState {
            icon: action.icon,
            label: action.label.clone(),
            description: action.description.clone(),
            disabled: action.is_disabled(&ctx),
        })
        .collect()
}

/// Click the action at `index`
///
/// Handler failures are reported as error notifications, flagged retryable
/// when a host capability was missing; commands recorded before the failure
/// are discarded.
///
/// # Errors
/// Returns [`SessionError::UnknownAction`] if the kind has no such action
pub fn dispatch_action(
    stream: &mut DocumentStream,
    index: usize,
    platform: &dyn Platform,
) -> Result<DispatchReport, SessionError> {
    let definition = Arc::clone(stream.definition());
    let action = definition
        .actions()
        .get(index)
        .ok_or_else(|| SessionError::UnknownAction {
            kind: definition.kind().clone(),
            index,
        })?;

    let mut report = DispatchReport::default();
    let result = {
        let mut ctx = stream.action_context(platform);
        if action.is_disabled(&ctx) {
            tracing::debug!(action = %action.description, "action disabled, click ignored");
            report.skipped = true;
            return Ok(report);
        }
        action.click(&mut ctx).map(|()| ctx.into_commands())
    };

    match result {
        Ok(commands) => apply_commands(stream, commands, &mut report),
        Err(err) => report.notifications.push(failure_notification(&err)),
    }
    Ok(report)
}

/// Apply recorded commands in order
pub fn apply_commands(stream: &mut DocumentStream, commands: Vec<Command>, report: &mut DispatchReport) {
    for command in commands {
        match command {
            Command::UpdateMetadata(update) => report.record(stream.update_metadata(update)),
            Command::ChangeVersion(change) => report.record(stream.navigate(change)),
            Command::SendMessage(message) => report.messages.push(message),
            Command::Notify(notification) => report.notifications.push(notification),
            Command::Spawn(effect) => report.effects.push(effect),
        }
    }
}

/// Click the toolbar entry at `index`, producing the message to send
///
/// # Errors
/// Returns [`SessionError::UnknownToolbarEntry`] if the kind has no such entry
pub fn dispatch_toolbar(stream: &DocumentStream, index: usize) -> Result<ChatMessage, SessionError> {
    let definition = stream.definition();
    let entry = definition
        .toolbar()
        .get(index)
        .ok_or_else(|| SessionError::UnknownToolbarEntry {
            kind: definition.kind().clone(),
            index,
        })?;
    Ok(entry.click(&stream.toolbar_context()))
}

fn failure_notification(err: &ActionError) -> Notification {
    tracing::warn!(error = %err, retryable = err.is_retryable(), "action failed");
    let notification = Notification::error(err.to_string());
    if err.is_retryable() {
        notification.retryable()
    } else {
        notification
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::HeadlessPlatform;
    use canvas_artifact::{
        Capability, DocumentId, NotificationLevel, RevealPolicy, TerminalSignal, VersionChange,
    };
    use pretty_assertions::assert_eq;

    fn text_stream(versions: &[&str]) -> DocumentStream {
        let definition = Arc::new(canvas_kinds::text::definition().unwrap());
        let mut stream = DocumentStream::new(definition, DocumentId::from("doc"), RevealPolicy::Immediate);
        for content in versions {
            stream.apply(&canvas_artifact::StreamEvent::delta(
                &canvas_artifact::ArtifactKind::TEXT,
                *content,
            ));
            stream.finish(TerminalSignal::Complete);
        }
        stream
    }

    #[test]
    fn previous_disabled_on_first_version() {
        let platform = HeadlessPlatform::new();
        let mut stream = text_stream(&["only"]);
        let states = action_states(&mut stream, &platform);
        assert!(states[0].disabled);
        assert!(states[1].disabled);
        assert!(!states[2].disabled);
    }

    #[test]
    fn disabled_click_is_skipped() {
        let platform = HeadlessPlatform::new();
        let mut stream = text_stream(&["only"]);
        let report = dispatch_action(&mut stream, 0, &platform).unwrap();
        assert!(report.skipped);
        assert!(!report.changed);
    }

    #[test]
    fn previous_navigates() {
        let platform = HeadlessPlatform::new();
        let mut stream = text_stream(&["one", "two"]);
        let report = dispatch_action(&mut stream, 0, &platform).unwrap();
        assert!(report.changed);
        assert_eq!(stream.state().content, "one");

        stream.navigate(VersionChange::Latest);
        assert_eq!(stream.state().content, "two");
    }

    #[test]
    fn copy_writes_clipboard_and_notifies() {
        let platform = HeadlessPlatform::new();
        let mut stream = text_stream(&["copy me"]);
        let report = dispatch_action(&mut stream, 2, &platform).unwrap();
        assert_eq!(platform.last_clipboard().as_deref(), Some("copy me"));
        assert_eq!(report.notifications.len(), 1);
        assert_eq!(report.notifications[0].level, NotificationLevel::Success);
    }

    #[test]
    fn missing_clipboard_is_retryable_notification() {
        let platform = HeadlessPlatform::new().without(Capability::Clipboard);
        let mut stream = text_stream(&["copy me"]);
        let report = dispatch_action(&mut stream, 2, &platform).unwrap();
        assert_eq!(report.notifications.len(), 1);
        let note = &report.notifications[0];
        assert_eq!(note.level, NotificationLevel::Error);
        assert!(note.retryable);
    }

    #[test]
    fn unknown_indices_error() {
        let platform = HeadlessPlatform::new();
        let mut stream = text_stream(&["x"]);
        assert!(matches!(
            dispatch_action(&mut stream, 99, &platform),
            Err(SessionError::UnknownAction { index: 99, .. })
        ));
        assert!(matches!(
            dispatch_toolbar(&stream, 99),
            Err(SessionError::UnknownToolbarEntry { index: 99, .. })
        ));
    }

    #[test]
    fn toolbar_builds_message() {
        let stream = text_stream(&["x"]);
        let message = dispatch_toolbar(&stream, 0).unwrap();
        assert!(!message.text().is_empty());
    }
}
