//! Chat message list view model
//!
//! Derives per-row flags from the chat status and message list, and
//! memoizes the result so a view is rebuilt only when status, message count
//! or votes change.

use canvas_artifact::{ChatMessage, ChatStatus, Vote};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

/// One rendered message row
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRow {
    pub message: ChatMessage,
    /// Last row while the chat is streaming
    pub is_loading: bool,
    /// Last row after the user has sent something, keeps it clear of the input
    pub requires_scroll_padding: bool,
    pub vote: Option<Vote>,
}

/// Rendered message list
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageListView {
    pub rows: Vec<MessageRow>,
    pub show_thinking: bool,
}

#[derive(Debug, Clone, PartialEq)]
struct BindKey {
    status: ChatStatus,
    message_count: usize,
    votes: Option<Vec<Vote>>,
}

#[derive(Debug, Default)]
pub struct MessageListBinder {
    key: Option<BindKey>,
    view: Option<Arc<MessageListView>>,
    has_sent_message: bool,
    renders: usize,
}

impl MessageListBinder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the thinking indicator shows
    ///
    /// Only between submission and the first streamed part, and never while a
    /// tool approval answer is already on the wire.
    #[must_use]
    pub fn show_thinking(status: ChatStatus, messages: &[ChatMessage]) -> bool {
        status == ChatStatus::Submitted && !messages.iter().any(ChatMessage::has_approval_response)
    }

    /// Bind the current inputs, reusing the previous view when nothing relevant changed
    pub fn bind(
        &mut self,
        status: ChatStatus,
        messages: &[ChatMessage],
        votes: Option<&[Vote]>,
    ) -> Arc<MessageListView> {
        if status == ChatStatus::Submitted {
            self.has_sent_message = true;
        }

        let key = BindKey {
            status,
            message_count: messages.len(),
            votes: votes.map(<[Vote]>::to_vec),
        };
        if let (Some(previous), Some(view)) = (&self.key, &self.view) {
            if *previous == key {
                return Arc::clone(view);
            }
        }

        let view = Arc::new(self.derive(status, messages, votes));
        self.renders += 1;
        self.key = Some(key);
        self.view = Some(Arc::clone(&view));
        view
    }

    /// Number of times a view was actually rebuilt
    #[inline]
    #[must_use]
    pub fn render_count(&self) -> usize {
        self.renders
    }

    fn derive(&self, status: ChatStatus, messages: &[ChatMessage], votes: Option<&[Vote]>) -> MessageListView {
        let last = messages.len().checked_sub(1);
        let rows = messages
            .iter()
            .enumerate()
            .map(|(index, message)| {
                let is_last = Some(index) == last;
                MessageRow {
                    message: message.clone(),
                    is_loading: status == ChatStatus::Streaming && is_last,
                    requires_scroll_padding: self.has_sent_message && is_last,
                    vote: votes.and_then(|votes| find_vote(votes, message.id)),
                }
            })
            .collect();
        MessageListView {
            rows,
            show_thinking: Self::show_thinking(status, messages),
        }
    }
}

fn find_vote(votes: &[Vote], message_id: Uuid) -> Option<Vote> {
    votes.iter().find(|vote| vote.message_id == message_id).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use canvas_artifact::{MessagePart, Role, ToolState};

    fn assistant(text: &str) -> ChatMessage {
        ChatMessage::new(Role::Assistant, vec![MessagePart::Text { text: text.to_string() }])
    }

    fn approval(state: ToolState) -> ChatMessage {
        ChatMessage::new(
            Role::Assistant,
            vec![MessagePart::ToolInvocation {
                tool_call_id: "call-1".to_string(),
                state,
            }],
        )
    }

    #[test]
    fn thinking_only_when_submitted() {
        let messages = vec![ChatMessage::user_text("hi")];
        assert!(MessageListBinder::show_thinking(ChatStatus::Submitted, &messages));
        assert!(!MessageListBinder::show_thinking(ChatStatus::Streaming, &messages));
        assert!(!MessageListBinder::show_thinking(ChatStatus::Ready, &messages));
    }

    #[test]
    fn approval_response_hides_thinking() {
        let messages = vec![
            ChatMessage::user_text("run it"),
            approval(ToolState::ApprovalResponded),
        ];
        assert!(!MessageListBinder::show_thinking(ChatStatus::Submitted, &messages));

        let pending = vec![approval(ToolState::ApprovalRequested)];
        assert!(MessageListBinder::show_thinking(ChatStatus::Submitted, &pending));
    }

    #[test]
    fn last_row_loads_while_streaming() {
        let mut binder = MessageListBinder::new();
        let messages = vec![ChatMessage::user_text("hi"), assistant("hel")];
        let view = binder.bind(ChatStatus::Streaming, &messages, None);
        assert!(!view.rows[0].is_loading);
        assert!(view.rows[1].is_loading);

        let view = binder.bind(ChatStatus::Ready, &messages, None);
        assert!(!view.rows[1].is_loading);
    }

    #[test]
    fn scroll_padding_after_first_submission() {
        let mut binder = MessageListBinder::new();
        let mut messages = vec![assistant("welcome")];
        let view = binder.bind(ChatStatus::Ready, &messages, None);
        assert!(!view.rows[0].requires_scroll_padding);

        messages.push(ChatMessage::user_text("question"));
        let view = binder.bind(ChatStatus::Submitted, &messages, None);
        assert!(view.rows[1].requires_scroll_padding);
        assert!(!view.rows[0].requires_scroll_padding);
    }

    #[test]
    fn votes_attach_to_rows() {
        let mut binder = MessageListBinder::new();
        let message = assistant("answer");
        let vote = Vote {
            chat_id: "chat".to_string(),
            message_id: message.id,
            is_upvoted: true,
        };
        let messages = vec![message];
        let view = binder.bind(ChatStatus::Ready, &messages, Some(&[vote.clone()]));
        assert_eq!(view.rows[0].vote.as_ref(), Some(&vote));

        let view = binder.bind(ChatStatus::Ready, &messages, None);
        assert_eq!(view.rows[0].vote, None);
    }

    #[test]
    fn memoized_until_inputs_change() {
        let mut binder = MessageListBinder::new();
        let mut messages = vec![ChatMessage::user_text("hi")];
        let first = binder.bind(ChatStatus::Ready, &messages, None);
        let second = binder.bind(ChatStatus::Ready, &messages, None);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(binder.render_count(), 1);

        messages.push(assistant("hello"));
        let third = binder.bind(ChatStatus::Ready, &messages, None);
        assert!(!Arc::ptr_eq(&second, &third));
        assert_eq!(binder.render_count(), 2);

        binder.bind(ChatStatus::Streaming, &messages, None);
        assert_eq!(binder.render_count(), 3);
    }
}
