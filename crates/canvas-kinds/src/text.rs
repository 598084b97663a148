//! Prose artifact

use canvas_artifact::{
    replace_content, ArtifactDefinition, ArtifactKind, ArtifactState, DefinitionError, Icon,
    RevealPolicy, ToolbarEntry, View,
};

use crate::adapter::document_view;
use crate::common::{copy_content, view_next, view_previous};

pub const DESCRIPTION: &str = "Useful for text generation, editing, and formatting.";

fn render(state: &ArtifactState) -> View {
    View::Document(document_view(state))
}

/// Text kind definition
///
/// # Errors
/// Only if the record is missing a handler, which would be a bug here
pub fn definition() -> Result<ArtifactDefinition, DefinitionError> {
    ArtifactDefinition::builder(ArtifactKind::TEXT)
        .description(DESCRIPTION)
        .reveal(RevealPolicy::Immediate)
        .without_metadata()
        .on_stream_part(replace_content)
        .content(render)
        .action(view_previous())
        .action(view_next())
        .action(copy_content("Copy text to clipboard", "Copied to clipboard!"))
        .toolbar_entry(ToolbarEntry::prompt(
            Icon::Pen,
            "Fix grammar and spelling",
            "Please fix the grammar and spelling in this text.",
        ))
        .toolbar_entry(ToolbarEntry::prompt(
            Icon::MessageSquare,
            "Simplify language",
            "Can you simplify the language in this text?",
        ))
        .toolbar_entry(ToolbarEntry::prompt(
            Icon::Sparkles,
            "Add final polish",
            "Add some professional polish to this text.",
        ))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use canvas_artifact::{
        ActionContext, DocumentId, Metadata, NoPlatform, RunLedger, StreamEvent, ToolbarContext,
        VersionCursor,
    };

    #[test]
    fn streams_full_snapshots() {
        let def = definition().unwrap();
        let state = ArtifactState::new(ArtifactKind::TEXT, DocumentId::from("t"));
        let state = def.reduce_delta(&StreamEvent::delta(&ArtifactKind::TEXT, "Hello"), state);
        let state = def.reduce_delta(&StreamEvent::delta(&ArtifactKind::TEXT, "Hello world"), state);
        match def.render(&state) {
            View::Document(doc) => {
                assert_eq!(doc.body, "Hello world");
                assert!(doc.is_streaming);
            }
            other => panic!("expected document, got {other:?}"),
        }
    }

    #[test]
    fn navigation_actions_track_cursor() {
        let def = definition().unwrap();
        let [prev, next, _copy] = def.actions() else {
            panic!("expected three actions");
        };
        let metadata = Metadata::empty();
        let mut runs = RunLedger::new();

        let first = VersionCursor { index: 0, len: 3 };
        let ctx = ActionContext::new("", &metadata, first, &NoPlatform, &mut runs);
        assert!(prev.is_disabled(&ctx));
        assert!(!next.is_disabled(&ctx));
        drop(ctx);

        let latest = VersionCursor { index: 2, len: 3 };
        let ctx = ActionContext::new("", &metadata, latest, &NoPlatform, &mut runs);
        assert!(!prev.is_disabled(&ctx));
        assert!(next.is_disabled(&ctx));
    }

    #[test]
    fn copy_without_clipboard_is_retryable() {
        let def = definition().unwrap();
        let metadata = Metadata::empty();
        let mut runs = RunLedger::new();
        let mut ctx =
            ActionContext::new("body", &metadata, VersionCursor::default(), &NoPlatform, &mut runs);
        let err = def.actions()[2].click(&mut ctx).unwrap_err();
        assert!(err.is_retryable());
        assert!(ctx.into_commands().is_empty());
    }

    #[test]
    fn toolbar_sends_fixed_prompts() {
        let def = definition().unwrap();
        let metadata = Metadata::empty();
        let ctx = ToolbarContext {
            content: "some text",
            metadata: &metadata,
            cursor: VersionCursor::default(),
        };
        let prompts: Vec<_> = def.toolbar().iter().map(|entry| entry.click(&ctx).text()).collect();
        assert_eq!(
            prompts,
            vec![
                "Please fix the grammar and spelling in this text.",
                "Can you simplify the language in this text?",
                "Add some professional polish to this text.",
            ]
        );
    }
}
