use canvas_artifact::{
    ArtifactKind, ArtifactStatus, DocumentId, RevealPolicy, StreamEvent, TerminalSignal,
    VersionChange,
};
use canvas_kinds::UnavailableRunner;
use canvas_stream::{DocumentStream, RevealConfig, StreamPhase, StreamReconciler};
use canvas_test_utils::{events_from_jsonl, growing_snapshots, sheet_delta, test_registry, text_delta};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::json;
use std::sync::Arc;

fn text_document() -> DocumentStream {
    let definition = canvas_kinds::text::definition().unwrap();
    DocumentStream::new(Arc::new(definition), DocumentId::from("doc"), RevealPolicy::Immediate)
}

fn code_document(threshold: usize) -> DocumentStream {
    let definition = canvas_kinds::code::definition(Arc::new(UnavailableRunner)).unwrap();
    DocumentStream::new(
        Arc::new(definition),
        DocumentId::from("code"),
        RevealPolicy::AfterChars(threshold),
    )
}

fn kind_strategy() -> impl Strategy<Value = ArtifactKind> {
    prop_oneof![
        Just(ArtifactKind::CODE),
        Just(ArtifactKind::SHEET),
        Just(ArtifactKind::new("video")),
        Just(ArtifactKind::new("image")),
    ]
}

#[test]
fn test_hello_world_single_version() {
    let mut doc = text_document();
    doc.apply(&text_delta("Hello"));
    doc.apply(&text_delta("Hello world"));
    doc.finish(TerminalSignal::Complete);

    assert_eq!(doc.state().content, "Hello world");
    assert_eq!(doc.state().status, ArtifactStatus::Complete);
    assert_eq!(doc.versions().len(), 1);
}

#[test]
fn test_sheet_malformed_json_placeholder() {
    let registry = test_registry(Arc::new(UnavailableRunner));
    let mut reconciler = StreamReconciler::new(registry, RevealConfig::new());
    let id = DocumentId::from("sheet");
    reconciler
        .apply(&id, &StreamEvent::delta(&ArtifactKind::SHEET, r#"{"rows":[{"a":"#))
        .unwrap();
    let view = reconciler.get(&id).unwrap().render();
    assert!(view.is_placeholder());
}

#[test]
fn test_sheet_object_payload_renders_grid() {
    let registry = test_registry(Arc::new(UnavailableRunner));
    let mut reconciler = StreamReconciler::new(registry, RevealConfig::new());
    let id = DocumentId::from("sheet");
    reconciler
        .apply(&id, &sheet_delta(json!({"rows": [{"a": 1}], "columns": [{"name": "a"}]})))
        .unwrap();
    reconciler.finish(&id, TerminalSignal::Complete);
    match reconciler.get(&id).unwrap().render() {
        canvas_artifact::View::Grid(grid) => {
            assert_eq!((grid.row_count(), grid.column_count()), (1, 1));
        }
        other => panic!("expected grid, got {other:?}"),
    }
}

#[test]
fn test_code_reveals_after_threshold() {
    let mut doc = code_document(300);
    let short = "x".repeat(299);
    doc.apply(&StreamEvent::delta(&ArtifactKind::CODE, short.as_str()));
    assert!(!doc.state().is_visible);
    let long = "x".repeat(300);
    doc.apply(&StreamEvent::delta(&ArtifactKind::CODE, long.as_str()));
    assert!(doc.state().is_visible);
}

#[test]
fn test_jsonl_log_with_title_clear_and_finish() {
    let events = events_from_jsonl(
        r#"
{"type":"data-title","data":"Draft"}
{"type":"data-textDelta","data":"Hello"}
{"type":"data-clear","data":null}
{"type":"data-textDelta","data":"Hi there"}
{"type":"data-finish","data":""}
"#,
    );
    let registry = test_registry(Arc::new(UnavailableRunner));
    let mut reconciler = StreamReconciler::new(registry, RevealConfig::new());
    let id = DocumentId::from("log");
    reconciler
        .apply_all(events.iter().map(|event| (&id, event)))
        .unwrap();

    // the title arrived before the document existed
    let doc = reconciler.get(&id).unwrap();
    assert_eq!(doc.state().title, "");
    assert_eq!(doc.state().content, "Hi there");
    assert_eq!(doc.phase(), StreamPhase::Complete);
    assert_eq!(doc.versions().len(), 1);
}

proptest! {
    #[test]
    fn prop_batched_equals_one_at_a_time(text in "[a-z ]{0,40}") {
        let events = growing_snapshots(&ArtifactKind::TEXT, &text);

        let mut single = text_document();
        for event in &events {
            single.apply(event);
        }
        single.finish(TerminalSignal::Complete);

        let mut batched = text_document();
        batched.apply_batch(&events);
        batched.finish(TerminalSignal::Complete);

        prop_assert_eq!(single.state(), batched.state());
        prop_assert_eq!(single.phase(), batched.phase());
        prop_assert_eq!(single.versions().len(), batched.versions().len());
    }

    #[test]
    fn prop_navigation_round_trip(n in 1usize..20) {
        let mut doc = text_document();
        for i in 0..n {
            doc.apply(&text_delta(&format!("version {i}")));
            doc.finish(TerminalSignal::Complete);
        }
        prop_assert_eq!(doc.versions().len(), n);

        for _ in 0..n + 5 {
            doc.navigate(VersionChange::Prev);
        }
        prop_assert_eq!(doc.state().current_version_index, 0);

        for _ in 0..n + 5 {
            doc.navigate(VersionChange::Next);
        }
        prop_assert_eq!(doc.state().current_version_index, n - 1);
        prop_assert!(doc.cursor().is_latest());
        let expected = format!("version {}", n - 1);
        prop_assert_eq!(doc.state().content.as_str(), expected.as_str());
    }

    #[test]
    fn prop_foreign_kind_leaves_state_unchanged(
        seed in "[a-z]{1,20}",
        payload in "[a-z{}\\[\\]:,\"]{0,30}",
        kind in kind_strategy(),
        finished in any::<bool>(),
    ) {
        let mut doc = text_document();
        doc.apply(&text_delta(&seed));
        if finished {
            doc.finish(TerminalSignal::Complete);
        }
        let before = doc.state().clone();
        let phase = doc.phase();

        doc.apply(&StreamEvent::delta(&kind, payload.as_str()));

        prop_assert_eq!(doc.state(), &before);
        prop_assert_eq!(doc.phase(), phase);
    }

    #[test]
    fn prop_visibility_never_reverts(lengths in proptest::collection::vec(0usize..50, 1..20)) {
        let mut doc = code_document(20);
        let mut seen_visible = false;
        for len in lengths {
            doc.apply(&StreamEvent::delta(&ArtifactKind::CODE, "y".repeat(len).as_str()));
            if seen_visible {
                prop_assert!(doc.state().is_visible);
            }
            seen_visible = doc.state().is_visible;
        }
    }

    #[test]
    fn prop_unknown_tags_never_change_state(tag in "[a-z-]{1,16}", text in "[a-z]{0,10}") {
        prop_assume!(!tag.starts_with("data-"));
        let mut doc = text_document();
        doc.apply(&text_delta("base"));
        let before = doc.state().clone();
        doc.apply(&StreamEvent::new(tag, json!(text)));
        prop_assert_eq!(doc.state(), &before);
        prop_assert_eq!(doc.phase(), StreamPhase::Streaming);
    }
}
