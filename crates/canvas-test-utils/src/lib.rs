//! Testing utilities for the canvas workspace
//!
//! Shared fixtures: event builders, a built-in registry, and a scripted code
//! runner whose per-source latency lets tests force out-of-order completions.

#![allow(missing_docs)]

use async_trait::async_trait;
use canvas_artifact::{ArtifactKind, ArtifactRegistry, StreamEvent};
use canvas_kinds::{builtin_registry, CodeRunner, RunnerError};
use parking_lot::Mutex;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

pub fn text_delta(text: &str) -> StreamEvent {
    StreamEvent::delta(&ArtifactKind::TEXT, text)
}

pub fn code_delta(source: &str) -> StreamEvent {
    StreamEvent::delta(&ArtifactKind::CODE, source)
}

pub fn sheet_delta(sheet: JsonValue) -> StreamEvent {
    StreamEvent::delta(&ArtifactKind::SHEET, sheet)
}

/// One delta per growing prefix of `text`, as a model would stream it
pub fn growing_snapshots(kind: &ArtifactKind, text: &str) -> Vec<StreamEvent> {
    text.char_indices()
        .map(|(i, c)| StreamEvent::delta(kind, &text[..i + c.len_utf8()]))
        .collect()
}

/// Parse newline-delimited stream events, skipping blank lines
pub fn events_from_jsonl(input: &str) -> Vec<StreamEvent> {
    input
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

/// Registry with the built-in kinds, running code through `runner`
pub fn test_registry(runner: Arc<dyn CodeRunner>) -> Arc<ArtifactRegistry> {
    Arc::new(builtin_registry(runner).unwrap())
}

/// Code runner with scripted output and latency per source
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    scripts: HashMap<String, (Duration, Result<Vec<String>, RunnerError>)>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn script(mut self, source: &str, delay: Duration, lines: &[&str]) -> Self {
        let lines = lines.iter().map(|line| (*line).to_string()).collect();
        self.scripts.insert(source.to_string(), (delay, Ok(lines)));
        self
    }

    #[must_use]
    pub fn fail(mut self, source: &str, delay: Duration, message: &str) -> Self {
        self.scripts.insert(
            source.to_string(),
            (delay, Err(RunnerError::Failed(message.to_string()))),
        );
        self
    }

    /// Sources executed so far, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl CodeRunner for ScriptedRunner {
    async fn run(&self, source: String) -> Result<Vec<String>, RunnerError> {
        self.calls.lock().push(source.clone());
        let (delay, result) = self
            .scripts
            .get(&source)
            .cloned()
            .unwrap_or((Duration::ZERO, Ok(Vec::new())));
        tokio::time::sleep(delay).await;
        result
    }
}
