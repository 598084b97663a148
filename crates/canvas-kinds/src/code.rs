//! Code artifact
//!
//! Source streams in as plain text and is revealed once it is long enough to
//! be worth showing. The *Run* action hands the current source to an injected
//! [`CodeRunner`]; execution happens off the event queue and its console
//! output comes back as a run-tagged metadata update.

use async_trait::async_trait;
use canvas_artifact::{
    replace_content, ActionDescriptor, ActionError, ArtifactDefinition, ArtifactKind,
    ArtifactState, DefinitionError, Icon, Metadata, RevealPolicy, RunId, ToolbarEntry, View,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::adapter::code_view;

pub const DESCRIPTION: &str =
    "Useful for code generation; code execution is only available for python code.";
pub const LANGUAGE: &str = "python";
pub const REVEAL_AFTER_CHARS: usize = 300;

/// Effect key for sandboxed execution runs
pub const RUN_EFFECT: &str = "execute";

/// Sandboxed execution failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RunnerError {
    #[error("code execution is not available")]
    Unavailable,

    #[error("execution failed: {0}")]
    Failed(String),
}

/// External sandbox that executes source and returns its console lines
#[async_trait]
pub trait CodeRunner: Send + Sync + 'static {
    async fn run(&self, source: String) -> Result<Vec<String>, RunnerError>;
}

/// Runner for hosts without a sandbox
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableRunner;

#[async_trait]
impl CodeRunner for UnavailableRunner {
    async fn run(&self, _source: String) -> Result<Vec<String>, RunnerError> {
        Err(RunnerError::Unavailable)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsoleStatus {
    InProgress,
    Completed,
    Failed,
}

/// Console output of one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleOutput {
    pub run: RunId,
    pub status: ConsoleStatus,
    #[serde(default)]
    pub contents: Vec<String>,
}

impl ConsoleOutput {
    #[must_use]
    pub fn pending(run: RunId) -> Self {
        Self {
            run,
            status: ConsoleStatus::InProgress,
            contents: Vec::new(),
        }
    }

    #[must_use]
    pub fn completed(run: RunId, contents: Vec<String>) -> Self {
        Self {
            run,
            status: ConsoleStatus::Completed,
            contents,
        }
    }

    #[must_use]
    pub fn failed(run: RunId, message: String) -> Self {
        Self {
            run,
            status: ConsoleStatus::Failed,
            contents: vec![message],
        }
    }

    /// Lines to show in the console panel
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        match self.status {
            ConsoleStatus::InProgress if self.contents.is_empty() => vec!["Running...".to_string()],
            _ => self.contents.clone(),
        }
    }
}

/// Code metadata: console outputs, newest last
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CodeMetadata {
    #[serde(default)]
    pub outputs: Vec<ConsoleOutput>,
}

impl CodeMetadata {
    /// Replace the entry for `output.run`, or append if absent
    pub fn record(&mut self, output: ConsoleOutput) {
        match self.outputs.iter_mut().find(|o| o.run == output.run) {
            Some(existing) => *existing = output,
            None => self.outputs.push(output),
        }
    }
}

fn render(state: &ArtifactState) -> View {
    if state.content.is_empty() {
        return View::placeholder("Writing code...");
    }
    let outputs = state
        .metadata
        .to_typed::<CodeMetadata>()
        .map(|meta| meta.outputs)
        .unwrap_or_default();
    View::Code(code_view(state, LANGUAGE, &outputs))
}

fn run_action(runner: Arc<dyn CodeRunner>) -> ActionDescriptor {
    ActionDescriptor::new(Icon::Play, "Execute code", move |ctx| {
        let source = ctx.content().to_string();
        if source.trim().is_empty() {
            return Err(ActionError::InvalidContent("nothing to run".to_string()));
        }
        let runner = Arc::clone(&runner);
        let run = ctx.spawn(RUN_EFFECT, move |run| async move {
            let output = match runner.run(source).await {
                Ok(lines) => ConsoleOutput::completed(run, lines),
                Err(err) => ConsoleOutput::failed(run, err.to_string()),
            };
            canvas_artifact::typed_update(move |mut meta: CodeMetadata| {
                meta.record(output);
                meta
            })
        });
        tracing::debug!(%run, "code run started");
        ctx.update_metadata(move |_: CodeMetadata| CodeMetadata {
            outputs: vec![ConsoleOutput::pending(run)],
        });
        Ok(())
    })
    .with_label("Run")
}

/// Code kind definition executing through `runner`
///
/// # Errors
/// Only if the record is missing a handler, which would be a bug here
pub fn definition(runner: Arc<dyn CodeRunner>) -> Result<ArtifactDefinition, DefinitionError> {
    ArtifactDefinition::builder(ArtifactKind::CODE)
        .description(DESCRIPTION)
        .reveal(RevealPolicy::AfterChars(REVEAL_AFTER_CHARS))
        .initialize(|_| Metadata::from_typed(&CodeMetadata::default()).unwrap_or_default())
        .on_stream_part(replace_content)
        .content(render)
        .action(run_action(runner))
        .action(crate::common::view_previous())
        .action(crate::common::view_next())
        .action(crate::common::copy_content("Copy code to clipboard", "Copied to clipboard!"))
        .toolbar_entry(ToolbarEntry::prompt(
            Icon::MessageSquare,
            "Add comments",
            "Add comments to the code snippet for understanding",
        ))
        .toolbar_entry(ToolbarEntry::prompt(
            Icon::Logs,
            "Add logs",
            "Add logs to the code snippet for debugging",
        ))
        .build()
}
