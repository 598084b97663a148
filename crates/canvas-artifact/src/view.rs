//! Render output handed to the presentational widgets
//!
//! The widgets themselves live outside this workspace. Each `*View` struct is
//! the declared input schema of one widget; kind adapters validate content
//! into these before anything crosses the boundary.

use serde::{Deserialize, Serialize};

/// Symbolic icon names; the embedding UI maps them to glyphs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Icon {
    Copy,
    Download,
    Sparkles,
    Search,
    Hand,
    Pen,
    MessageSquare,
    Play,
    Undo,
    Redo,
    Logs,
    Table,
}

/// Rendered artifact view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "widget", rename_all = "kebab-case")]
pub enum View {
    /// Shown while content is missing, partial or malformed
    Placeholder(Placeholder),
    /// Prose document
    Document(DocumentView),
    /// Source code editor
    Code(CodeView),
    /// Spreadsheet grid
    Grid(GridView),
}

impl View {
    #[must_use]
    pub fn placeholder(message: impl Into<String>) -> Self {
        Self::Placeholder(Placeholder {
            icon: None,
            message: message.into(),
        })
    }

    #[inline]
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placeholder {
    pub icon: Option<Icon>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentView {
    pub body: String,
    pub is_streaming: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeView {
    pub source: String,
    pub language: Option<String>,
    pub line_count: usize,
    pub read_only: bool,
    /// Console lines of the most recent run
    pub console: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridView {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub read_only: bool,
}

impl GridView {
    #[inline]
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}
