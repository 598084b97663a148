//! Spreadsheet artifact
//!
//! Content is sheet JSON (`{"rows": [...], "columns": [...]}`) stored as
//! text. Rendering goes through the grid adapter; anything unparsable, or a
//! sheet without rows, shows the preparing placeholder instead.

use canvas_artifact::{
    replace_content, ActionDescriptor, ArtifactDefinition, ArtifactKind,
    ArtifactState, DefinitionError, FileExport, Icon, Metadata, Notification, ToolbarEntry, View,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::adapter::grid_view;

pub const DESCRIPTION: &str = "Useful for spreadsheet-like data manipulation and visualization.";
pub const PLACEHOLDER: &str = "Preparing your spreadsheet data...";
pub const EXPORT_FILE_NAME: &str = "spreadsheet.csv";

/// Sheet parse or validation failure; always recovered locally
#[derive(Debug, thiserror::Error)]
pub enum SheetParseError {
    #[error("sheet json is malformed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("column {0} has no name")]
    UnnamedColumn(usize),

    #[error("duplicate column name: {0}")]
    DuplicateColumn(String),

    #[error("csv encode failed: {0}")]
    Csv(#[from] csv::Error),
}

/// Column declaration
///
/// `key` selects the row field when it differs from the display `name`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SheetColumn {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl SheetColumn {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: None,
        }
    }

    /// Row field this column reads
    #[inline]
    #[must_use]
    pub fn field(&self) -> &str {
        self.key.as_deref().unwrap_or(&self.name)
    }
}

/// One sheet row: a record keyed by column field, or positional cells
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SheetRow {
    Record(Map<String, JsonValue>),
    Cells(Vec<JsonValue>),
}

impl SheetRow {
    /// Cell for the column at `index`
    #[must_use]
    pub fn cell(&self, index: usize, column: &SheetColumn) -> Option<&JsonValue> {
        match self {
            Self::Record(fields) => fields.get(column.field()),
            Self::Cells(cells) => cells.get(index),
        }
    }
}

/// Sheet metadata and parsed content shape
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SheetData {
    #[serde(default)]
    pub rows: Vec<SheetRow>,
    #[serde(default)]
    pub columns: Vec<SheetColumn>,
}

impl SheetData {
    /// Parse sheet content text
    ///
    /// # Errors
    /// Returns [`SheetParseError::Json`] for malformed or partial JSON
    pub fn parse(content: &str) -> Result<Self, SheetParseError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(content)?)
    }

    /// Encode as CSV: header of column names, then one line per row in
    /// declared column order, without a trailing newline
    ///
    /// # Errors
    /// Returns error if the columns fail validation or encoding fails
    pub fn to_csv(&self) -> Result<String, SheetParseError> {
        let grid = grid_view(self)?;
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        writer.write_record(&grid.columns)?;
        for row in &grid.rows {
            writer.write_record(row)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|err| SheetParseError::Csv(err.into_error().into()))?;
        let mut text = String::from_utf8_lossy(&bytes).into_owned();
        if text.ends_with('\n') {
            text.pop();
        }
        Ok(text)
    }
}

fn render(state: &ArtifactState) -> View {
    let parsed = SheetData::parse(&state.content).and_then(|data| grid_view(&data));
    match parsed {
        Ok(grid) if grid.row_count() > 0 => View::Grid(grid),
        Ok(_) => preparing(),
        Err(err) => {
            tracing::debug!(document = %state.document_id, error = %err, "sheet not renderable yet");
            preparing()
        }
    }
}

fn preparing() -> View {
    View::Placeholder(canvas_artifact::Placeholder {
        icon: Some(Icon::Table),
        message: PLACEHOLDER.to_string(),
    })
}

fn export_action() -> ActionDescriptor {
    ActionDescriptor::new(Icon::Download, "Download as CSV", |ctx| {
        let csv = match SheetData::parse(ctx.content()).and_then(|data| data.to_csv()) {
            Ok(csv) => csv,
            Err(err) => {
                tracing::warn!(error = %err, "sheet export failed");
                ctx.notify(Notification::error("Export failed"));
                return Ok(());
            }
        };
        ctx.platform().save_file(FileExport::csv(EXPORT_FILE_NAME, csv))?;
        ctx.notify(Notification::success("Downloaded!"));
        Ok(())
    })
    .with_label("Export")
}

/// Sheet kind definition
///
/// # Errors
/// Only if the record is missing a handler, which would be a bug here
pub fn definition() -> Result<ArtifactDefinition, DefinitionError> {
    ArtifactDefinition::builder(ArtifactKind::SHEET)
        .description(DESCRIPTION)
        .initialize(|_| Metadata::from_typed(&SheetData::default()).unwrap_or_default())
        .on_stream_part(replace_content)
        .content(render)
        .action(export_action())
        .action(crate::common::copy_content("Copy JSON", "Copied!"))
        .toolbar_entry(ToolbarEntry::prompt(Icon::Sparkles, "Format data", "Format this sheet."))
        .toolbar_entry(ToolbarEntry::prompt(Icon::Search, "Analyze", "Analyze trends."))
        .toolbar_entry(ToolbarEntry::prompt(Icon::Hand, "Summarize", "Summarize this."))
        .build()
}
