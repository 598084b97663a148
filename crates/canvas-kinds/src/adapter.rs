//! Widget adapters
//!
//! Each adapter turns validated content into the declared input schema of
//! one presentational widget. Shape mismatches fail here, at the boundary,
//! instead of reaching the widget.

use canvas_artifact::{ArtifactState, CodeView, DocumentView, GridView};
use serde_json::Value as JsonValue;
use std::collections::HashSet;

use crate::code::ConsoleOutput;
use crate::sheet::{SheetData, SheetParseError};

/// Validate a parsed sheet into grid input
///
/// Columns must be named and unique. Every cell becomes display text,
/// ordered by the declared columns; a missing cell is empty.
///
/// # Errors
/// - [`SheetParseError::UnnamedColumn`] for a column with a blank name
/// - [`SheetParseError::DuplicateColumn`] when two columns share a name
pub fn grid_view(sheet: &SheetData) -> Result<GridView, SheetParseError> {
    let mut seen = HashSet::with_capacity(sheet.columns.len());
    for (index, column) in sheet.columns.iter().enumerate() {
        if column.name.trim().is_empty() {
            return Err(SheetParseError::UnnamedColumn(index));
        }
        if !seen.insert(column.name.as_str()) {
            return Err(SheetParseError::DuplicateColumn(column.name.clone()));
        }
    }

    let rows = sheet
        .rows
        .iter()
        .map(|row| {
            sheet
                .columns
                .iter()
                .enumerate()
                .map(|(index, column)| row.cell(index, column).map_or_else(String::new, cell_text))
                .collect()
        })
        .collect();

    Ok(GridView {
        columns: sheet.columns.iter().map(|c| c.name.clone()).collect(),
        rows,
        read_only: true,
    })
}

fn cell_text(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => String::new(),
        JsonValue::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Code editor input; read-only while the model is still writing
#[must_use]
pub fn code_view(state: &ArtifactState, language: &str, outputs: &[ConsoleOutput]) -> CodeView {
    CodeView {
        source: state.content.clone(),
        language: Some(language.to_string()),
        line_count: state.content.lines().count(),
        read_only: state.is_streaming(),
        console: outputs.last().map(ConsoleOutput::lines).unwrap_or_default(),
    }
}

#[must_use]
pub fn document_view(state: &ArtifactState) -> DocumentView {
    DocumentView {
        body: state.content.clone(),
        is_streaming: state.is_streaming(),
    }
}
