//! Bounded, read-only projection of normalized rows for review.
//!
//! Large imports are clipped to `max_rows` so the dialog stays responsive;
//! the table reports how many rows exist in total.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value;

use crate::config::DEFAULT_PREVIEW_MAX_ROWS;
use crate::models::{FieldDefinition, RowRecord};

/// Widest cell in the text rendering.
const TEXT_CELL_WIDTH: usize = 24;

/// A column of the preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewColumn {
    pub key: String,
    pub label: String,
}

/// Rows prepared for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewTable {
    pub columns: Vec<PreviewColumn>,
    pub rows: Vec<RowRecord>,
    /// Rows available before clipping
    pub total: usize,
}

impl PreviewTable {
    pub fn shown(&self) -> usize {
        self.rows.len()
    }

    pub fn truncated(&self) -> bool {
        self.total > self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Display text for one cell; missing keys render empty.
    pub fn cell(&self, row: &RowRecord, column: &PreviewColumn) -> String {
        row.get(&column.key).map(cell_text).unwrap_or_default()
    }

    /// "Showing N of M rows" style caption.
    pub fn summary(&self) -> String {
        if self.truncated() {
            format!("Showing first {} of {} rows", self.shown(), self.total)
        } else {
            format!("{} rows", self.total)
        }
    }

    /// Plain-text table for terminals.
    pub fn to_text(&self) -> String {
        let headers: Vec<String> = std::iter::once("#".to_string())
            .chain(self.columns.iter().map(|c| clip(&c.label)))
            .collect();
        let body: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| {
                std::iter::once((row.index + 1).to_string())
                    .chain(self.columns.iter().map(|c| clip(&self.cell(row, c))))
                    .collect()
            })
            .collect();

        let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
        for line in &body {
            for (width, cell) in widths.iter_mut().zip(line) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut out = String::new();
        push_line(&mut out, &headers, &widths);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        push_line(&mut out, &rule, &widths);
        for line in &body {
            push_line(&mut out, line, &widths);
        }
        out.push_str(&self.summary());
        out.push('\n');
        out
    }
}

/// Project `rows` with columns in first-appearance order.
pub fn render(rows: &[RowRecord], max_rows: usize) -> PreviewTable {
    let shown = &rows[..rows.len().min(max_rows)];
    let mut seen = HashSet::new();
    let columns = shown
        .iter()
        .flat_map(|row| row.values.keys())
        .filter(|key| seen.insert(key.as_str()))
        .map(|key| PreviewColumn {
            key: key.clone(),
            label: key.clone(),
        })
        .collect();

    PreviewTable {
        columns,
        rows: shown.to_vec(),
        total: rows.len(),
    }
}

/// Project `rows` with schema columns first (labelled), then any extra
/// keys the operator mapped in first-appearance order.
pub fn render_with_fields(rows: &[RowRecord], fields: &[FieldDefinition], max_rows: usize) -> PreviewTable {
    let mut table = render(rows, max_rows);
    let extras: Vec<PreviewColumn> = table
        .columns
        .drain(..)
        .filter(|c| !fields.iter().any(|f| f.key == c.key))
        .collect();

    table.columns = fields
        .iter()
        .map(|f| PreviewColumn {
            key: f.key.to_string(),
            label: f.label.to_string(),
        })
        .chain(extras)
        .collect();
    table
}

/// Default-sized preview.
pub fn render_default(rows: &[RowRecord]) -> PreviewTable {
    render(rows, DEFAULT_PREVIEW_MAX_ROWS)
}

/// Strings raw, null empty, anything else as JSON.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn clip(text: &str) -> String {
    let single_line = text.replace(['\n', '\r'], " ");
    if single_line.chars().count() <= TEXT_CELL_WIDTH {
        return single_line;
    }
    let mut clipped: String = single_line.chars().take(TEXT_CELL_WIDTH - 1).collect();
    clipped.push('…');
    clipped
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect();
    out.push_str(padded.join(" | ").trim_end());
    out.push('\n');
}
