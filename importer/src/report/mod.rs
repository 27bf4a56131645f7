//! Per-row error export.
//!
//! Produces the CSV an operator downloads to fix rejected rows. The header
//! is bare; data fields, message and value included, are always quoted.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use csv::QuoteStyle;
use serde_json::Value;

use crate::error::{ReportError, ReportResult};
use crate::models::{ImportError, TableType};

pub const REPORT_HEADER: [&str; 4] = ["Row Index", "Field", "Error Message", "Value"];

/// Serialize errors to CSV text, header first.
///
/// The header is written bare; every data field is quoted so messages
/// and values survive spreadsheet imports untouched.
pub fn to_csv(errors: &[ImportError]) -> ReportResult<String> {
    let mut header = csv::WriterBuilder::new().from_writer(Vec::new());
    header.write_record(REPORT_HEADER)?;
    let buffer = header
        .into_inner()
        .map_err(|e| ReportError::Buffer(e.to_string()))?;

    let mut writer = csv::WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(buffer);
    for error in errors {
        writer.write_record([
            error.row_index.to_string(),
            error.field.clone(),
            error.message.clone(),
            value_text(&error.value),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ReportError::Buffer(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ReportError::Buffer(e.to_string()))
}

/// `import_errors_<table>_<YYYY-MM-DD>.csv`
pub fn filename(table_type: &TableType, date: NaiveDate) -> String {
    format!("import_errors_{}_{}.csv", table_type.slug(), date.format("%Y-%m-%d"))
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A ready-to-save error report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    pub filename: String,
    pub contents: String,
    pub error_count: usize,
}

impl ErrorReport {
    pub fn build(table_type: &TableType, errors: &[ImportError], date: NaiveDate) -> ReportResult<Self> {
        Ok(Self {
            filename: filename(table_type, date),
            contents: to_csv(errors)?,
            error_count: errors.len(),
        })
    }

    /// Report dated with the local calendar day.
    pub fn build_today(table_type: &TableType, errors: &[ImportError]) -> ReportResult<Self> {
        Self::build(table_type, errors, Local::now().date_naive())
    }

    /// Write into `dir`, returning the full path.
    pub fn write_to(&self, dir: &Path) -> ReportResult<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.filename);
        fs::write(&path, &self.contents)?;
        log::info!("Wrote {} row errors to {}", self.error_count, path.display());
        Ok(path)
    }
}
