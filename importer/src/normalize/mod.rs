//! Row extraction from widget result payloads.
//!
//! The widget's result shape is undocumented and differs between
//! integration modes, so rows are looked up through an ordered list of
//! shape matchers. The first candidate holding a non-empty array wins.
//!
//! ```text
//! [ ... ]                  -> Bare
//! { "validData": [...] }   -> ValidData
//! { "data": [...] }        -> Data
//! { "rows": [...] }        -> Rows
//! { "importedData": [...]} -> ImportedData
//! { "results": [...] }     -> Results
//! ```

use serde_json::Value;

use crate::error::{NormalizationError, NormalizeResult};
use crate::models::RowRecord;

/// Which payload shape the rows were found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    Bare,
    ValidData,
    Data,
    Rows,
    ImportedData,
    Results,
}

impl PayloadShape {
    /// Matchers in priority order.
    pub const PRIORITY: [PayloadShape; 6] = [
        PayloadShape::Bare,
        PayloadShape::ValidData,
        PayloadShape::Data,
        PayloadShape::Rows,
        PayloadShape::ImportedData,
        PayloadShape::Results,
    ];

    /// Object key this shape reads, `None` for a bare array.
    pub fn key(&self) -> Option<&'static str> {
        match self {
            PayloadShape::Bare => None,
            PayloadShape::ValidData => Some("validData"),
            PayloadShape::Data => Some("data"),
            PayloadShape::Rows => Some("rows"),
            PayloadShape::ImportedData => Some("importedData"),
            PayloadShape::Results => Some("results"),
        }
    }

    fn extract<'a>(&self, payload: &'a Value) -> Option<&'a Vec<Value>> {
        let candidate = match self.key() {
            None => payload,
            Some(key) => payload.get(key)?,
        };
        candidate.as_array().filter(|rows| !rows.is_empty())
    }
}

/// Rows plus the shape they came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub shape: PayloadShape,
    pub rows: Vec<RowRecord>,
    /// Entries dropped because they were not objects
    pub skipped: usize,
}

/// Find the row array in a widget payload.
pub fn locate(payload: &Value) -> Option<(PayloadShape, &Vec<Value>)> {
    PayloadShape::PRIORITY
        .iter()
        .find_map(|shape| shape.extract(payload).map(|rows| (*shape, rows)))
}

/// Extract rows, reporting the winning shape.
pub fn normalize_detailed(payload: &Value) -> NormalizeResult<Normalized> {
    let (shape, entries) = locate(payload).ok_or(NormalizationError::NoRows)?;

    let mut rows = Vec::with_capacity(entries.len());
    let mut skipped = 0;
    for entry in entries {
        match entry.as_object() {
            Some(values) => rows.push(RowRecord::new(rows.len(), values.clone())),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        log::warn!("Skipped {} non-object entries in widget {:?} payload", skipped, shape);
    }
    if rows.is_empty() {
        return Err(NormalizationError::NoObjectRows(skipped));
    }

    log::debug!("Normalized {} rows from {:?} payload", rows.len(), shape);
    Ok(Normalized { shape, rows, skipped })
}

/// Extract rows from a widget payload.
pub fn normalize(payload: &Value) -> NormalizeResult<Vec<RowRecord>> {
    normalize_detailed(payload).map(|n| n.rows)
}
