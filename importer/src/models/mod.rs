//! Domain models for bulk imports.
//!
//! - [`TableType`] - Which record table an import targets
//! - [`FieldDefinition`] - One canonical column of a table schema
//! - [`RowRecord`] - One mapped row coming out of the widget
//! - [`ImportError`] - One field-level failure on a submitted row
//! - [`ImportResult`] - Outcome of a submission or webhook ingestion

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Table Types
// =============================================================================

/// Record table targeted by an import.
///
/// Parsing never fails: names that match no known table become
/// [`TableType::Other`], which still gets a usable default schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TableType {
    /// Clients / farmers.
    Clients,
    /// Animals registered to clients.
    Animals,
    /// Vaccination records.
    Vaccinations,
    /// Deworming and ectoparasite treatments.
    ParasiteControl,
    /// Laboratory samples and results.
    Laboratory,
    /// Equine health records.
    Equine,
    /// Stock of medicines and supplies.
    Inventory,
    /// Unrecognized or legacy table name.
    Other(String),
}

/// Name given to blank table names.
pub const UNKNOWN_TABLE: &str = "unknown";

const KNOWN_TABLES: &[TableType] = &[
    TableType::Clients,
    TableType::Animals,
    TableType::Vaccinations,
    TableType::ParasiteControl,
    TableType::Laboratory,
    TableType::Equine,
    TableType::Inventory,
];

impl TableType {
    /// Every known table, in menu order.
    pub fn all() -> &'static [TableType] {
        KNOWN_TABLES
    }

    /// Name used in URLs, headers and file names.
    pub fn slug(&self) -> &str {
        match self {
            TableType::Clients => "clients",
            TableType::Animals => "animals",
            TableType::Vaccinations => "vaccinations",
            TableType::ParasiteControl => "parasite_control",
            TableType::Laboratory => "laboratory",
            TableType::Equine => "equine",
            TableType::Inventory => "inventory",
            TableType::Other(name) if name.trim().is_empty() => UNKNOWN_TABLE,
            TableType::Other(name) => name,
        }
    }

    /// Human-readable name.
    pub fn label(&self) -> &str {
        match self {
            TableType::Clients => "Clients",
            TableType::Animals => "Animals",
            TableType::Vaccinations => "Vaccinations",
            TableType::ParasiteControl => "Parasite control",
            TableType::Laboratory => "Laboratory",
            TableType::Equine => "Equine health",
            TableType::Inventory => "Inventory",
            TableType::Other(name) if name.trim().is_empty() => "Unknown table",
            TableType::Other(name) => name,
        }
    }

    /// Whether this is one of the known tables.
    pub fn is_known(&self) -> bool {
        !matches!(self, TableType::Other(_))
    }

    /// Parse a table name, accepting common aliases.
    pub fn parse(name: &str) -> Self {
        let normalized = name.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "clients" | "client" | "farmers" | "farmer" | "owners" => TableType::Clients,
            "animals" | "animal" | "livestock" | "patients" => TableType::Animals,
            "vaccinations" | "vaccination" | "vaccines" | "vaccine" => TableType::Vaccinations,
            "parasite_control" | "parasites" | "deworming" | "antiparasitic" => {
                TableType::ParasiteControl
            }
            "laboratory" | "lab" | "lab_results" | "samples" => TableType::Laboratory,
            "equine" | "horses" | "equine_health" => TableType::Equine,
            "inventory" | "stock" | "supplies" => TableType::Inventory,
            "" => TableType::Other(UNKNOWN_TABLE.to_string()),
            _ => TableType::Other(name.trim().to_string()),
        }
    }
}

impl FromStr for TableType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(TableType::parse(s))
    }
}

impl fmt::Display for TableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl Serialize for TableType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.slug())
    }
}

impl<'de> Deserialize<'de> for TableType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(TableType::parse(&name))
    }
}

// =============================================================================
// Schema
// =============================================================================

/// One canonical column the operator maps source columns onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldDefinition {
    /// Label shown in the widget's mapping step
    pub label: &'static str,
    /// Key used in every [`RowRecord`]
    pub key: &'static str,
}

impl FieldDefinition {
    pub const fn new(label: &'static str, key: &'static str) -> Self {
        Self { label, key }
    }
}

// =============================================================================
// Rows
// =============================================================================

/// One mapped row, keyed by [`FieldDefinition::key`].
///
/// Serialized as the bare key/value map; the index is positional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RowRecord {
    /// Position in the normalized row set
    #[serde(skip)]
    pub index: usize,
    /// Mapped values
    #[serde(flatten)]
    pub values: Map<String, Value>,
}

impl RowRecord {
    pub fn new(index: usize, values: Map<String, Value>) -> Self {
        Self { index, values }
    }

    /// Value for a field key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }
}

impl Serialize for RowRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.values.serialize(serializer)
    }
}

// =============================================================================
// Results
// =============================================================================

/// A field-level failure on one submitted row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportError {
    /// Index into the submitted rows
    pub row_index: usize,
    /// Field key that failed
    #[serde(default)]
    pub field: String,
    /// Backend message
    #[serde(default)]
    pub message: String,
    /// Offending value
    #[serde(default)]
    pub value: Value,
}

/// Outcome of one submission, direct or via webhook.
///
/// `success` may be true while `errors` is non-empty: per-row failures
/// never fail the batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inserted_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ImportError>>,
}

impl ImportResult {
    /// Per-row errors, empty when none were reported.
    pub fn row_errors(&self) -> &[ImportError] {
        self.errors.as_deref().unwrap_or(&[])
    }

    /// One-line summary for logs and status messages.
    pub fn summary(&self) -> String {
        if let Some(ref message) = self.message {
            if !message.is_empty() {
                return message.clone();
            }
        }
        let inserted = self.inserted_count.unwrap_or(0);
        match self.row_errors().len() {
            0 => format!("Imported {} rows", inserted),
            n => format!("Imported {} rows, {} row errors", inserted, n),
        }
    }
}
