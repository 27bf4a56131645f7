//! Error types for the import pipeline.
//!
//! One enum per concern, converging on [`ImportFailure`]:
//!
//! - [`ConfigurationError`] - Missing license/template, bad origins or modes
//! - [`NormalizationError`] - Widget payload had no usable rows
//! - [`SubmissionError`] - Direct import request failed or was rejected
//! - [`ReportError`] - Error report serialization
//! - [`ImportFailure`] - What a session reports when it lands in `error`
//!
//! Conversions are `From` based so `?` works across boundaries.

use std::time::Duration;

use thiserror::Error;

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors in import configuration. Fatal to the attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// Widget license key not configured.
    #[error("Import is not configured: missing widget license key")]
    MissingLicense,

    /// Import template not configured for this table.
    #[error("Import is not configured: missing import template for '{0}'")]
    MissingTemplate(String),

    /// Origin could not be parsed as a URL.
    #[error("Invalid origin '{origin}': {message}")]
    InvalidOrigin { origin: String, message: String },

    /// Unknown completion mode.
    #[error("Unknown completion mode '{0}' (expected hybrid, webhook or direct)")]
    InvalidMode(String),

    /// Any other malformed setting.
    #[error("Invalid setting {key}: {message}")]
    InvalidSetting { key: String, message: String },
}

// =============================================================================
// Normalization Errors
// =============================================================================

/// The widget returned nothing that could become rows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizationError {
    /// No candidate shape held a non-empty array.
    #[error("No valid data was returned by the import widget")]
    NoRows,

    /// A non-empty array was found but none of its elements were objects.
    #[error("No valid data was returned by the import widget: {0} entries were not rows")]
    NoObjectRows(usize),
}

// =============================================================================
// Submission Errors
// =============================================================================

/// Errors from the direct import request (or a rejected webhook response).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    /// Network or client failure before a response arrived.
    #[error("Import request failed: {0}")]
    Transport(String),

    /// Non-2xx response.
    #[error("Import endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Body was not an import result.
    #[error("Invalid import response: {0}")]
    InvalidResponse(String),

    /// Backend answered `success: false`.
    #[error("Import rejected: {0}")]
    Rejected(String),
}

// =============================================================================
// Report Errors
// =============================================================================

/// Errors while writing the error report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// CSV writer failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Writer could not be flushed into a buffer.
    #[error("Report buffer error: {0}")]
    Buffer(String),

    /// Report output could not be written.
    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Session Failures (top-level)
// =============================================================================

/// Why a session landed in `error`.
///
/// Everything except configuration problems can be retried after a reset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportFailure {
    /// Missing or invalid configuration.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Widget did not come up in time.
    #[error("Import widget did not initialize within {}s", .0.as_secs())]
    InitializationTimeout(Duration),

    /// Widget results held no usable rows.
    #[error(transparent)]
    Normalization(#[from] NormalizationError),

    /// Direct submission or webhook response failed.
    #[error(transparent)]
    Submission(#[from] SubmissionError),

    /// The widget reported its own failure, surfaced verbatim.
    #[error("{0}")]
    Widget(String),
}

impl ImportFailure {
    /// Whether the operator can retry without changing configuration.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ImportFailure::Configuration(_))
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for configuration loading and resolution.
pub type ConfigResult<T> = Result<T, ConfigurationError>;

/// Result type for normalization.
pub type NormalizeResult<T> = Result<T, NormalizationError>;

/// Result type for submissions.
pub type SubmitResult<T> = Result<T, SubmissionError>;

/// Result type for error reports.
pub type ReportResult<T> = Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        let failure: ImportFailure = NormalizationError::NoRows.into();
        assert!(failure.to_string().contains("No valid data"));

        let failure: ImportFailure = SubmissionError::Status {
            status: 502,
            body: "bad gateway".into(),
        }
        .into();
        assert!(failure.to_string().contains("502"));
    }

    #[test]
    fn test_only_configuration_is_fatal() {
        assert!(!ImportFailure::from(ConfigurationError::MissingLicense).is_recoverable());
        assert!(ImportFailure::InitializationTimeout(Duration::from_secs(10)).is_recoverable());
        assert!(ImportFailure::Widget("boom".into()).is_recoverable());
        assert!(ImportFailure::from(SubmissionError::Rejected("no".into())).is_recoverable());
    }

    #[test]
    fn test_timeout_message() {
        let msg = ImportFailure::InitializationTimeout(Duration::from_secs(10)).to_string();
        assert!(msg.contains("10s"));
    }
}
