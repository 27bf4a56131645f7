//! # Vetimport - bulk record imports for Vetfield
//!
//! Vetimport runs the import flow behind the Vetfield dialog: an operator
//! launches a third-party validation widget for one table (clients,
//! animals, vaccinations, ...), reviews the rows it returns, and the rows
//! are ingested either by our own request or by the widget's hosted
//! backend calling our webhook.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Widget    │────▶│  Normalize  │────▶│   Preview   │────▶│   Submit /  │
//! │ (onResults) │     │   (rows)    │     │  (confirm)  │     │   Webhook   │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//!                                                                    │
//!                                                             ┌─────────────┐
//!                                                             │ Error report│
//!                                                             └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use vetimport::{ImportConfig, ImportSession, SessionSettings, TableType, WidgetUser};
//!
//! let config = ImportConfig::from_env()?;
//! let settings = SessionSettings::from_config(&config, TableType::Vaccinations, Some(token));
//! let mut session = ImportSession::new(settings);
//! let effects = session.launch(WidgetUser::new("vet-17"));
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types per concern
//! - [`models`] - Tables, rows, results
//! - [`schema`] - Canonical fields per table
//! - [`webhook`] - Webhook URL and header resolution
//! - [`normalize`] - Widget payload to rows
//! - [`session`] - Import state machine
//! - [`driver`] - Runs a session against a widget, a submitter and a timer
//! - [`preview`] - Bounded row preview
//! - [`report`] - Per-row error CSV
//! - [`config`] - Environment configuration
//! - [`activity`] - Per-session activity log

// Core modules
pub mod error;
pub mod models;
pub mod config;
pub mod activity;

// Schema and addressing
pub mod schema;
pub mod webhook;

// Row handling
pub mod normalize;
pub mod preview;
pub mod report;

// Session
pub mod widget;
pub mod submit;
pub mod session;
pub mod driver;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ConfigurationError,
    NormalizationError,
    SubmissionError,
    ReportError,
    ImportFailure,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    TableType,
    FieldDefinition,
    RowRecord,
    ImportError,
    ImportResult,
};

// =============================================================================
// Re-exports - Configuration
// =============================================================================

pub use config::{CompletionMode, ImportConfig};

// =============================================================================
// Re-exports - Rows
// =============================================================================

pub use schema::fields_for;
pub use webhook::{resolve as resolve_webhook, WebhookEnv, WebhookTarget};
pub use normalize::{normalize, PayloadShape};
pub use preview::{render as render_preview, render_with_fields, PreviewColumn, PreviewTable};
pub use report::{to_csv, ErrorReport};

// =============================================================================
// Re-exports - Session
// =============================================================================

pub use session::{Effect, ImportSession, ImportState, SessionSettings, SessionSnapshot};
pub use driver::{SessionCommand, SessionController, SessionDriver, SessionObserver, Timer};
pub use widget::{
    WidgetCallbacks,
    WidgetEvent,
    WidgetEventKind,
    WidgetFailure,
    WidgetHandle,
    WidgetProvider,
    WidgetRequest,
    WidgetUser,
};
pub use submit::{DirectImportRequest, ImportSubmitter};
pub use activity::{ActivityLog, LogEntry, LogLevel};

#[cfg(feature = "native")]
pub use driver::TokioTimer;

#[cfg(feature = "native")]
pub use submit::http::HttpImportClient;
