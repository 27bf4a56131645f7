//! Import session state machine.
//!
//! ```text
//!            launch()                  results ok            confirm()
//!   ┌──────┐ ───────▶ ┌──────────────┐ ─────────▶ ┌─────────┐ ───────▶ ┌─────────┐
//!   │ idle │          │ initializing │            │ preview │          │ sending │
//!   └──────┘ ◀─────── └──────────────┘            └─────────┘          └─────────┘
//!      ▲    widget open    │ timeout / load error      │ webhook ok         │ http ok
//!      │                   ▼                           ▼                    ▼
//!      │               ┌───────┐                   ┌──────┐ ◀──────────────┘
//!      └─── reset() ── │ error │                   │ done │
//!                      └───────┘                   └──────┘
//! ```
//!
//! The session performs no IO. Each operation returns [`Effect`]s for a
//! driver to execute, and every asynchronous completion comes back tagged
//! with the launch generation that started it. A completion whose
//! generation is not current is ignored, so nothing fires into a reset or
//! disposed session.
//!
//! The webhook `onComplete` path and the manual confirm path race to the
//! terminal state. Whichever gets there first is kept; the other becomes a
//! no-op.

mod settings;

pub use settings::SessionSettings;

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::activity::{ActivityLog, LogEntry};
use crate::error::{ImportFailure, SubmissionError, SubmitResult};
use crate::models::{ImportError, ImportResult, RowRecord, TableType};
use crate::normalize::normalize_detailed;
use crate::submit::DirectImportRequest;
use crate::widget::{ConstructResult, WidgetEvent, WidgetEventKind, WidgetHandle, WidgetRequest, WidgetUser};

// =============================================================================
// States and effects
// =============================================================================

/// Lifecycle state of one import attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportState {
    Idle,
    Initializing,
    Preview,
    Sending,
    Done,
    Error,
}

impl ImportState {
    /// `done` and `error` only leave through reset.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ImportState::Done | ImportState::Error)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImportState::Idle => "idle",
            ImportState::Initializing => "initializing",
            ImportState::Preview => "preview",
            ImportState::Sending => "sending",
            ImportState::Done => "done",
            ImportState::Error => "error",
        }
    }
}

impl fmt::Display for ImportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Work the driver must perform on the session's behalf.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Construct a widget; report back through [`ImportSession::widget_constructed`].
    Construct { generation: u64, request: WidgetRequest },
    /// Arm the init timeout; report back through [`ImportSession::init_timed_out`].
    StartTimeout { generation: u64, after: Duration },
    /// Disarm the pending init timeout.
    CancelTimeout,
    /// POST rows; report back through [`ImportSession::submission_finished`].
    Submit { generation: u64, request: DirectImportRequest },
    /// Normalized rows for the host to inspect.
    RowsReady(Rc<Vec<RowRecord>>),
    /// Session reached `done`.
    Finished(ImportResult),
    /// Session reached `error`.
    Failed(ImportFailure),
}

/// Which writer completed the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionSource {
    Direct,
    Webhook,
}

impl fmt::Display for CompletionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompletionSource::Direct => f.write_str("direct import"),
            CompletionSource::Webhook => f.write_str("webhook"),
        }
    }
}

/// Read-only view of a session for hosts.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub table_type: TableType,
    pub state: ImportState,
    pub is_initializing: bool,
    pub has_widget: bool,
    pub can_launch: bool,
    pub can_confirm: bool,
    pub preview_rows: Rc<Vec<RowRecord>>,
    pub result: Option<ImportResult>,
    pub errors: Vec<ImportError>,
    pub message: String,
    pub failure: Option<ImportFailure>,
    pub activity: Vec<LogEntry>,
}

// =============================================================================
// Session
// =============================================================================

/// State machine for one import attempt on one table.
pub struct ImportSession {
    id: Uuid,
    settings: SessionSettings,
    state: ImportState,
    is_initializing: bool,
    /// Results beat the widget handle; adopt the handle when it lands
    awaiting_handle: bool,
    generation: u64,
    pending_timeout: Option<u64>,
    handle: Option<Box<dyn WidgetHandle>>,
    rows: Rc<Vec<RowRecord>>,
    result: Option<ImportResult>,
    errors: Vec<ImportError>,
    message: String,
    failure: Option<ImportFailure>,
    pending_completion: Option<ImportResult>,
    disposed: bool,
    activity: ActivityLog,
}

impl ImportSession {
    pub fn new(settings: SessionSettings) -> Self {
        Self {
            id: Uuid::new_v4(),
            settings,
            state: ImportState::Idle,
            is_initializing: false,
            awaiting_handle: false,
            generation: 0,
            pending_timeout: None,
            handle: None,
            rows: Rc::new(Vec::new()),
            result: None,
            errors: Vec::new(),
            message: String::new(),
            failure: None,
            pending_completion: None,
            disposed: false,
            activity: ActivityLog::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn table_type(&self) -> &TableType {
        &self.settings.table_type
    }

    pub fn state(&self) -> ImportState {
        self.state
    }

    pub fn is_initializing(&self) -> bool {
        self.is_initializing
    }

    pub fn has_widget(&self) -> bool {
        self.handle.is_some()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Current launch generation; bumps on launch, reset and unmount.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn rows(&self) -> &[RowRecord] {
        &self.rows
    }

    pub fn result(&self) -> Option<&ImportResult> {
        self.result.as_ref()
    }

    pub fn errors(&self) -> &[ImportError] {
        &self.errors
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn failure(&self) -> Option<&ImportFailure> {
        self.failure.as_ref()
    }

    pub fn activity(&self) -> &ActivityLog {
        &self.activity
    }

    pub fn can_launch(&self) -> bool {
        !self.disposed && self.state == ImportState::Idle && !self.is_initializing && self.handle.is_none()
    }

    pub fn can_confirm(&self) -> bool {
        self.state == ImportState::Preview && self.settings.completion_mode.accepts_confirm()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id,
            table_type: self.settings.table_type.clone(),
            state: self.state,
            is_initializing: self.is_initializing,
            has_widget: self.has_widget(),
            can_launch: self.can_launch(),
            can_confirm: self.can_confirm(),
            preview_rows: Rc::clone(&self.rows),
            result: self.result.clone(),
            errors: self.errors.clone(),
            message: self.message.clone(),
            failure: self.failure.clone(),
            activity: self.activity.to_vec(),
        }
    }

    // -------------------------------------------------------------------------
    // Operator commands
    // -------------------------------------------------------------------------

    /// Start a widget for `user`.
    ///
    /// Rejected while a launch is in flight, while a widget is open, or
    /// outside `idle`. Missing configuration fails immediately without
    /// constructing anything.
    pub fn launch(&mut self, user: WidgetUser) -> Vec<Effect> {
        if self.disposed {
            return Vec::new();
        }
        if self.is_initializing {
            self.activity.warning("Import widget is already starting");
            return Vec::new();
        }
        if self.handle.is_some() {
            self.activity.warning("Import widget is already open; start over to relaunch it");
            return Vec::new();
        }
        if self.state != ImportState::Idle {
            self.activity
                .warning(format!("Cannot launch while {}; start over first", self.state));
            return Vec::new();
        }

        let request = match self.settings.widget_request(user) {
            Ok(request) => request,
            Err(e) => return self.fail(e.into()),
        };

        self.generation += 1;
        let generation = self.generation;
        self.is_initializing = true;
        self.pending_timeout = Some(generation);
        self.state = ImportState::Initializing;
        self.message.clear();
        self.activity.info(format!(
            "Launching import widget for {} ({} fields)",
            self.settings.table_type.label(),
            request.fields.len()
        ));

        vec![
            Effect::StartTimeout {
                generation,
                after: self.settings.init_timeout,
            },
            Effect::Construct { generation, request },
        ]
    }

    /// Submit the previewed rows through the direct import endpoint.
    pub fn confirm(&mut self) -> Vec<Effect> {
        if self.state != ImportState::Preview {
            self.activity
                .warning(format!("Nothing to confirm while {}", self.state));
            return Vec::new();
        }
        if !self.settings.completion_mode.accepts_confirm() {
            self.activity
                .warning("Manual confirm is disabled in webhook mode; waiting for the import service");
            return Vec::new();
        }

        self.state = ImportState::Sending;
        self.message = format!("Sending {} rows...", self.rows.len());
        self.activity.info(self.message.clone());

        vec![Effect::Submit {
            generation: self.generation,
            request: DirectImportRequest {
                table_type: self.settings.table_type.clone(),
                rows: self.rows.as_ref().clone(),
                dromo_backend_key: self.settings.backend_key.clone(),
            },
        }]
    }

    /// Back to `idle` from anywhere, tearing the widget down.
    pub fn reset(&mut self) -> Vec<Effect> {
        let effects = self.clear_session();
        if !self.disposed {
            self.activity.info("Session reset");
        }
        effects
    }

    /// Host is going away: reset and refuse further work.
    pub fn unmount(&mut self) -> Vec<Effect> {
        let effects = self.clear_session();
        self.disposed = true;
        effects
    }

    // -------------------------------------------------------------------------
    // Asynchronous completions
    // -------------------------------------------------------------------------

    /// Widget construction finished for `generation`.
    pub fn widget_constructed(&mut self, generation: u64, result: ConstructResult) -> Vec<Effect> {
        let expected = self.is_initializing || self.awaiting_handle;
        if generation != self.generation || !expected || self.disposed {
            if let Ok(mut stale) = result {
                stale.dispose();
                log::debug!("Disposed widget from stale launch {}", generation);
            }
            return Vec::new();
        }

        match result {
            Ok(mut handle) => {
                let mut effects = self.clear_timeout();
                self.is_initializing = false;
                if std::mem::take(&mut self.awaiting_handle) {
                    // Results arrived before the handle; keep it without reopening.
                    self.handle = Some(handle);
                    return effects;
                }
                match handle.open() {
                    Ok(()) => {
                        self.handle = Some(handle);
                        self.state = ImportState::Idle;
                        self.activity.info("Import widget opened; waiting for the operator");
                    }
                    Err(e) => {
                        handle.dispose();
                        effects.extend(self.fail(ImportFailure::Widget(format!("Failed to open import widget: {}", e))));
                    }
                }
                effects
            }
            Err(e) if std::mem::take(&mut self.awaiting_handle) => {
                self.activity
                    .warning(format!("Import widget failed to load after its results arrived: {}", e));
                Vec::new()
            }
            Err(e) => self.fail(ImportFailure::Widget(format!("Failed to load import widget: {}", e))),
        }
    }

    /// The init timeout armed for `generation` fired.
    pub fn init_timed_out(&mut self, generation: u64) -> Vec<Effect> {
        if self.pending_timeout != Some(generation) {
            return Vec::new();
        }
        self.pending_timeout = None;
        if !self.is_initializing {
            return Vec::new();
        }
        self.fail(ImportFailure::InitializationTimeout(self.settings.init_timeout))
    }

    /// A widget callback fired.
    pub fn handle_event(&mut self, event: WidgetEvent) -> Vec<Effect> {
        if event.generation != self.generation || self.disposed {
            log::debug!(
                "Ignoring widget event from launch {} (current {})",
                event.generation,
                self.generation
            );
            return Vec::new();
        }
        match event.kind {
            WidgetEventKind::Results(payload) => self.results(payload),
            WidgetEventKind::Error(message) => self.widget_error(message),
            WidgetEventKind::Complete(event) => self.completed(event),
        }
    }

    /// The direct import request for `generation` finished.
    pub fn submission_finished(&mut self, generation: u64, result: SubmitResult<ImportResult>) -> Vec<Effect> {
        if generation != self.generation || self.state != ImportState::Sending {
            self.activity.info(format!(
                "Ignoring direct import response: session already {}",
                self.state
            ));
            return Vec::new();
        }
        match result {
            Ok(result) if result.success => self.finish(result, CompletionSource::Direct),
            Ok(result) => {
                let message = result
                    .message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| "Import was rejected by the server".to_string());
                self.fail(SubmissionError::Rejected(message).into())
            }
            Err(e) => self.fail(e.into()),
        }
    }

    // -------------------------------------------------------------------------
    // Widget callbacks
    // -------------------------------------------------------------------------

    fn results(&mut self, payload: Value) -> Vec<Effect> {
        match self.state {
            ImportState::Idle | ImportState::Initializing | ImportState::Preview => {}
            other => {
                self.activity
                    .warning(format!("Ignoring widget results while {}", other));
                return Vec::new();
            }
        }

        let mut effects = self.clear_timeout();
        match normalize_detailed(&payload) {
            Ok(normalized) => {
                if self.is_initializing {
                    self.is_initializing = false;
                    self.awaiting_handle = true;
                }
                self.rows = Rc::new(normalized.rows);
                self.state = ImportState::Preview;
                self.message = format!("{} rows ready for review", self.rows.len());
                self.activity.success(self.message.clone());
                if normalized.skipped > 0 {
                    self.activity
                        .warning(format!("{} entries were not rows and were skipped", normalized.skipped));
                }
                effects.push(Effect::RowsReady(Rc::clone(&self.rows)));

                if let Some(result) = self.pending_completion.take() {
                    effects.extend(self.finish(result, CompletionSource::Webhook));
                }
            }
            Err(e) => effects.extend(self.fail(e.into())),
        }
        effects
    }

    fn widget_error(&mut self, message: String) -> Vec<Effect> {
        self.fail(ImportFailure::Widget(message))
    }

    fn completed(&mut self, event: Value) -> Vec<Effect> {
        if self.state.is_terminal() {
            self.activity
                .info(format!("Ignoring webhook completion: session already {}", self.state));
            return Vec::new();
        }
        if !self.settings.completion_mode.accepts_webhook() {
            self.activity.info("Ignoring webhook completion in direct mode");
            return Vec::new();
        }

        let response = match webhook_response(&event) {
            Some(Ok(response)) => response,
            Some(Err(e)) if self.state == ImportState::Sending => {
                self.activity
                    .warning(format!("Unreadable webhook response while the direct import is pending: {}", e));
                return Vec::new();
            }
            Some(Err(e)) => return self.fail(e.into()),
            None => {
                self.activity.info("Import widget completed without a webhook response");
                return Vec::new();
            }
        };

        if !response.success {
            let message = response
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| "Webhook import failed".to_string());
            if self.state == ImportState::Sending {
                // The direct request is still in flight and decides the outcome.
                self.activity
                    .warning(format!("Webhook reported a failure while the direct import is pending: {}", message));
                return Vec::new();
            }
            return self.fail(SubmissionError::Rejected(message).into());
        }

        match self.state {
            ImportState::Preview | ImportState::Sending => self.finish(response, CompletionSource::Webhook),
            _ => {
                self.activity
                    .info("Webhook completion arrived before rows; applying it once rows are ready");
                self.pending_completion = Some(response);
                Vec::new()
            }
        }
    }

    // -------------------------------------------------------------------------
    // Transitions
    // -------------------------------------------------------------------------

    fn finish(&mut self, mut result: ImportResult, source: CompletionSource) -> Vec<Effect> {
        let row_count = self.rows.len();
        let (errors, dropped): (Vec<_>, Vec<_>) = result
            .row_errors()
            .iter()
            .cloned()
            .partition(|e| e.row_index < row_count);
        if !dropped.is_empty() {
            self.activity.warning(format!(
                "Dropped {} row errors pointing outside the {} submitted rows",
                dropped.len(),
                row_count
            ));
        }

        if result.errors.is_some() {
            result.errors = Some(errors.clone());
        }
        self.errors = errors;
        self.message = result.summary();
        self.result = Some(result.clone());
        self.state = ImportState::Done;
        self.activity.success(format!("{} (via {})", self.message, source));
        if !self.errors.is_empty() {
            self.activity
                .warning(format!("{} rows were reported with errors", self.errors.len()));
        }

        vec![Effect::Finished(result)]
    }

    fn fail(&mut self, failure: ImportFailure) -> Vec<Effect> {
        if self.state.is_terminal() {
            self.activity.warning(format!(
                "Ignoring failure after session {}: {}",
                self.state, failure
            ));
            return Vec::new();
        }

        let mut effects = self.clear_timeout();
        self.is_initializing = false;
        self.awaiting_handle = false;
        self.state = ImportState::Error;
        self.message = failure.to_string();
        self.failure = Some(failure.clone());
        self.activity.error(self.message.clone());

        effects.push(Effect::Failed(failure));
        effects
    }

    fn clear_timeout(&mut self) -> Vec<Effect> {
        match self.pending_timeout.take() {
            Some(_) => vec![Effect::CancelTimeout],
            None => Vec::new(),
        }
    }

    fn clear_session(&mut self) -> Vec<Effect> {
        let effects = self.clear_timeout();
        self.dispose_handle();
        self.generation += 1;
        self.is_initializing = false;
        self.awaiting_handle = false;
        self.state = ImportState::Idle;
        self.rows = Rc::new(Vec::new());
        self.result = None;
        self.errors.clear();
        self.message.clear();
        self.failure = None;
        self.pending_completion = None;
        effects
    }

    fn dispose_handle(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.dispose();
        }
    }
}

impl Drop for ImportSession {
    fn drop(&mut self) {
        self.dispose_handle();
    }
}

/// Pull the echoed backend response out of an `onComplete` event.
///
/// Accepts the response as an object or as a JSON string.
pub fn webhook_response(event: &Value) -> Option<SubmitResult<ImportResult>> {
    let raw = ["webhookResponse", "webhook_response"]
        .iter()
        .find_map(|key| event.get(*key))
        .filter(|v| !v.is_null())?;

    let decoded = match raw {
        Value::String(text) => serde_json::from_str::<ImportResult>(text),
        other => serde_json::from_value::<ImportResult>(other.clone()),
    };
    Some(decoded.map_err(|e| SubmissionError::InvalidResponse(format!("webhook response: {}", e))))
}

#[cfg(test)]
mod tests;
