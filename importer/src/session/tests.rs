use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

use serde_json::{json, Value};

use super::*;
use crate::config::CompletionMode;
use crate::error::{ConfigurationError, NormalizationError};
use crate::webhook::WebhookTarget;
use crate::widget::WidgetFailure;

#[derive(Clone, Default)]
struct Counters {
    opened: Rc<Cell<u32>>,
    disposed: Rc<Cell<u32>>,
}

struct FakeHandle {
    counters: Counters,
    fail_open: bool,
}

impl WidgetHandle for FakeHandle {
    fn open(&mut self) -> Result<(), WidgetFailure> {
        if self.fail_open {
            return Err(WidgetFailure::new("popup blocked"));
        }
        self.counters.opened.set(self.counters.opened.get() + 1);
        Ok(())
    }

    fn dispose(&mut self) {
        self.counters.disposed.set(self.counters.disposed.get() + 1);
    }
}

fn handle(counters: &Counters) -> ConstructResult {
    Ok(Box::new(FakeHandle {
        counters: counters.clone(),
        fail_open: false,
    }))
}

fn settings(mode: CompletionMode) -> SessionSettings {
    SessionSettings::new(TableType::Clients)
        .with_license("lic")
        .with_template("tpl")
        .with_mode(mode)
        .with_webhook(WebhookTarget {
            url: "https://api.vetfield.app/api/webhooks/import/clients".into(),
            headers: BTreeMap::new(),
            publicly_reachable: true,
        })
        .with_init_timeout(Duration::from_secs(10))
}

/// Session with an open widget.
fn opened(mode: CompletionMode) -> (ImportSession, Counters) {
    let mut session = ImportSession::new(settings(mode));
    let counters = Counters::default();
    session.launch(WidgetUser::new("vet-1"));
    let generation = session.generation();
    session.widget_constructed(generation, handle(&counters));
    (session, counters)
}

fn event(session: &ImportSession, kind: WidgetEventKind) -> WidgetEvent {
    WidgetEvent {
        generation: session.generation(),
        kind,
    }
}

fn rows(n: usize) -> Value {
    let rows: Vec<Value> = (0..n)
        .map(|i| json!({ "firstName": format!("Client {}", i), "farmName": "La Esperanza" }))
        .collect();
    json!({ "validData": rows })
}

fn in_preview(mode: CompletionMode, n: usize) -> (ImportSession, Counters) {
    let (mut session, counters) = opened(mode);
    let results = event(&session, WidgetEventKind::Results(rows(n)));
    session.handle_event(results);
    assert_eq!(session.state(), ImportState::Preview);
    (session, counters)
}

fn webhook_ok(count: u64) -> WidgetEventKind {
    WidgetEventKind::Complete(json!({
        "webhookResponse": { "success": true, "insertedCount": count, "batchId": "wh-1" }
    }))
}

fn submitted_generation(effects: &[Effect]) -> u64 {
    effects
        .iter()
        .find_map(|e| match e {
            Effect::Submit { generation, .. } => Some(*generation),
            _ => None,
        })
        .expect("submit effect")
}

// -----------------------------------------------------------------------------
// Launch and initialization
// -----------------------------------------------------------------------------

#[test]
fn test_missing_template_fails_without_constructing() {
    let mut session = ImportSession::new(SessionSettings::new(TableType::Animals).with_license("lic"));
    let effects = session.launch(WidgetUser::new("vet-1"));

    assert_eq!(session.state(), ImportState::Error);
    assert!(!effects.iter().any(|e| matches!(e, Effect::Construct { .. })));
    assert_eq!(
        session.failure(),
        Some(&ImportFailure::Configuration(ConfigurationError::MissingTemplate("animals".into())))
    );
    assert!(!session.failure().unwrap().is_recoverable());
}

#[test]
fn test_missing_license_fails() {
    let mut session = ImportSession::new(SessionSettings::new(TableType::Clients).with_template("tpl"));
    session.launch(WidgetUser::new("vet-1"));

    assert_eq!(session.state(), ImportState::Error);
    assert!(session.message().contains("license"));
}

#[test]
fn test_launch_emits_timeout_then_construct() {
    let mut session = ImportSession::new(settings(CompletionMode::Hybrid));
    let effects = session.launch(WidgetUser::new("vet-1"));

    assert_eq!(session.state(), ImportState::Initializing);
    assert!(session.is_initializing());
    assert!(!session.can_launch());
    assert_eq!(effects.len(), 2);
    assert_eq!(
        effects[0],
        Effect::StartTimeout {
            generation: 1,
            after: Duration::from_secs(10)
        }
    );
    match &effects[1] {
        Effect::Construct { generation, request } => {
            assert_eq!(*generation, 1);
            assert_eq!(request.license_key, "lic");
            assert_eq!(request.settings.import_identifier, "tpl");
            assert_eq!(request.fields, crate::schema::fields_for(&TableType::Clients));
            assert!(request.settings.webhook_url.is_some());
            assert_eq!(request.user.id, "vet-1");
        }
        other => panic!("unexpected effect {:?}", other),
    }
}

#[test]
fn test_launch_is_rejected_while_initializing() {
    let mut session = ImportSession::new(settings(CompletionMode::Hybrid));
    session.launch(WidgetUser::new("vet-1"));

    assert!(session.launch(WidgetUser::new("vet-1")).is_empty());
    assert_eq!(session.generation(), 1);
}

#[test]
fn test_widget_opens_and_blocks_relaunch() {
    let (mut session, counters) = opened(CompletionMode::Hybrid);

    assert_eq!(session.state(), ImportState::Idle);
    assert!(!session.is_initializing());
    assert!(session.has_widget());
    assert_eq!(counters.opened.get(), 1);
    assert!(!session.can_launch());
    assert!(session.launch(WidgetUser::new("vet-1")).is_empty());
}

#[test]
fn test_construct_success_cancels_timeout() {
    let mut session = ImportSession::new(settings(CompletionMode::Hybrid));
    session.launch(WidgetUser::new("vet-1"));
    let effects = session.widget_constructed(1, handle(&Counters::default()));

    assert_eq!(effects, vec![Effect::CancelTimeout]);
    // A timer that still fires afterwards is a no-op.
    assert!(session.init_timed_out(1).is_empty());
    assert_eq!(session.state(), ImportState::Idle);
}

#[test]
fn test_construct_failure() {
    let mut session = ImportSession::new(settings(CompletionMode::Hybrid));
    session.launch(WidgetUser::new("vet-1"));
    let effects = session.widget_constructed(1, Err(WidgetFailure::new("script blocked")));

    assert_eq!(session.state(), ImportState::Error);
    assert!(!session.is_initializing());
    assert_eq!(effects[0], Effect::CancelTimeout);
    assert!(matches!(effects[1], Effect::Failed(ImportFailure::Widget(_))));
    assert!(session.message().contains("script blocked"));
}

#[test]
fn test_open_failure_disposes_handle() {
    let mut session = ImportSession::new(settings(CompletionMode::Hybrid));
    let counters = Counters::default();
    session.launch(WidgetUser::new("vet-1"));
    session.widget_constructed(
        1,
        Ok(Box::new(FakeHandle {
            counters: counters.clone(),
            fail_open: true,
        })),
    );

    assert_eq!(session.state(), ImportState::Error);
    assert_eq!(counters.disposed.get(), 1);
    assert!(!session.has_widget());
}

#[test]
fn test_init_timeout_fires_once() {
    let mut session = ImportSession::new(settings(CompletionMode::Hybrid));
    session.launch(WidgetUser::new("vet-1"));

    let effects = session.init_timed_out(1);
    assert_eq!(
        effects,
        vec![Effect::Failed(ImportFailure::InitializationTimeout(Duration::from_secs(10)))]
    );
    assert_eq!(session.state(), ImportState::Error);
    assert!(!session.is_initializing());
    assert!(session.message().contains("10s"));

    assert!(session.init_timed_out(1).is_empty());
    assert_eq!(session.activity().entries().filter(|e| e.level == crate::activity::LogLevel::Error).count(), 1);
}

#[test]
fn test_late_widget_after_timeout_is_disposed() {
    let mut session = ImportSession::new(settings(CompletionMode::Hybrid));
    let counters = Counters::default();
    session.launch(WidgetUser::new("vet-1"));
    session.init_timed_out(1);

    assert!(session.widget_constructed(1, handle(&counters)).is_empty());
    assert_eq!(counters.opened.get(), 0);
    assert_eq!(counters.disposed.get(), 1);
    assert_eq!(session.state(), ImportState::Error);
}

// -----------------------------------------------------------------------------
// Results and confirm
// -----------------------------------------------------------------------------

#[test]
fn test_results_enter_preview() {
    let (mut session, _) = opened(CompletionMode::Hybrid);
    let results = event(&session, WidgetEventKind::Results(rows(3)));
    let effects = session.handle_event(results);

    assert_eq!(session.state(), ImportState::Preview);
    assert_eq!(session.rows().len(), 3);
    assert_eq!(session.rows()[2].index, 2);
    assert!(session.can_confirm());
    match &effects[..] {
        [Effect::RowsReady(rows)] => assert_eq!(rows.len(), 3),
        other => panic!("unexpected effects {:?}", other),
    }
}

#[test]
fn test_empty_results_fail() {
    let (mut session, _) = opened(CompletionMode::Hybrid);
    let results = event(&session, WidgetEventKind::Results(json!({ "validData": [] })));
    session.handle_event(results);

    assert_eq!(session.state(), ImportState::Error);
    assert_eq!(
        session.failure(),
        Some(&ImportFailure::Normalization(NormalizationError::NoRows))
    );
    assert!(session.message().contains("No valid data"));
}

#[test]
fn test_direct_import_success() {
    let (mut session, _) = in_preview(CompletionMode::Hybrid, 2);
    let effects = session.confirm();

    assert_eq!(session.state(), ImportState::Sending);
    match &effects[..] {
        [Effect::Submit { request, .. }] => {
            assert_eq!(request.table_type, TableType::Clients);
            assert_eq!(request.rows.len(), 2);
        }
        other => panic!("unexpected effects {:?}", other),
    }

    let generation = submitted_generation(&effects);
    let result = ImportResult {
        success: true,
        inserted_count: Some(2),
        ..Default::default()
    };
    let effects = session.submission_finished(generation, Ok(result.clone()));

    assert_eq!(effects, vec![Effect::Finished(result)]);
    assert_eq!(session.state(), ImportState::Done);
    assert_eq!(session.message(), "Imported 2 rows");
    assert!(session.errors().is_empty());
}

#[test]
fn test_partial_success_keeps_row_errors() {
    let (mut session, _) = in_preview(CompletionMode::Hybrid, 3);
    let generation = submitted_generation(&session.confirm());
    let result: ImportResult = serde_json::from_value(json!({
        "success": true,
        "insertedCount": 2,
        "errors": [
            { "rowIndex": 1, "field": "email", "message": "invalid email", "value": "x@" },
            { "rowIndex": 9, "field": "email", "message": "ghost row", "value": null }
        ]
    }))
    .unwrap();
    session.submission_finished(generation, Ok(result));

    assert_eq!(session.state(), ImportState::Done);
    assert_eq!(session.errors().len(), 1);
    assert_eq!(session.errors()[0].row_index, 1);
    assert_eq!(session.result().unwrap().inserted_count, Some(2));
}

#[test]
fn test_rejected_submission_is_recoverable_error() {
    let (mut session, _) = in_preview(CompletionMode::Hybrid, 1);
    let generation = submitted_generation(&session.confirm());
    session.submission_finished(
        generation,
        Ok(ImportResult {
            success: false,
            message: Some("duplicate batch".into()),
            ..Default::default()
        }),
    );

    assert_eq!(session.state(), ImportState::Error);
    assert_eq!(session.message(), "Import rejected: duplicate batch");
    assert!(session.failure().unwrap().is_recoverable());
}

#[test]
fn test_transport_failure() {
    let (mut session, _) = in_preview(CompletionMode::Hybrid, 1);
    let generation = submitted_generation(&session.confirm());
    session.submission_finished(generation, Err(SubmissionError::Transport("connection refused".into())));

    assert_eq!(session.state(), ImportState::Error);
    assert!(session.message().contains("connection refused"));
}

#[test]
fn test_confirm_outside_preview_is_rejected() {
    let (mut session, _) = opened(CompletionMode::Hybrid);
    assert!(session.confirm().is_empty());
    assert_eq!(session.state(), ImportState::Idle);
}

#[test]
fn test_webhook_mode_rejects_confirm() {
    let (mut session, _) = in_preview(CompletionMode::Webhook, 2);
    assert!(!session.can_confirm());
    assert!(session.confirm().is_empty());
    assert_eq!(session.state(), ImportState::Preview);
}

// -----------------------------------------------------------------------------
// Webhook completion
// -----------------------------------------------------------------------------

#[test]
fn test_webhook_completion_from_preview() {
    let (mut session, _) = in_preview(CompletionMode::Hybrid, 4);
    let complete = event(&session, webhook_ok(4));
    let effects = session.handle_event(complete);

    assert_eq!(session.state(), ImportState::Done);
    assert!(matches!(&effects[..], [Effect::Finished(r)] if r.batch_id.as_deref() == Some("wh-1")));
}

#[test]
fn test_webhook_response_as_json_string() {
    let (mut session, _) = in_preview(CompletionMode::Webhook, 1);
    let complete = event(
        &session,
        WidgetEventKind::Complete(json!({ "webhookResponse": "{\"success\":true,\"insertedCount\":1}" })),
    );
    session.handle_event(complete);

    assert_eq!(session.state(), ImportState::Done);
    assert_eq!(session.result().unwrap().inserted_count, Some(1));
}

#[test]
fn test_webhook_failure_response() {
    let (mut session, _) = in_preview(CompletionMode::Hybrid, 1);
    let complete = event(
        &session,
        WidgetEventKind::Complete(json!({ "webhookResponse": { "success": false, "message": "bad token" } })),
    );
    session.handle_event(complete);

    assert_eq!(session.state(), ImportState::Error);
    assert!(session.message().contains("bad token"));
}

#[test]
fn test_completion_without_response_is_informational() {
    let (mut session, _) = in_preview(CompletionMode::Hybrid, 1);
    let complete = event(&session, WidgetEventKind::Complete(json!({ "status": "closed" })));

    assert!(session.handle_event(complete).is_empty());
    assert_eq!(session.state(), ImportState::Preview);
}

#[test]
fn test_direct_mode_ignores_webhook() {
    let (mut session, _) = in_preview(CompletionMode::Direct, 1);
    let complete = event(&session, webhook_ok(1));

    assert!(session.handle_event(complete).is_empty());
    assert_eq!(session.state(), ImportState::Preview);
}

#[test]
fn test_early_webhook_is_applied_after_results() {
    let (mut session, _) = opened(CompletionMode::Hybrid);
    let complete = event(&session, webhook_ok(2));
    assert!(session.handle_event(complete).is_empty());
    assert_eq!(session.state(), ImportState::Idle);

    let results = event(&session, WidgetEventKind::Results(rows(2)));
    let effects = session.handle_event(results);

    assert!(matches!(effects[0], Effect::RowsReady(_)));
    assert!(matches!(effects[1], Effect::Finished(_)));
    assert_eq!(session.state(), ImportState::Done);
    assert_eq!(session.rows().len(), 2);
}

#[test]
fn test_webhook_first_then_direct_is_noop() {
    let (mut session, _) = in_preview(CompletionMode::Hybrid, 2);
    let generation = submitted_generation(&session.confirm());

    let complete = event(&session, webhook_ok(2));
    session.handle_event(complete);
    assert_eq!(session.state(), ImportState::Done);
    let batch = session.result().unwrap().batch_id.clone();

    let effects = session.submission_finished(
        generation,
        Ok(ImportResult {
            success: true,
            inserted_count: Some(2),
            batch_id: Some("direct-1".into()),
            ..Default::default()
        }),
    );
    assert!(effects.is_empty());
    assert_eq!(session.result().unwrap().batch_id, batch);
}

#[test]
fn test_direct_first_then_webhook_is_noop() {
    let (mut session, _) = in_preview(CompletionMode::Hybrid, 2);
    let generation = submitted_generation(&session.confirm());
    session.submission_finished(
        generation,
        Ok(ImportResult {
            success: true,
            inserted_count: Some(2),
            batch_id: Some("direct-1".into()),
            ..Default::default()
        }),
    );

    let complete = event(&session, webhook_ok(2));
    assert!(session.handle_event(complete).is_empty());
    assert_eq!(session.result().unwrap().batch_id.as_deref(), Some("direct-1"));
    assert_eq!(session.state(), ImportState::Done);
}

#[test]
fn test_failed_webhook_while_sending_defers_to_direct_import() {
    let (mut session, _) = in_preview(CompletionMode::Hybrid, 2);
    let generation = submitted_generation(&session.confirm());

    let complete = event(
        &session,
        WidgetEventKind::Complete(json!({ "webhookResponse": { "success": false, "message": "duplicate" } })),
    );
    assert!(session.handle_event(complete).is_empty());
    assert_eq!(session.state(), ImportState::Sending);

    let effects = session.submission_finished(
        generation,
        Ok(ImportResult {
            success: true,
            inserted_count: Some(2),
            ..Default::default()
        }),
    );
    assert!(matches!(effects[..], [Effect::Finished(_)]));
    assert_eq!(session.state(), ImportState::Done);
    assert_eq!(session.result().unwrap().inserted_count, Some(2));
    assert!(session.failure().is_none());
}

#[test]
fn test_unreadable_webhook_while_sending_defers_to_direct_import() {
    let (mut session, _) = in_preview(CompletionMode::Hybrid, 1);
    session.confirm();

    let complete = event(&session, WidgetEventKind::Complete(json!({ "webhookResponse": "<html>" })));
    assert!(session.handle_event(complete).is_empty());
    assert_eq!(session.state(), ImportState::Sending);
}

#[test]
fn test_results_before_handle_clear_initializing_and_adopt_handle() {
    let mut session = ImportSession::new(settings(CompletionMode::Hybrid));
    let counters = Counters::default();
    session.launch(WidgetUser::new("vet-1"));
    let generation = session.generation();

    let results = event(&session, WidgetEventKind::Results(rows(2)));
    let effects = session.handle_event(results);
    assert!(effects.contains(&Effect::CancelTimeout));
    assert_eq!(session.state(), ImportState::Preview);
    assert!(!session.is_initializing());
    assert!(!session.snapshot().is_initializing);

    assert!(session.widget_constructed(generation, handle(&counters)).is_empty());
    assert!(session.has_widget());
    assert_eq!(counters.opened.get(), 0);
    assert_eq!(counters.disposed.get(), 0);
    assert_eq!(session.state(), ImportState::Preview);
}

#[test]
fn test_late_construct_failure_keeps_preview() {
    let mut session = ImportSession::new(settings(CompletionMode::Hybrid));
    session.launch(WidgetUser::new("vet-1"));
    let generation = session.generation();
    let results = event(&session, WidgetEventKind::Results(rows(1)));
    session.handle_event(results);

    let effects = session.widget_constructed(generation, Err(WidgetFailure::new("script blocked")));
    assert!(effects.is_empty());
    assert_eq!(session.state(), ImportState::Preview);
    assert!(session.can_confirm());
}

#[test]
fn test_finished_result_matches_session_errors() {
    let (mut session, _) = in_preview(CompletionMode::Hybrid, 2);
    let generation = submitted_generation(&session.confirm());
    let result: ImportResult = serde_json::from_value(json!({
        "success": true,
        "insertedCount": 1,
        "errors": [
            { "rowIndex": 0, "field": "email", "message": "invalid email", "value": "x@" },
            { "rowIndex": 5, "field": "email", "message": "ghost row", "value": null }
        ]
    }))
    .unwrap();
    let effects = session.submission_finished(generation, Ok(result));

    match &effects[..] {
        [Effect::Finished(finished)] => assert_eq!(finished.row_errors(), session.errors()),
        other => panic!("unexpected effects {:?}", other),
    }
    assert_eq!(session.result().unwrap().row_errors(), session.errors());
    assert_eq!(session.errors().len(), 1);
}

#[test]
fn test_widget_error_surfaces_message() {
    let (mut session, _) = opened(CompletionMode::Hybrid);
    let error = event(&session, WidgetEventKind::Error("File too large".into()));
    session.handle_event(error);

    assert_eq!(session.state(), ImportState::Error);
    assert_eq!(session.message(), "File too large");
}

// -----------------------------------------------------------------------------
// Reset and teardown
// -----------------------------------------------------------------------------

fn assert_clean(session: &ImportSession) {
    assert_eq!(session.state(), ImportState::Idle);
    assert!(!session.is_initializing());
    assert!(!session.has_widget());
    assert!(session.rows().is_empty());
    assert!(session.result().is_none());
    assert!(session.errors().is_empty());
    assert!(session.failure().is_none());
    assert_eq!(session.message(), "");
    assert!(session.can_launch());
}

#[test]
fn test_reset_from_every_state() {
    // initializing
    let mut session = ImportSession::new(settings(CompletionMode::Hybrid));
    session.launch(WidgetUser::new("vet-1"));
    assert_eq!(session.reset(), vec![Effect::CancelTimeout]);
    assert_clean(&session);

    // preview
    let (mut session, counters) = in_preview(CompletionMode::Hybrid, 3);
    session.reset();
    assert_clean(&session);
    assert_eq!(counters.disposed.get(), 1);

    // sending
    let (mut session, _) = in_preview(CompletionMode::Hybrid, 3);
    session.confirm();
    session.reset();
    assert_clean(&session);

    // done
    let (mut session, _) = in_preview(CompletionMode::Hybrid, 3);
    let complete = event(&session, webhook_ok(3));
    session.handle_event(complete);
    session.reset();
    assert_clean(&session);

    // error
    let mut session = ImportSession::new(SessionSettings::new(TableType::Clients));
    session.launch(WidgetUser::new("vet-1"));
    session.reset();
    assert_clean(&session);
}

#[test]
fn test_events_after_reset_are_ignored() {
    let (mut session, _) = opened(CompletionMode::Hybrid);
    let stale = event(&session, WidgetEventKind::Results(rows(2)));
    session.reset();

    assert!(session.handle_event(stale).is_empty());
    assert_clean(&session);
}

#[test]
fn test_submission_after_reset_is_ignored() {
    let (mut session, _) = in_preview(CompletionMode::Hybrid, 1);
    let generation = submitted_generation(&session.confirm());
    session.reset();

    let effects = session.submission_finished(
        generation,
        Ok(ImportResult {
            success: true,
            ..Default::default()
        }),
    );
    assert!(effects.is_empty());
    assert_clean(&session);
}

#[test]
fn test_relaunch_after_reset() {
    let (mut session, first) = in_preview(CompletionMode::Hybrid, 1);
    session.reset();

    let second = Counters::default();
    session.launch(WidgetUser::new("vet-1"));
    session.widget_constructed(session.generation(), handle(&second));

    assert_eq!(first.disposed.get(), 1);
    assert_eq!(second.opened.get(), 1);
    assert!(session.has_widget());
}

#[test]
fn test_unmount_disposes_and_refuses_work() {
    let (mut session, counters) = opened(CompletionMode::Hybrid);
    let stale = event(&session, WidgetEventKind::Results(rows(1)));
    session.unmount();

    assert_eq!(counters.disposed.get(), 1);
    assert!(session.is_disposed());
    assert!(!session.can_launch());
    assert!(session.launch(WidgetUser::new("vet-1")).is_empty());
    assert!(session.handle_event(stale).is_empty());
}

#[test]
fn test_unmount_during_initialization_discards_late_widget() {
    let mut session = ImportSession::new(settings(CompletionMode::Hybrid));
    let counters = Counters::default();
    session.launch(WidgetUser::new("vet-1"));
    assert_eq!(session.unmount(), vec![Effect::CancelTimeout]);

    assert!(session.widget_constructed(1, handle(&counters)).is_empty());
    assert_eq!(counters.opened.get(), 0);
    assert_eq!(counters.disposed.get(), 1);
}

#[test]
fn test_drop_disposes_widget() {
    let (session, counters) = opened(CompletionMode::Hybrid);
    drop(session);
    assert_eq!(counters.disposed.get(), 1);
}

#[test]
fn test_snapshot() {
    let (session, _) = in_preview(CompletionMode::Hybrid, 2);
    let snapshot = session.snapshot();

    assert_eq!(snapshot.state, ImportState::Preview);
    assert_eq!(snapshot.preview_rows.len(), 2);
    assert!(snapshot.can_confirm);
    assert!(!snapshot.can_launch);
    assert!(snapshot.has_widget);
    assert_eq!(snapshot.table_type, TableType::Clients);
    assert!(!snapshot.activity.is_empty());
}

#[test]
fn test_webhook_response_extraction() {
    assert!(webhook_response(&json!({})).is_none());
    assert!(webhook_response(&json!({ "webhookResponse": null })).is_none());
    assert!(matches!(
        webhook_response(&json!({ "webhook_response": "not json" })),
        Some(Err(SubmissionError::InvalidResponse(_)))
    ));
}
