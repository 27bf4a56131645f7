//! The external validation widget, seen as a capability.
//!
//! The widget is a third-party uploader loaded lazily and constructed
//! asynchronously. The session only needs a narrow surface from it:
//!
//! - [`WidgetProvider::construct`] - build a handle from license, fields,
//!   settings and user, wiring the three callbacks
//! - [`WidgetHandle::open`] / [`WidgetHandle::dispose`]
//! - callbacks delivered through [`WidgetCallbacks`] as [`WidgetEvent`]s
//!
//! Every callback is stamped with the launch generation that created the
//! widget, so events from a disposed widget never reach a newer attempt.

pub mod scripted;

use std::collections::BTreeMap;

use futures::channel::mpsc::UnboundedSender;
use futures::future::LocalBoxFuture;
use serde::Serialize;
use serde_json::Value;

use crate::models::FieldDefinition;

/// Settings block passed to the widget constructor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetSettings {
    pub import_identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub development_mode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_headers: Option<BTreeMap<String, String>>,
}

/// Operator identity passed to the widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct WidgetUser {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl WidgetUser {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }
}

/// Everything needed to construct one widget instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetRequest {
    pub license_key: String,
    pub fields: Vec<FieldDefinition>,
    pub settings: WidgetSettings,
    pub user: WidgetUser,
}

/// A failure raised by the widget or its loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetFailure(pub String);

impl WidgetFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl std::fmt::Display for WidgetFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for WidgetFailure {}

/// A live widget instance.
pub trait WidgetHandle {
    /// Show the widget to the operator.
    fn open(&mut self) -> Result<(), WidgetFailure>;

    /// Tear the widget down. Called exactly once per handle.
    fn dispose(&mut self);
}

/// Result of constructing a widget.
pub type ConstructResult = Result<Box<dyn WidgetHandle>, WidgetFailure>;

/// Loads and constructs widget instances.
pub trait WidgetProvider {
    fn construct(&self, request: WidgetRequest, callbacks: WidgetCallbacks) -> LocalBoxFuture<'static, ConstructResult>;
}

/// What a widget callback reported.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetEventKind {
    /// `onResults` with the raw payload
    Results(Value),
    /// `onError` with the widget's message
    Error(String),
    /// `onComplete` with the raw event
    Complete(Value),
}

/// A callback invocation tagged with its launch generation.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetEvent {
    pub generation: u64,
    pub kind: WidgetEventKind,
}

/// Callback sink handed to the provider.
///
/// Sending never fails loudly: once the driver is gone the event is
/// dropped with a debug line.
#[derive(Debug, Clone)]
pub struct WidgetCallbacks {
    generation: u64,
    sender: UnboundedSender<WidgetEvent>,
}

impl WidgetCallbacks {
    pub fn new(generation: u64, sender: UnboundedSender<WidgetEvent>) -> Self {
        Self { generation, sender }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn on_results(&self, payload: Value) {
        self.send(WidgetEventKind::Results(payload));
    }

    pub fn on_error(&self, message: impl Into<String>) {
        self.send(WidgetEventKind::Error(message.into()));
    }

    pub fn on_complete(&self, event: Value) {
        self.send(WidgetEventKind::Complete(event));
    }

    fn send(&self, kind: WidgetEventKind) {
        let event = WidgetEvent {
            generation: self.generation,
            kind,
        };
        if self.sender.unbounded_send(event).is_err() {
            log::debug!("Widget callback after session shutdown (generation {})", self.generation);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::mpsc;
    use futures::StreamExt;
    use serde_json::json;

    #[test]
    fn test_request_wire_format() {
        let request = WidgetRequest {
            license_key: "lic".into(),
            fields: vec![FieldDefinition::new("Name", "name")],
            settings: WidgetSettings {
                import_identifier: "tpl".into(),
                development_mode: Some(true),
                mode: None,
                webhook_url: Some("https://x/hook".into()),
                webhook_headers: None,
            },
            user: WidgetUser::new("u1"),
        };
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["licenseKey"], "lic");
        assert_eq!(json["fields"][0], json!({ "label": "Name", "key": "name" }));
        assert_eq!(json["settings"]["importIdentifier"], "tpl");
        assert_eq!(json["settings"]["webhookUrl"], "https://x/hook");
        assert!(json["settings"].get("mode").is_none());
        assert_eq!(json["user"], json!({ "id": "u1" }));
    }

    #[test]
    fn test_callbacks_tag_generation() {
        let (tx, mut rx) = mpsc::unbounded();
        let callbacks = WidgetCallbacks::new(7, tx);
        callbacks.on_error("bad file");

        let event = futures::executor::block_on(rx.next()).unwrap();
        assert_eq!(event.generation, 7);
        assert_eq!(event.kind, WidgetEventKind::Error("bad file".into()));
    }

    #[test]
    fn test_callbacks_after_shutdown_are_dropped() {
        let (tx, rx) = mpsc::unbounded();
        drop(rx);
        WidgetCallbacks::new(1, tx).on_results(json!([]));
    }
}
