//! Headless widget that replays a fixed script of callbacks.
//!
//! Used by the CLI to run a session from a saved widget payload, and by
//! tests to drive sessions without a browser.

use std::cell::RefCell;
use std::rc::Rc;

use futures::future::{self, FutureExt, LocalBoxFuture};

use super::{ConstructResult, WidgetCallbacks, WidgetEventKind, WidgetFailure, WidgetHandle, WidgetProvider, WidgetRequest};

#[derive(Debug, Clone)]
enum Behavior {
    Open,
    FailConstruct(String),
    Hang,
}

/// What happened to the widgets a provider built.
#[derive(Debug, Default)]
pub struct ScriptLedger {
    pub requests: Vec<WidgetRequest>,
    pub opened: usize,
    pub disposed: usize,
}

/// Provider whose widgets replay `script` when opened.
#[derive(Debug, Clone)]
pub struct ScriptedWidgetProvider {
    behavior: Behavior,
    script: Vec<WidgetEventKind>,
    ledger: Rc<RefCell<ScriptLedger>>,
}

impl ScriptedWidgetProvider {
    pub fn new(script: Vec<WidgetEventKind>) -> Self {
        Self {
            behavior: Behavior::Open,
            script,
            ledger: Rc::default(),
        }
    }

    /// Construction fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            behavior: Behavior::FailConstruct(message.into()),
            ..Self::new(Vec::new())
        }
    }

    /// Construction never resolves.
    pub fn hanging() -> Self {
        Self {
            behavior: Behavior::Hang,
            ..Self::new(Vec::new())
        }
    }

    pub fn ledger(&self) -> Rc<RefCell<ScriptLedger>> {
        Rc::clone(&self.ledger)
    }
}

impl WidgetProvider for ScriptedWidgetProvider {
    fn construct(&self, request: WidgetRequest, callbacks: WidgetCallbacks) -> LocalBoxFuture<'static, ConstructResult> {
        self.ledger.borrow_mut().requests.push(request);

        match &self.behavior {
            Behavior::Open => {
                let handle: Box<dyn WidgetHandle> = Box::new(ScriptedHandle {
                    callbacks,
                    script: self.script.clone(),
                    ledger: Rc::clone(&self.ledger),
                });
                future::ready(Ok(handle)).boxed_local()
            }
            Behavior::FailConstruct(message) => future::ready(Err(WidgetFailure::new(message.clone()))).boxed_local(),
            Behavior::Hang => future::pending().boxed_local(),
        }
    }
}

struct ScriptedHandle {
    callbacks: WidgetCallbacks,
    script: Vec<WidgetEventKind>,
    ledger: Rc<RefCell<ScriptLedger>>,
}

impl WidgetHandle for ScriptedHandle {
    fn open(&mut self) -> Result<(), WidgetFailure> {
        self.ledger.borrow_mut().opened += 1;
        log::debug!(
            "Replaying {} scripted widget callbacks (generation {})",
            self.script.len(),
            self.callbacks.generation()
        );
        for step in self.script.drain(..) {
            match step {
                WidgetEventKind::Results(payload) => self.callbacks.on_results(payload),
                WidgetEventKind::Error(message) => self.callbacks.on_error(message),
                WidgetEventKind::Complete(event) => self.callbacks.on_complete(event),
            }
        }
        Ok(())
    }

    fn dispose(&mut self) {
        self.ledger.borrow_mut().disposed += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::{WidgetSettings, WidgetUser};
    use futures::channel::mpsc;
    use futures::executor::block_on;
    use futures::StreamExt;
    use serde_json::json;

    fn request() -> WidgetRequest {
        WidgetRequest {
            license_key: "lic".into(),
            fields: Vec::new(),
            settings: WidgetSettings {
                import_identifier: "tpl".into(),
                development_mode: None,
                mode: None,
                webhook_url: None,
                webhook_headers: None,
            },
            user: WidgetUser::new("u"),
        }
    }

    #[test]
    fn test_replays_on_open() {
        let provider = ScriptedWidgetProvider::new(vec![
            WidgetEventKind::Results(json!([{ "a": 1 }])),
            WidgetEventKind::Complete(json!({})),
        ]);
        let (tx, mut rx) = mpsc::unbounded();

        let mut handle = block_on(provider.construct(request(), WidgetCallbacks::new(3, tx))).unwrap();
        handle.open().unwrap();
        handle.dispose();

        let first = block_on(rx.next()).unwrap();
        assert_eq!(first.generation, 3);
        assert!(matches!(first.kind, WidgetEventKind::Results(_)));
        assert!(matches!(block_on(rx.next()).unwrap().kind, WidgetEventKind::Complete(_)));

        let ledger = provider.ledger();
        let ledger = ledger.borrow();
        assert_eq!((ledger.requests.len(), ledger.opened, ledger.disposed), (1, 1, 1));
    }

    #[test]
    fn test_failing_construct() {
        let provider = ScriptedWidgetProvider::failing("license rejected");
        let (tx, _rx) = mpsc::unbounded();
        let err = block_on(provider.construct(request(), WidgetCallbacks::new(1, tx))).err().unwrap();
        assert_eq!(err, WidgetFailure::new("license rejected"));
    }
}
