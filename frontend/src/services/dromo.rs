//! Dromo uploader bound as the session's widget provider.
//!
//! The JavaScript side lives in `src/js/dromo.js`; it lazy-loads the
//! uploader script and forwards its callbacks into the Rust closures
//! created here.

use futures::future::{FutureExt, LocalBoxFuture};
use serde::Serialize;
use serde_json::Value;
use vetimport::widget::{ConstructResult, WidgetCallbacks, WidgetFailure, WidgetHandle, WidgetProvider, WidgetRequest};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

type Callback = Closure<dyn FnMut(JsValue)>;

/// Builds Dromo uploader instances.
#[derive(Debug, Clone, Copy, Default)]
pub struct DromoProvider;

impl WidgetProvider for DromoProvider {
    fn construct(&self, request: WidgetRequest, callbacks: WidgetCallbacks) -> LocalBoxFuture<'static, ConstructResult> {
        build_uploader(request, callbacks).boxed_local()
    }
}

async fn build_uploader(request: WidgetRequest, callbacks: WidgetCallbacks) -> ConstructResult {
    let fields = to_js(&request.fields)?;
    let settings = to_js(&request.settings)?;
    let user = to_js(&request.user)?;

    let results_sink = callbacks.clone();
    let on_results: Callback = Closure::new(move |payload: JsValue| {
        forward_results(&results_sink, decode(payload));
    });

    let error_sink = callbacks.clone();
    let on_error: Callback = Closure::new(move |error: JsValue| error_sink.on_error(js_message(&error)));

    let on_complete: Callback = Closure::new(move |event: JsValue| {
        forward_complete(&callbacks, decode(event));
    });

    log::info!("🧩 Loading import widget ({} fields)", request.fields.len());
    let promise = create_uploader(&request.license_key, &fields, &settings, &user, &on_results, &on_error, &on_complete);
    let uploader = JsFuture::from(promise)
        .await
        .map_err(|e| WidgetFailure::new(js_message(&e)))?;

    let handle: Box<dyn WidgetHandle> = Box::new(DromoHandle {
        uploader,
        closures: Some([on_results, on_error, on_complete]),
    });
    Ok(handle)
}

/// A constructed uploader. Owns the closures its callbacks call into.
struct DromoHandle {
    uploader: JsValue,
    closures: Option<[Callback; 3]>,
}

impl WidgetHandle for DromoHandle {
    fn open(&mut self) -> Result<(), WidgetFailure> {
        open_uploader(&self.uploader).map_err(|e| WidgetFailure::new(js_message(&e)))
    }

    fn dispose(&mut self) {
        if self.closures.take().is_some() {
            dispose_uploader(&self.uploader);
            log::debug!("Import widget disposed");
        }
    }
}

fn decode(value: JsValue) -> Result<Value, String> {
    serde_wasm_bindgen::from_value::<Value>(value).map_err(|e| e.to_string())
}

/// Hand `onResults` data to the session as the widget sent it.
fn forward_results(callbacks: &WidgetCallbacks, payload: Result<Value, String>) {
    match payload {
        Ok(value) => callbacks.on_results(value),
        Err(e) => callbacks.on_error(format!("Unreadable import results: {}", e)),
    }
}

/// Hand an `onComplete` event to the session; unreadable events are errors.
fn forward_complete(callbacks: &WidgetCallbacks, event: Result<Value, String>) {
    match event {
        Ok(value) => callbacks.on_complete(value),
        Err(e) => {
            log::warn!("Unreadable import completion event: {}", e);
            callbacks.on_error(format!("Unreadable import completion event: {}", e));
        }
    }
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, WidgetFailure> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| WidgetFailure::new(format!("Invalid widget settings: {}", e)))
}

/// Best-effort message from a thrown JS value.
fn js_message(error: &JsValue) -> String {
    js_sys::Reflect::get(error, &JsValue::from_str("message"))
        .ok()
        .and_then(|v| v.as_string())
        .or_else(|| error.as_string())
        .unwrap_or_else(|| format!("{:?}", error))
}

// Bindings to src/js/dromo.js
#[wasm_bindgen(module = "/src/js/dromo.js")]
extern "C" {
    #[wasm_bindgen(js_name = "createUploader")]
    fn create_uploader(
        license_key: &str,
        fields: &JsValue,
        settings: &JsValue,
        user: &JsValue,
        on_results: &Callback,
        on_error: &Callback,
        on_complete: &Callback,
    ) -> js_sys::Promise;

    #[wasm_bindgen(js_name = "openUploader", catch)]
    fn open_uploader(uploader: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(js_name = "disposeUploader")]
    fn dispose_uploader(uploader: &JsValue);
}
