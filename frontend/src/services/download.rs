//! Save generated files from the browser.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

use vetimport::ErrorReport;

pub const CSV_MIME: &str = "text/csv;charset=utf-8";

/// Trigger a download of `contents` as `filename`.
pub fn save_file(filename: &str, contents: &str, mime: &str) -> Result<(), String> {
    let window = web_sys::window().ok_or("No window available")?;
    let document = window.document().ok_or("No document available")?;

    let parts = js_sys::Array::of1(&JsValue::from_str(contents));
    let options = BlobPropertyBag::new();
    options.set_type(mime);
    let blob = Blob::new_with_str_sequence_and_options(&parts, &options)
        .map_err(|e| format!("Failed to create file: {:?}", e))?;
    let url = Url::create_object_url_with_blob(&blob).map_err(|e| format!("Failed to create URL: {:?}", e))?;

    let anchor = document
        .create_element("a")
        .map_err(|e| format!("Failed to create link: {:?}", e))?
        .dyn_into::<HtmlAnchorElement>()
        .map_err(|_| "Created element is not a link".to_string())?;
    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor.click();

    let _ = Url::revoke_object_url(&url);
    Ok(())
}

/// Download an error report as CSV.
pub fn download_report(report: &ErrorReport) -> Result<(), String> {
    log::info!("💾 Downloading {} ({} row errors)", report.filename, report.error_count);
    save_file(&report.filename, &report.contents, CSV_MIME)
}
