//! Direct import submission.
//!
//! When the operator confirms a preview, rows are POSTed to
//! `<api-base>/api/import`. The transport is behind [`ImportSubmitter`] so
//! the native build uses `reqwest` and the browser build `gloo-net`.

#[cfg(feature = "native")]
pub mod http;

use futures::future::LocalBoxFuture;
use serde::Serialize;

use crate::error::{SubmissionError, SubmitResult};
use crate::models::{ImportResult, RowRecord, TableType};

/// Path of the direct import endpoint.
pub const IMPORT_PATH: &str = "/api/import";

/// Body of `POST /api/import`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectImportRequest {
    pub table_type: TableType,
    pub rows: Vec<RowRecord>,
    pub dromo_backend_key: Option<String>,
}

/// Sends a confirmed row set to the backend.
pub trait ImportSubmitter {
    fn submit(&self, request: DirectImportRequest) -> LocalBoxFuture<'static, SubmitResult<ImportResult>>;
}

/// Full endpoint URL for an API base.
pub fn import_url(api_base_url: &str) -> String {
    format!("{}{}", api_base_url.trim_end_matches('/'), IMPORT_PATH)
}

/// Interpret a raw response. Shared by every transport.
pub fn decode_response(status: u16, body: &str) -> SubmitResult<ImportResult> {
    if !(200..300).contains(&status) {
        let body = if body.trim().is_empty() { "(empty body)".to_string() } else { body.to_string() };
        return Err(SubmissionError::Status { status, body });
    }
    serde_json::from_str::<ImportResult>(body).map_err(|e| SubmissionError::InvalidResponse(e.to_string()))
}
