//! `gloo-net` transport for the direct import endpoint.

use futures::future::{FutureExt, LocalBoxFuture};
use gloo_net::http::Request;
use vetimport::error::SubmitResult;
use vetimport::submit::{decode_response, import_url};
use vetimport::{DirectImportRequest, ImportResult, ImportSubmitter, SubmissionError};

/// Browser client for `POST /api/import`.
#[derive(Debug, Clone)]
pub struct GlooImportClient {
    url: String,
    credential: Option<String>,
}

impl GlooImportClient {
    pub fn new(api_base_url: &str) -> Self {
        Self {
            url: import_url(api_base_url),
            credential: None,
        }
    }

    /// Send the operator's session token as a bearer token.
    pub fn with_credential(mut self, credential: Option<String>) -> Self {
        self.credential = credential.filter(|c| !c.trim().is_empty());
        self
    }

    pub async fn send(&self, request: &DirectImportRequest) -> SubmitResult<ImportResult> {
        log::info!("📤 Submitting {} {} rows", request.rows.len(), request.table_type);

        let mut builder = Request::post(&self.url);
        if let Some(ref token) = self.credential {
            builder = builder.header("Authorization", &format!("Bearer {}", token));
        }

        let response = builder
            .json(request)
            .map_err(|e| SubmissionError::Transport(format!("Failed to build request: {}", e)))?
            .send()
            .await
            .map_err(|e| SubmissionError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SubmissionError::Transport(e.to_string()))?;

        decode_response(status, &body)
    }
}

impl ImportSubmitter for GlooImportClient {
    fn submit(&self, request: DirectImportRequest) -> LocalBoxFuture<'static, SubmitResult<ImportResult>> {
        let client = self.clone();
        async move { client.send(&request).await }.boxed_local()
    }
}
