//! `reqwest` transport for the direct import endpoint.

use futures::future::{FutureExt, LocalBoxFuture};

use super::{decode_response, import_url, DirectImportRequest, ImportSubmitter};
use crate::error::{SubmissionError, SubmitResult};
use crate::models::ImportResult;

/// HTTP client for `POST /api/import`.
#[derive(Clone)]
pub struct HttpImportClient {
    client: reqwest::Client,
    url: String,
    credential: Option<String>,
}

impl HttpImportClient {
    pub fn new(api_base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: import_url(api_base_url),
            credential: None,
        }
    }

    /// Send the caller's session token as a bearer token.
    pub fn with_credential(mut self, credential: Option<String>) -> Self {
        self.credential = credential.filter(|c| !c.trim().is_empty());
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Single POST, decoded into an [`ImportResult`].
    pub async fn send(&self, request: &DirectImportRequest) -> SubmitResult<ImportResult> {
        log::info!("Submitting {} {} rows to {}", request.rows.len(), request.table_type, self.url);

        let mut builder = self.client.post(&self.url).json(request);
        if let Some(ref token) = self.credential {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| SubmissionError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| SubmissionError::Transport(e.to_string()))?;

        decode_response(status, &body)
    }
}

impl ImportSubmitter for HttpImportClient {
    fn submit(&self, request: DirectImportRequest) -> LocalBoxFuture<'static, SubmitResult<ImportResult>> {
        let client = self.clone();
        async move { client.send(&request).await }.boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RowRecord, TableType};
    use axum::{http::HeaderMap, http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Map, Value};

    async fn spawn_server(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn request(rows: usize) -> DirectImportRequest {
        DirectImportRequest {
            table_type: TableType::Clients,
            rows: (0..rows)
                .map(|i| {
                    let mut values = Map::new();
                    values.insert("firstName".into(), json!(format!("client {}", i)));
                    RowRecord::new(i, values)
                })
                .collect(),
            dromo_backend_key: Some("backend-key".into()),
        }
    }

    #[tokio::test]
    async fn test_submit_success() {
        let app = Router::new().route(
            "/api/import",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(headers["authorization"], "Bearer tok");
                assert_eq!(body["tableType"], "clients");
                assert_eq!(body["dromoBackendKey"], "backend-key");
                let count = body["rows"].as_array().map(|r| r.len()).unwrap_or(0);
                Json(json!({ "success": true, "insertedCount": count, "batchId": "b-9" }))
            }),
        );
        let base = spawn_server(app).await;

        let client = HttpImportClient::new(&base).with_credential(Some("tok".into()));
        let result = client.submit(request(3)).await.unwrap();

        assert!(result.success);
        assert_eq!(result.inserted_count, Some(3));
        assert_eq!(result.batch_id.as_deref(), Some("b-9"));
    }

    #[tokio::test]
    async fn test_submit_http_failure() {
        let app = Router::new().route(
            "/api/import",
            post(|| async { (StatusCode::UNPROCESSABLE_ENTITY, "rows rejected") }),
        );
        let base = spawn_server(app).await;

        let err = HttpImportClient::new(&base).submit(request(1)).await.unwrap_err();
        assert_eq!(
            err,
            SubmissionError::Status {
                status: 422,
                body: "rows rejected".into()
            }
        );
    }

    #[tokio::test]
    async fn test_submit_unreachable() {
        let err = HttpImportClient::new("http://127.0.0.1:1").submit(request(1)).await.unwrap_err();
        assert!(matches!(err, SubmissionError::Transport(_)));
    }
}
