//! Ledger dump endpoint.

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use url::Url;

use sync::{SyncError, SyncRecord};

use crate::http_server::client::ApiRequest;
use crate::state::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerDumpRequest {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerDumpResponse {
    pub records: Vec<SyncRecord>,
}

pub async fn handler(
    State(state): State<ServiceState>,
) -> Result<impl IntoResponse, LedgerDumpError> {
    let records = state.ledger().query(state.container_name()).await?;
    Ok((StatusCode::OK, Json(LedgerDumpResponse { records })).into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum LedgerDumpError {
    #[error("querying ledger: {0}")]
    Ledger(#[from] SyncError),
}

impl IntoResponse for LedgerDumpError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

impl ApiRequest for LedgerDumpRequest {
    type Response = LedgerDumpResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/ledger").expect("static route");
        client.get(full_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support;
    use sync::SyncLedger;

    #[tokio::test]
    async fn dumps_records_for_the_container() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_support::memory_state(dir.path().join("box"));

        state
            .ledger()
            .upsert_batch(&[
                SyncRecord::new("box", "a.txt"),
                SyncRecord::new("other", "b.txt"),
            ])
            .await
            .unwrap();

        let response = handler(State(state)).await.unwrap().into_response();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: LedgerDumpResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].object_key, "a.txt");
    }
}
