//! Ledger clear endpoint. The next download pass re-fetches everything.

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use url::Url;

use sync::SyncError;

use crate::http_server::client::ApiRequest;
use crate::state::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerClearRequest {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerClearResponse {
    pub removed: usize,
}

pub async fn handler(
    State(state): State<ServiceState>,
) -> Result<impl IntoResponse, LedgerClearError> {
    let removed = state.ledger().clear(state.container_name()).await?;
    Ok((StatusCode::OK, Json(LedgerClearResponse { removed })).into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum LedgerClearError {
    #[error("clearing ledger: {0}")]
    Ledger(#[from] SyncError),
}

impl IntoResponse for LedgerClearError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

impl ApiRequest for LedgerClearRequest {
    type Response = LedgerClearResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/ledger/clear").expect("static route");
        client.get(full_url)
    }
}
