//! Remote object listing endpoint.

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use url::Url;

use sync::{RemoteObject, SyncError};

use crate::http_server::client::ApiRequest;
use crate::state::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteFilesRequest {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteFilesResponse {
    pub objects: Vec<RemoteObject>,
}

pub async fn handler(
    State(state): State<ServiceState>,
) -> Result<impl IntoResponse, RemoteFilesError> {
    let objects = state.store().list().await?;
    Ok((StatusCode::OK, Json(RemoteFilesResponse { objects })).into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum RemoteFilesError {
    #[error("listing remote container: {0}")]
    Store(#[from] SyncError),
}

impl IntoResponse for RemoteFilesError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_GATEWAY, self.to_string()).into_response()
    }
}

impl ApiRequest for RemoteFilesRequest {
    type Response = RemoteFilesResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/remote/files").expect("static route");
        client.get(full_url)
    }
}
