//! Upload pass endpoint: pushes local changes to the remote container.

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use url::Url;

use sync::SyncError;

use crate::http_server::client::ApiRequest;
use crate::ops;
use crate::state::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadSyncRequest {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadSyncResponse {
    pub uploaded: usize,
}

pub async fn handler(
    State(state): State<ServiceState>,
) -> Result<impl IntoResponse, UploadSyncError> {
    let uploaded = ops::run_upload_pass(&state).await?;
    Ok((StatusCode::OK, Json(UploadSyncResponse { uploaded })).into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum UploadSyncError {
    #[error("upload pass failed: {0}")]
    Pass(#[from] SyncError),
}

impl IntoResponse for UploadSyncError {
    fn into_response(self) -> Response {
        let UploadSyncError::Pass(err) = &self;
        let status = match err {
            SyncError::RemoteUnavailable(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}

impl ApiRequest for UploadSyncRequest {
    type Response = UploadSyncResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/folder/files/sync").expect("static route");
        client.get(full_url)
    }
}
