//! Download pass endpoint: pulls remote changes into the sync folder.
//!
//! The only endpoint with a watcher side effect; the pass pauses the
//! watcher while it writes and resumes it afterwards.

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
pub struct DownloadSyncRequest {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadSyncResponse {
    pub downloaded: usize,
}

pub async fn handler(
    State(state): State<ServiceState>,
) -> Result<impl IntoResponse, DownloadSyncError> {
    let downloaded = ops::run_download_pass(&state).await?;
    Ok((StatusCode::OK, Json(DownloadSyncResponse { downloaded })).into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum DownloadSyncError {
    #[error("download pass failed: {0}")]
    Pass(#[from] SyncError),
}

impl IntoResponse for DownloadSyncError {
    fn into_response(self) -> Response {
        let DownloadSyncError::Pass(err) = &self;
        let status = match err {
            SyncError::RemoteUnavailable(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}

impl ApiRequest for DownloadSyncRequest {
    type Response = DownloadSyncResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/remote/files/sync").expect("static route");
        client.get(full_url)
    }
}
