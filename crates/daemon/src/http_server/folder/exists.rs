//! Sync folder existence probe.

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::http_server::client::ApiRequest;
use crate::state::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderExistsRequest {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderExistsResponse {
    pub exists: bool,
}

pub async fn handler(State(state): State<ServiceState>) -> Response {
    (
        StatusCode::OK,
        Json(FolderExistsResponse {
            exists: state.sync_folder().is_dir(),
        }),
    )
        .into_response()
}

impl ApiRequest for FolderExistsRequest {
    type Response = FolderExistsResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/folder/exists").expect("static route");
        client.get(full_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support;

    #[tokio::test]
    async fn reflects_folder_presence() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("box");

        let state = test_support::memory_state(root.clone());
        let response = handler(State(state.clone())).await;
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: FolderExistsResponse = serde_json::from_slice(&body).unwrap();
        assert!(!parsed.exists);

        std::fs::create_dir_all(&root).unwrap();
        let response = handler(State(state)).await;
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: FolderExistsResponse = serde_json::from_slice(&body).unwrap();
        assert!(parsed.exists);
    }
}
