//! Local file listing endpoint.

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use url::Url;

use sync::{walk_folder, FolderEntry, SyncError};

use crate::http_server::client::ApiRequest;
use crate::state::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalFilesRequest {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalFilesResponse {
    pub files: Vec<FolderEntry>,
}

pub async fn handler(
    State(state): State<ServiceState>,
) -> Result<impl IntoResponse, LocalFilesError> {
    let files = walk_folder(state.sync_folder())?;
    Ok((StatusCode::OK, Json(LocalFilesResponse { files })).into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum LocalFilesError {
    #[error("listing sync folder: {0}")]
    Walk(#[from] SyncError),
}

impl IntoResponse for LocalFilesError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

impl ApiRequest for LocalFilesRequest {
    type Response = LocalFilesResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/folder/files").expect("static route");
        client.get(full_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support;

    #[tokio::test]
    async fn lists_files_recursively() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("box");
        std::fs::create_dir_all(root.join("sub")).unwrap();
        std::fs::write(root.join("a.txt"), b"1").unwrap();
        std::fs::write(root.join("sub/b.txt"), b"2").unwrap();

        let state = test_support::memory_state(root);
        let response = handler(State(state)).await.unwrap().into_response();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: LocalFilesResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed.files.len(), 2);
    }

    #[tokio::test]
    async fn missing_folder_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_support::memory_state(dir.path().join("absent"));
        assert!(handler(State(state)).await.is_err());
    }
}
