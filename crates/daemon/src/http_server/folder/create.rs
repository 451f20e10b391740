//! Sync folder creation endpoint. Idempotent.

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
pub struct CreateFolderRequest {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolderResponse {
    pub path: String,
    /// False when the folder already existed.
    pub created: bool,
}

pub async fn handler(
    State(state): State<ServiceState>,
) -> Result<impl IntoResponse, CreateFolderError> {
    let path = state.sync_folder();
    let created = !path.is_dir();
    if created {
        std::fs::create_dir_all(path).map_err(|source| CreateFolderError::Io {
            path: path.display().to_string(),
            source,
        })?;
    }

    Ok((
        StatusCode::OK,
        Json(CreateFolderResponse {
            path: path.display().to_string(),
            created,
        }),
    )
        .into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum CreateFolderError {
    #[error("creating {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

impl IntoResponse for CreateFolderError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

impl ApiRequest for CreateFolderRequest {
    type Response = CreateFolderResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/folder/create").expect("static route");
        client.get(full_url)
    }
}
