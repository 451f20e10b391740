//! Sync folder info endpoint.

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
pub struct FolderInfoRequest {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderInfoResponse {
    pub path: String,
    pub container_name: String,
    pub exists: bool,
}

pub async fn handler(State(state): State<ServiceState>) -> Response {
    let path = state.sync_folder();
    (
        StatusCode::OK,
        Json(FolderInfoResponse {
            path: path.display().to_string(),
            container_name: state.container_name().to_string(),
            exists: path.is_dir(),
        }),
    )
        .into_response()
}

impl ApiRequest for FolderInfoRequest {
    type Response = FolderInfoResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/folder").expect("static route");
        client.get(full_url)
    }
}
