//! Service identity endpoint.

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
pub struct NameRequest {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameResponse {
    pub service: String,
    pub container_name: String,
}

pub async fn handler(State(state): State<ServiceState>) -> Response {
    (
        StatusCode::OK,
        Json(NameResponse {
            service: env!("CARGO_PKG_NAME").to_string(),
            container_name: state.container_name().to_string(),
        }),
    )
        .into_response()
}

impl ApiRequest for NameRequest {
    type Response = NameResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/").expect("static route");
        client.get(full_url)
    }
}
