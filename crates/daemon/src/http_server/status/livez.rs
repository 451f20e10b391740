//! Liveness probe.

use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::http_server::client::ApiRequest;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivezRequest {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivezResponse {
    pub status: String,
}

/// Answers OK for as long as the process runs; no sync state is
/// consulted. External healthcheckers that see this fail will usually
/// restart the daemon.
pub async fn handler() -> Response {
    (
        StatusCode::OK,
        Json(LivezResponse {
            status: "ok".to_string(),
        }),
    )
        .into_response()
}

impl ApiRequest for LivezRequest {
    type Response = LivezResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/_status/livez").expect("static route");
        client.get(full_url)
    }
}
