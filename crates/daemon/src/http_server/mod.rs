//! HTTP control surface. One module per endpoint; each pairs its axum
//! handler with the typed request the [`client::ApiClient`] sends.

pub mod client;
pub mod folder;
pub mod ledger;
pub mod name;
pub mod remote;
pub mod status;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::ServiceState;

pub use client::{ApiClient, ApiError, ApiRequest};

pub fn router(state: ServiceState) -> Router {
    Router::new()
        .route("/", get(name::handler))
        .route("/folder", get(folder::info::handler))
        .route("/folder/exists", get(folder::exists::handler))
        .route("/folder/create", get(folder::create::handler))
        .route("/folder/files", get(folder::files::handler))
        .route("/folder/files/sync", get(folder::upload::handler))
        .route("/remote/files", get(remote::files::handler))
        .route("/remote/files/sync", get(remote::download::handler))
        .route("/ledger", get(ledger::dump::handler))
        .route("/ledger/clear", get(ledger::clear::handler))
        .route("/_status/livez", get(status::livez::handler))
        .route("/_status/version", get(status::version::handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
