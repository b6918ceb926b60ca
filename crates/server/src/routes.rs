use std::sync::Arc;

use axum::{routing::{get, post}, Json, Router};
use tower_http::trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use common::types::Health;
use service::snapshot::PvStore;

pub mod pv;

/// Shared handler state: the snapshot every request reads or mutates.
#[derive(Clone)]
pub struct ServerState {
    pub store: Arc<dyn PvStore>,
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router
pub fn build_router(state: ServerState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/pvget", get(pv::pvget))
        .route("/pvput", post(pv::pvput))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                // one span per request, at INFO
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
