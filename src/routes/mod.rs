//! HTTP route handlers.
//!
//! The service exposes a single route, `GET /status`. Responses are marked
//! `no-store` because every record is computed at request time. Request
//! tracing is enabled via middleware that generates a unique request ID for
//! each incoming request.

pub mod status;

use axum::{middleware, routing::get, Router};
use http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::CACHE_CONTROL_STATUS;
use crate::middleware::request_id_layer;
use crate::state::AppState;

/// Creates the Axum router with the status route and its headers.
pub fn create_router(state: AppState) -> Router {
    let status_routes = Router::new()
        .route("/status", get(status::get_status))
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_STATUS),
        ));

    Router::new()
        .merge(status_routes)
        .with_state(state)
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}
