use std::time::Duration;

use axum::{
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

use crate::state::ServerState;

pub mod dynamic;
pub mod listing;
pub mod middlewares;
pub mod negotiate;
pub mod routers;
pub mod services;
pub mod validate;

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: health, aggregate document, and the
/// per-kind entry endpoints. Every request runs under `request_timeout`.
pub fn build_router(state: ServerState, cors: CorsLayer, request_timeout: Duration) -> Router {
    let v1 = Router::new()
        .route("/v1/http/routers", get(routers::list))
        .route("/v1/http/router", post(routers::create))
        .route("/v1/http/router/:name", get(routers::get_one).delete(routers::delete_one))
        .route("/v1/http/services", get(services::list))
        .route("/v1/http/service", post(services::create))
        .route("/v1/http/service/:name", get(services::get_one).delete(services::delete_one))
        .route("/v1/http/middlewares", get(middlewares::list))
        .route("/v1/http/middleware", post(middlewares::create))
        .route(
            "/v1/http/middleware/:name",
            get(middlewares::get_one).delete(middlewares::delete_one),
        );

    Router::new()
        .route("/health", get(health))
        .route("/api", get(dynamic::get_configuration))
        .merge(v1)
        .with_state(state)
        .layer(cors)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
