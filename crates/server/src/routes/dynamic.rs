use axum::extract::{Query, State};
use axum::response::Response;
use tracing::error;

use models::{Configuration, HttpConfiguration};
use store::Window;

use crate::errors::ApiError;
use crate::routes::negotiate::{self, FormatQuery, PayloadFormat};
use crate::state::ServerState;

/// Assemble the full dynamic-configuration document from all three stores.
///
/// Enumeration is all-or-nothing per store: one unreadable or undecodable
/// entry fails the whole request.
pub async fn get_configuration(
    State(state): State<ServerState>,
    Query(fq): Query<FormatQuery>,
) -> Result<Response, ApiError> {
    let routers = state.routers.get_all(Window::unbounded(0)).await.map_err(|e| {
        error!(err = %e, "failed to get routers from store");
        ApiError::internal(e.to_string())
    })?;
    let services = state.services.get_all(Window::unbounded(0)).await.map_err(|e| {
        error!(err = %e, "failed to get services from store");
        ApiError::internal(e.to_string())
    })?;
    let middlewares = state.middlewares.get_all(Window::unbounded(0)).await.map_err(|e| {
        error!(err = %e, "failed to get middlewares from store");
        ApiError::internal(e.to_string())
    })?;

    let conf = Configuration {
        http: Some(HttpConfiguration { routers, services, middlewares }),
    };
    negotiate::encode(PayloadFormat::from_query(&fq), &conf)
}
