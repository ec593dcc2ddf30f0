use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use tracing::{error, info};

use models::Configuration;

use crate::errors::ApiError;
use crate::routes::listing::{self, ListQuery, NameListing};
use crate::routes::negotiate::{self, FormatQuery, PayloadFormat};
use crate::routes::validate::validate_entry_name;
use crate::state::ServerState;

const COLLECTION_HREF: &str = "/v1/http/routers";
const ENTRY_HREF: &str = "/v1/http/router";

pub async fn list(
    State(state): State<ServerState>,
    Query(q): Query<ListQuery>,
) -> Json<NameListing> {
    let names = state.routers.names(q.window()).await;
    info!(count = names.len(), "list routers");
    Json(listing::name_listing(COLLECTION_HREF, ENTRY_HREF, names))
}

/// Store every router carried in the posted configuration document.
pub async fn create(
    State(state): State<ServerState>,
    Query(fq): Query<FormatQuery>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let configuration: Configuration = negotiate::decode(PayloadFormat::from_query(&fq), &body)?;
    let routers = configuration.http.map(|h| h.routers).unwrap_or_default();
    for (name, router) in routers {
        validate_entry_name(&name)?;
        state.routers.set(&name, &router).await.map_err(|e| {
            error!(err = %e, %name, "failed to store router");
            ApiError::from(e)
        })?;
        info!(%name, "stored router");
    }
    Ok(StatusCode::CREATED)
}

pub async fn get_one(
    State(state): State<ServerState>,
    Path(name): Path<String>,
    Query(fq): Query<FormatQuery>,
) -> Result<Response, ApiError> {
    validate_entry_name(&name)?;
    let router = state.routers.get(&name).await?;
    negotiate::encode(PayloadFormat::from_query(&fq), &router)
}

pub async fn delete_one(
    State(state): State<ServerState>,
    Path(name): Path<String>,
) -> Result<StatusCode, ApiError> {
    validate_entry_name(&name)?;
    state.routers.delete(&name).await?;
    info!(%name, "deleted router");
    Ok(StatusCode::OK)
}
