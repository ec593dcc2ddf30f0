use std::{env, net::SocketAddr, sync::Arc, time::Duration};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes;
use crate::state::{
    MiddlewareStore, RouterStore, ServerState, ServiceStore, MIDDLEWARE_PREFIX, ROUTER_PREFIX,
    SERVICE_PREFIX,
};

fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load the app config; a missing or invalid config file falls back to
/// defaults so a bare checkout still starts.
fn load_config() -> configs::AppConfig {
    match configs::AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(_) => configs::AppConfig::default(),
    }
}

/// Bind address from config, with `SERVER_HOST`/`SERVER_PORT` env overrides.
fn load_bind_addr(cfg: &configs::AppConfig) -> anyhow::Result<SocketAddr> {
    let host = env::var("SERVER_HOST").unwrap_or_else(|_| cfg.server.host.clone());
    let port = env::var("SERVER_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(cfg.server.port);
    Ok(format!("{}:{}", host, port).parse()?)
}

/// Public entry: open the three stores, build the app, run the HTTP server.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let cfg = load_config();
    let storage = &cfg.storage;

    let routers = Arc::new(RouterStore::new(storage.routers_dir(), ROUTER_PREFIX).await?);
    let services = Arc::new(ServiceStore::new(storage.services_dir(), SERVICE_PREFIX).await?);
    let middlewares =
        Arc::new(MiddlewareStore::new(storage.middlewares_dir(), MIDDLEWARE_PREFIX).await?);
    let state = ServerState { routers, services, middlewares };

    let app: Router = routes::build_router(
        state,
        build_cors(),
        Duration::from_secs(cfg.server.request_timeout_secs),
    );

    let addr = load_bind_addr(&cfg)?;
    info!(%addr, data_dir = %storage.data_dir, "starting admin api");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
