use std::sync::Arc;

use models::{Middleware, Router, Service};
use store::FileStore;

pub const ROUTER_PREFIX: &str = "router_";
pub const SERVICE_PREFIX: &str = "service_";
pub const MIDDLEWARE_PREFIX: &str = "middleware_";

pub type RouterStore = FileStore<Router>;
pub type ServiceStore = FileStore<Service>;
pub type MiddlewareStore = FileStore<Middleware>;

/// Shared handler state: one store per entity kind. The three stores are
/// independent siblings (own directory, own prefix) and share no data.
#[derive(Clone)]
pub struct ServerState {
    pub routers: Arc<RouterStore>,
    pub services: Arc<ServiceStore>,
    pub middlewares: Arc<MiddlewareStore>,
}
