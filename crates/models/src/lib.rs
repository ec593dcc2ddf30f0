//! Wire-shaped entity payloads for the dynamic-configuration document.
//! The storage layer treats these as opaque serde values; only the HTTP
//! layer and the aggregate endpoint interpret their structure.

pub mod dynamic;

pub use dynamic::{
    Configuration, HttpConfiguration, LoadBalancer, Middleware, Router, Server, Service,
};
