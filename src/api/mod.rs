//! Front-end HTTP API
//!
//! Client-facing endpoints served by each node, separate from the binary peer
//! protocol.
//!
//! - `GET /api?key=<key>[&group=<name>]`: raw value bytes, or the error text.
//! - `GET /stats`: JSON counters for every registered group.

pub mod handlers;

use crate::cluster::Cluster;

use axum::{Extension, Router, routing::get};
use std::sync::Arc;

pub const ENDPOINT_GET: &str = "/api";
pub const ENDPOINT_STATS: &str = "/stats";

/// Shared state for the API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub cluster: Arc<Cluster>,
    /// Group used when a request does not name one.
    pub default_group: String,
}

pub fn router(cluster: Arc<Cluster>, default_group: &str) -> Router {
    let state = ApiState {
        cluster,
        default_group: default_group.to_string(),
    };

    Router::new()
        .route(ENDPOINT_GET, get(handlers::handle_get))
        .route(ENDPOINT_STATS, get(handlers::handle_stats))
        .layer(Extension(state))
}
