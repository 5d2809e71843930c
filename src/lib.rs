pub mod config;
pub mod errors;
pub mod middleware;
pub mod models;
pub mod render;
pub mod routes;
pub mod services;
pub mod upstream;

use std::sync::Arc;

use crate::upstream::UpstreamClient;

/// Shared application state passed to all Axum handlers.
///
/// Immutable after startup; scan progress lives in the caller-held scan
/// request id, never here.
#[derive(Clone)]
pub struct AppState {
    pub config: config::AppConfig,
    pub upstream: Arc<dyn UpstreamClient>,
}
