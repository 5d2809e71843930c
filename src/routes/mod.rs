//! Route definitions for the scanner adapter API.

pub mod health;
pub mod metadata;
pub mod scan;

use std::any::Any;

use axum::{
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::errors::AppError;
use crate::middleware::request_log;
use crate::AppState;

/// Largest accepted request body; scan requests are a few hundred bytes.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/scan", post(scan::accept))
        .route("/scan/{scan_request_id}/report", get(scan::report))
        .route("/metadata", get(metadata::get))
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_log::log_request))
                .layer(CatchPanicLayer::custom(panic_response))
                .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES)),
        );

    Router::new()
        .route("/health", get(health::live))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Turn a handler panic into the regular 500 error envelope.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    AppError::Internal(format!("handler panicked: {detail}")).into_response()
}
