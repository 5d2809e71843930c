//! Liveness endpoint.

use axum::Json;

/// Liveness probe — always returns OK if the process is running.
pub async fn live() -> Json<()> {
    Json(())
}
