//! Scan routes: accept a scan request and poll for its report.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::errors::AppError;
use crate::models::artifact::{ScanRequest, ScanResponse};
use crate::models::media_type::{SCANNER_ADAPTER_SCAN_RESPONSE, SCANNER_ADAPTER_VULN_REPORT};
use crate::render::VendorJson;
use crate::services::scan::{self as scan_service, ScanOutcome};
use crate::AppState;

/// Header telling the registry when to poll again.
pub static REFRESH_AFTER: HeaderName = HeaderName::from_static("refresh-after");

/// Seconds the registry should wait before polling a report that is not ready.
pub const REFRESH_AFTER_SECS: &str = "60";

/// POST /api/scan — start scanning an artifact, answering with an opaque scan request id.
pub async fn accept(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    let request: ScanRequest = serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!(error = %e, "Could not decode request body");
        AppError::BadRequest(e.to_string())
    })?;

    let id = scan_service::accept_scan_request(state.upstream.as_ref(), &request.artifact).await?;

    Ok(VendorJson(
        StatusCode::ACCEPTED,
        SCANNER_ADAPTER_SCAN_RESPONSE,
        ScanResponse { id },
    )
    .into_response())
}

/// GET /api/scan/{scan_request_id}/report — return the report, or ask the registry to retry.
pub async fn report(
    State(state): State<AppState>,
    Path(scan_request_id): Path<String>,
) -> Result<Response, AppError> {
    match scan_service::get_scan_report(state.upstream.as_ref(), &scan_request_id).await? {
        ScanOutcome::Ready(report) => {
            Ok(VendorJson(StatusCode::OK, SCANNER_ADAPTER_VULN_REPORT, report).into_response())
        }
        ScanOutcome::NotReady => Ok((
            StatusCode::FOUND,
            [(
                REFRESH_AFTER.clone(),
                HeaderValue::from_static(REFRESH_AFTER_SECS),
            )],
        )
            .into_response()),
    }
}
