//! Scan request lifecycle.
//!
//! Nothing is stored between calls: the scan handle returned on acceptance is
//! decoded on every report poll to reconstruct where the scan stands.
//!
//! ```text
//! SUBMITTED --(poll, job pending)--> NOT_READY  (caller retries)
//! SUBMITTED --(poll, job complete)-> READY      (report returned)
//! SUBMITTED --(handle age > 1h)----> EXPIRED    (terminal)
//! any       --(upstream failure)---> FAILED     (terminal for this attempt)
//! ```

use chrono::{DateTime, Utc};

use crate::errors::AppError;
use crate::models::artifact::Artifact;
use crate::models::report::{ScanReport, Scanner};
use crate::services::{report, token};
use crate::upstream::UpstreamClient;

/// Outcome of a report poll that did not fail.
#[derive(Debug)]
pub enum ScanOutcome {
    Ready(ScanReport),
    /// The upstream job is still running; poll again later.
    NotReady,
}

/// Validate the artifact, start an upstream import and return the scan handle.
///
/// Every call starts a new, independent upstream job.
pub async fn accept_scan_request(
    upstream: &dyn UpstreamClient,
    artifact: &Artifact,
) -> Result<String, AppError> {
    validate_artifact(artifact)?;

    let image = artifact.image_ref();
    let location = upstream.submit_import(&image).await.map_err(|e| {
        tracing::error!(error = %e, image = %image, "Could not import image into Snyk");
        AppError::from(e)
    })?;

    let id = token::encode(artifact, &location).map_err(|e| {
        tracing::error!(
            error = %e,
            repository = %artifact.repository,
            tag = %artifact.tag,
            location = %location,
            "Could not create scan request id"
        );
        e
    })?;

    tracing::info!(image = %image, location = %location, "Scan request accepted");
    Ok(id)
}

/// Resume the scan identified by `id` and return its report if it is ready.
pub async fn get_scan_report(
    upstream: &dyn UpstreamClient,
    id: &str,
) -> Result<ScanOutcome, AppError> {
    get_scan_report_at(upstream, id, Utc::now()).await
}

/// [`get_scan_report`] evaluated at `now`.
pub async fn get_scan_report_at(
    upstream: &dyn UpstreamClient,
    id: &str,
    now: DateTime<Utc>,
) -> Result<ScanOutcome, AppError> {
    let handle = token::decode(id).map_err(|e| {
        tracing::warn!(error = %e, "Invalid scan request id");
        e
    })?;

    if handle.is_expired(now) {
        let age_secs = handle.age_secs(now);
        tracing::error!(
            repository = %handle.artifact.repository,
            tag = %handle.artifact.tag,
            location = %handle.location,
            age_secs,
            "Scan request is older than an hour, do not retry anymore"
        );
        return Err(AppError::Expired { age_secs });
    }

    let image = handle.artifact.image_ref();
    match upstream.fetch_report(&image, &handle.location).await {
        Ok(issues) => {
            tracing::info!(image = %image, issues = issues.len(), "Scan report ready");
            Ok(ScanOutcome::Ready(report::build(
                Scanner::current(),
                handle.artifact,
                &issues,
                now,
            )))
        }
        Err(e) if e.is_not_ready() => {
            tracing::debug!(image = %image, location = %handle.location, "Scan report not ready yet");
            Ok(ScanOutcome::NotReady)
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                image = %image,
                location = %handle.location,
                "Could not get aggregated issues from Snyk"
            );
            Err(e.into())
        }
    }
}

fn validate_artifact(artifact: &Artifact) -> Result<(), AppError> {
    if artifact.repository.trim().is_empty() {
        return Err(AppError::Validation(
            "Repository field for artifact is missing in request data".to_string(),
        ));
    }
    if artifact.tag.trim().is_empty() {
        return Err(AppError::Validation(
            "Tag field for artifact is missing in request data".to_string(),
        ));
    }
    Ok(())
}
