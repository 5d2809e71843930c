//! Snyk v1 REST API client.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, LOCATION};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::json;
use tokio::task::JoinSet;

use super::types::{ErrorResponse, ImportJob, ImportRequest, ImportTarget, IssuesResponse};
use super::{Issue, UpstreamClient, UpstreamError};
use crate::config::SnykConfig;

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Client for the Snyk import and aggregated-issues endpoints.
///
/// Cheap to clone: the HTTP connection pool and configuration are shared.
#[derive(Debug, Clone)]
pub struct SnykClient {
    client: Client,
    config: Arc<SnykConfig>,
}

impl SnykClient {
    /// Create a client with the configured per-request timeout.
    pub fn new(config: SnykConfig) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("harbor-snyk-scanner/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(AUTHORIZATION, format!("token {}", self.config.api_key))
    }

    fn import_url(&self) -> String {
        format!(
            "{}/api/v1/org/{}/integrations/{}/import",
            self.config.base_url, self.config.organisation_id, self.config.integration_id
        )
    }

    fn aggregated_issues_url(&self, project_id: &str) -> String {
        format!(
            "{}/api/v1/org/{}/project/{}/aggregated-issues",
            self.config.base_url, self.config.organisation_id, project_id
        )
    }

    /// Fetch the open vulnerability issues of a single project.
    async fn aggregated_issues(&self, project_id: &str) -> Result<Vec<Issue>, UpstreamError> {
        let filter = json!({
            "includeDescription": true,
            "includeIntroducedThrough": false,
            "filters": {
                "severities": ["critical", "high", "medium", "low"],
                "exploitMaturity": ["mature", "proof-of-concept", "no-known-exploit", "no-data"],
                "types": ["vuln"],
                "ignored": false,
                "patched": false,
                "priority": { "score": { "min": 0, "max": 1000 } }
            }
        });

        let response = self
            .authorized(self.client.post(self.aggregated_issues_url(project_id)))
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .json(&filter)
            .send()
            .await?;

        let body: IssuesResponse = decode_success(response).await?;
        tracing::debug!(
            project_id,
            issues = body.issues.len(),
            "Fetched aggregated issues"
        );
        Ok(body.issues)
    }

    /// Fetch every project's issues concurrently and merge them all-or-nothing.
    ///
    /// Every task is awaited even after a failure.
    async fn collect_issues(&self, project_ids: Vec<String>) -> Result<Vec<Issue>, UpstreamError> {
        let mut join_set: JoinSet<Result<Vec<Issue>, UpstreamError>> = JoinSet::new();
        for project_id in project_ids {
            let client = self.clone();
            join_set.spawn(async move { client.aggregated_issues(&project_id).await });
        }

        let mut issues = Vec::new();
        let mut errors = Vec::new();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(Ok(mut project_issues)) => issues.append(&mut project_issues),
                Ok(Err(e)) => errors.push(e),
                Err(e) => errors.push(UpstreamError::Task(e.to_string())),
            }
        }

        match errors.len() {
            0 => Ok(issues),
            1 => Err(errors.remove(0)),
            _ => Err(UpstreamError::Multiple(errors)),
        }
    }
}

#[async_trait]
impl UpstreamClient for SnykClient {
    async fn submit_import(&self, image: &str) -> Result<String, UpstreamError> {
        let body = ImportRequest {
            target: ImportTarget { name: image },
        };

        let response = self
            .authorized(self.client.post(self.import_url()))
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(rejection(response).await);
        }

        // The job location travels in a response header, not in the body.
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or(UpstreamError::MissingLocation)?
            .to_string();

        tracing::debug!(image, location = %location, "Import job submitted");
        Ok(location)
    }

    async fn fetch_report(&self, image: &str, location: &str) -> Result<Vec<Issue>, UpstreamError> {
        let response = self
            .authorized(self.client.get(location))
            .send()
            .await?;
        let job: ImportJob = decode_success(response).await?;

        if !job.is_complete() {
            return Err(UpstreamError::NotReady { status: job.status });
        }

        let project_ids = job.successful_project_ids(image);
        tracing::debug!(
            image,
            job_id = %job.id,
            projects = project_ids.len(),
            "Import job complete"
        );

        self.collect_issues(project_ids).await
    }
}

/// Decode a 2xx JSON body, or turn a non-2xx response into a rejection.
async fn decode_success<T: DeserializeOwned>(response: Response) -> Result<T, UpstreamError> {
    if !response.status().is_success() {
        return Err(rejection(response).await);
    }
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| UpstreamError::Decode(e.to_string()))
}

/// Build a `Rejected` error from a non-2xx response, preferring the message
/// the upstream put in its error body.
async fn rejection(response: Response) -> UpstreamError {
    let status = response.status();
    let message = match response.bytes().await {
        Ok(bytes) => serde_json::from_slice::<ErrorResponse>(&bytes)
            .ok()
            .and_then(ErrorResponse::into_message),
        Err(_) => None,
    }
    .unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_string()
    });

    UpstreamError::Rejected {
        status: status.as_u16(),
        message,
    }
}
