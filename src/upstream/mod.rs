//! Upstream vulnerability service.
//!
//! The orchestrator only depends on the [`UpstreamClient`] trait; [`SnykClient`]
//! is the production implementation backed by the Snyk v1 REST API.

pub mod snyk;
pub mod types;

use async_trait::async_trait;

pub use snyk::SnykClient;
pub use types::Issue;

/// Failures talking to the upstream service.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// The import job has not completed yet. Expected; the caller polls again.
    #[error("import job is not completed yet (status: {status})")]
    NotReady { status: String },

    /// The upstream answered with a non-2xx status.
    #[error("upstream rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// A successful import response did not carry a job location.
    #[error("upstream import response has no location header")]
    MissingLocation,

    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("could not decode upstream response: {0}")]
    Decode(String),

    /// A fan-out task panicked or was aborted.
    #[error("findings fetch task failed: {0}")]
    Task(String),

    /// More than one per-project findings fetch failed.
    #[error("{} findings fetches failed: {}", .0.len(), join_messages(.0))]
    Multiple(Vec<UpstreamError>),
}

impl UpstreamError {
    pub fn is_not_ready(&self) -> bool {
        matches!(self, Self::NotReady { .. })
    }
}

fn join_messages(errors: &[UpstreamError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Operations the scan lifecycle needs from the upstream service.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    /// Start an import job for `image` and return the job location URL to poll.
    async fn submit_import(&self, image: &str) -> Result<String, UpstreamError>;

    /// Poll the job at `location`; once complete, return the merged findings of
    /// every project imported for `image`.
    async fn fetch_report(&self, image: &str, location: &str) -> Result<Vec<Issue>, UpstreamError>;
}
